// Liveness, metrics and routing tests over real HTTP

use super::test_harness::{AssetServer, EditorHarness};
use imprint::config::{EditorConfig, ServerConfig};
use imprint::error::EditorError;
use serde_json::{json, Value};

async fn start_without_font() -> EditorHarness {
    EditorHarness::start(
        ServerConfig::default(),
        EditorConfig::default(),
        Err(EditorError::FontLoad("no font configured".to_string())),
    )
    .await
}

#[tokio::test]
async fn test_liveness() {
    let harness = start_without_font().await;

    let response = reqwest::get(harness.url("/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "Image editor is running!");

    harness.shutdown().await;
}

#[tokio::test]
async fn test_unknown_path_and_wrong_method() {
    let harness = start_without_font().await;
    let client = reqwest::Client::new();

    let response = client.get(harness.url("/does-not-exist")).send().await.unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert!(body.get("error").is_some());

    let response = client.get(harness.url("/edit_image")).send().await.unwrap();
    assert_eq!(response.status(), 405);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_service_starts_without_font_and_reports_it() {
    let assets = AssetServer::with_default_assets().await;
    let harness = start_without_font().await;

    let response = harness
        .post_edit(json!({ "image_url": assets.url("/photo.png") }))
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to load font"));

    harness.shutdown().await;
}

#[tokio::test]
async fn test_malformed_json_is_invalid_request() {
    let server = ServerConfig {
        legacy_error_status: false,
        ..Default::default()
    };
    let harness = EditorHarness::start(
        server,
        EditorConfig::default(),
        Err(EditorError::FontLoad("unused".to_string())),
    )
    .await;

    let response = reqwest::Client::new()
        .post(harness.url("/edit_image"))
        .header("content-type", "application/json")
        .body("{\"image_url\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_metrics_reports_requests() {
    let harness = start_without_font().await;

    reqwest::get(harness.url("/")).await.unwrap();
    let response = reqwest::get(harness.url("/metrics")).await.unwrap();
    assert_eq!(response.status(), 200);

    let text = response.text().await.unwrap();
    assert!(text.contains("imprint_requests_total"));
    assert!(text.contains("endpoint=\"root\""));

    harness.shutdown().await;
}
