// Edit pipeline unit tests against a mocked asset source

use crate::common::{png_bytes, require_font};
use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};
use imprint::compositor::Color;
use imprint::config::EditorConfig;
use imprint::editor::{compose, EditRequest, ImageEditor};
use imprint::error::EditorError;
use imprint::fetcher::AssetSource;
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Source {}

    #[async_trait]
    impl AssetSource for Source {
        async fn fetch(&self, url: &str) -> Result<Bytes, EditorError>;
    }
}

const IMAGE_URL: &str = "https://images.example.com/photo.png";
const LOGO_URL: &str = "https://images.example.com/logo.png";

fn config() -> EditorConfig {
    EditorConfig {
        default_logo_url: LOGO_URL.to_string(),
        ..Default::default()
    }
}

/// Mock serving a 1×1 photo and a translucent logo.
fn serving_source(expected_calls: usize) -> MockSource {
    let photo = Bytes::from(png_bytes(1, 1, [30, 90, 160, 255]));
    let logo = Bytes::from(png_bytes(120, 20, [255, 0, 0, 200]));

    let mut source = MockSource::new();
    source
        .expect_fetch()
        .times(expected_calls)
        .returning(move |url: &str| match url {
            IMAGE_URL => Ok(photo.clone()),
            LOGO_URL => Ok(logo.clone()),
            other => Err(EditorError::Network(format!("404 Not Found: {other}"))),
        });
    source
}

fn decode_jpeg(data: &[u8]) -> DynamicImage {
    image::load_from_memory_with_format(data, ImageFormat::Jpeg).expect("output should be JPEG")
}

#[tokio::test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
async fn test_edit_produces_square_jpeg() {
    let font = require_font(56.0);
    let editor = ImageEditor::new(config(), Arc::new(serving_source(2)), Ok(font)).unwrap();

    let edited = editor
        .edit(EditRequest::new(IMAGE_URL).with_text("Hello World"))
        .await
        .expect("edit should succeed");

    assert_eq!(edited.content_type, "image/jpeg");
    let output = decode_jpeg(&edited.data);
    assert_eq!(output.dimensions(), (1080, 1080));
}

#[tokio::test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
async fn test_edit_is_byte_identical_for_identical_input() {
    let font = require_font(56.0);
    let editor = ImageEditor::new(config(), Arc::new(serving_source(4)), Ok(font)).unwrap();
    let request = EditRequest::new(IMAGE_URL).with_text("Same input, same bytes");

    let first = editor.edit(request.clone()).await.unwrap();
    let second = editor.edit(request).await.unwrap();

    assert_eq!(first.data, second.data);
}

#[tokio::test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
async fn test_image_fetch_failure_skips_logo() {
    let font = require_font(56.0);
    let mut source = MockSource::new();
    source
        .expect_fetch()
        .times(1)
        .returning(|_: &str| Err(EditorError::Network("404 Not Found".to_string())));
    let editor = ImageEditor::new(config(), Arc::new(source), Ok(font)).unwrap();

    let err = editor
        .edit(EditRequest::new(IMAGE_URL))
        .await
        .unwrap_err();
    assert_eq!(err, EditorError::Network("404 Not Found".to_string()));
}

#[tokio::test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
async fn test_logo_fetch_failure_is_network_error() {
    let font = require_font(56.0);
    let editor = ImageEditor::new(config(), Arc::new(serving_source(2)), Ok(font)).unwrap();

    let err = editor
        .edit(EditRequest::new(IMAGE_URL).with_logo_url("https://images.example.com/gone.png"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "network");
}

#[tokio::test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
async fn test_undecodable_image_skips_logo_fetch() {
    let font = require_font(56.0);
    let mut source = MockSource::new();
    source
        .expect_fetch()
        .withf(|url: &str| url == IMAGE_URL)
        .times(1)
        .returning(|_: &str| Ok(Bytes::from_static(b"<html>definitely not an image</html>")));
    let editor = ImageEditor::new(config(), Arc::new(source), Ok(font)).unwrap();

    let err = editor.edit(EditRequest::new(IMAGE_URL)).await.unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
async fn test_oversized_source_is_rejected_before_logo_fetch() {
    let font = require_font(56.0);
    let photo = Bytes::from(png_bytes(300, 2, [30, 90, 160, 255]));
    let mut source = MockSource::new();
    source
        .expect_fetch()
        .withf(|url: &str| url == IMAGE_URL)
        .times(1)
        .returning(move |_: &str| Ok(photo.clone()));
    let config = EditorConfig {
        max_source_width: 200,
        ..config()
    };
    let editor = ImageEditor::new(config, Arc::new(source), Ok(font)).unwrap();

    let err = editor.edit(EditRequest::new(IMAGE_URL)).await.unwrap_err();
    assert_eq!(err.kind(), "decode");
    assert!(err.to_string().contains("300x2"), "{err}");
}

#[tokio::test]
async fn test_missing_font_never_fetches() {
    let mut source = MockSource::new();
    source.expect_fetch().times(0);
    let editor = ImageEditor::new(
        config(),
        Arc::new(source),
        Err(EditorError::FontLoad("no candidates".to_string())),
    )
    .unwrap();

    let err = editor.edit(EditRequest::new(IMAGE_URL)).await.unwrap_err();
    assert_eq!(err, EditorError::FontLoad("no candidates".to_string()));
}

#[test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
fn test_compose_darkens_bottom_and_keeps_top() {
    let font = require_font(56.0);
    let base = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        10,
        10,
        image::Rgb([200, 200, 200]),
    ));
    let logo = DynamicImage::ImageRgba8(image::RgbaImage::new(10, 10));

    let data = compose(&config(), &font, Color::white(), &base, &logo, "", false).unwrap();
    let output = decode_jpeg(&data).to_rgb8();

    let top = output.get_pixel(540, 10)[0] as i32;
    let bottom = output.get_pixel(540, 1075)[0] as i32;
    assert!((top - 200).abs() <= 4, "top pixel {top}");
    // 204/255 darkening leaves about a fifth of the brightness
    assert!(bottom < 60, "bottom pixel {bottom}");
}

#[test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
fn test_compose_backdrop_changes_output() {
    let font = require_font(56.0);
    let base = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        4,
        4,
        image::Rgb([120, 180, 240]),
    ));
    let logo = DynamicImage::ImageRgba8(image::RgbaImage::new(4, 4));

    let plain = compose(&config(), &font, Color::white(), &base, &logo, "Caption", false).unwrap();
    let boxed = compose(&config(), &font, Color::white(), &base, &logo, "Caption", true).unwrap();

    assert_ne!(plain, boxed);
}
