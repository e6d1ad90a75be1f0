// Configuration unit tests: YAML loading, env substitution, validation

use imprint::config::*;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_empty_yaml_yields_defaults() {
    let config = Config::from_yaml_with_env("{}").expect("Failed to parse empty config");

    assert_eq!(config.server.address, "0.0.0.0");
    assert_eq!(config.server.port, 10000);
    assert!(config.server.legacy_error_status);
    assert_eq!(config.editor.canvas_size, 1080);
    assert_eq!(config.editor.jpeg_quality, 90);
    assert_eq!(config.editor.default_text, "Default Text");
    assert!(config.validate().is_ok());
}

#[test]
fn test_full_yaml_config() {
    let yaml = r##"
server:
  address: "127.0.0.1"
  port: 8081
  request_timeout: 10
  max_body_size: 4096
  legacy_error_status: false
editor:
  default_logo_url: "https://cdn.example.com/logo.png"
  default_text: "Breaking"
  font_path: "/opt/fonts/Montserrat-Bold.ttf"
  fallback_fonts: []
  canvas_size: 720
  jpeg_quality: 80
  fetch_timeout: 5
  max_download_size: 1048576
  max_source_width: 4000
  max_source_height: 3000
  max_source_pixels: 12000000
  logo: { width: 200, height: 40, offset_from_bottom: 30 }
  text: { font_size: 40.0, color: "#FFCC00", max_width_ratio: 0.75, gap_above_logo: 20 }
  gradient: { max_alpha: 180, band_height: 300 }
  backdrop: { enabled: true, alpha: 100, padding: 12 }
"##;
    let config = Config::from_yaml_with_env(yaml).expect("Failed to parse config");

    assert_eq!(config.server.listen_address(), "127.0.0.1:8081");
    assert!(!config.server.legacy_error_status);
    assert_eq!(config.editor.canvas_size, 720);
    assert_eq!(config.editor.max_source_width, 4000);
    assert_eq!(config.editor.max_source_pixels, 12_000_000);
    assert_eq!(config.editor.logo.width, 200);
    assert_eq!(config.editor.text.color, "#FFCC00");
    assert_eq!(config.editor.gradient.band_height, Some(300));
    assert!(config.editor.backdrop.enabled);
    assert!(config.editor.fallback_fonts.is_empty());
    assert_eq!(config.editor.font_candidates().len(), 1);
    assert_eq!(config.editor.max_text_width(), 540);
    assert!(config.validate().is_ok());
}

#[test]
fn test_env_var_substitution() {
    std::env::set_var("IMPRINT_TEST_LOGO_URL", "https://assets.example.com/brand.png");
    let yaml = r#"
editor:
  default_logo_url: "${IMPRINT_TEST_LOGO_URL}"
"#;
    let config = Config::from_yaml_with_env(yaml).expect("Failed to parse config");
    assert_eq!(
        config.editor.default_logo_url,
        "https://assets.example.com/brand.png"
    );
}

#[test]
fn test_missing_env_var_is_an_error() {
    let yaml = r#"
editor:
  default_text: "${IMPRINT_TEST_DEFINITELY_UNSET_VAR}"
"#;
    let err = Config::from_yaml_with_env(yaml).unwrap_err();
    assert!(err.contains("IMPRINT_TEST_DEFINITELY_UNSET_VAR"));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "server:\n  port: 9999\neditor:\n  jpeg_quality: 75").unwrap();

    let config = Config::from_file(file.path()).expect("Failed to load config file");
    assert_eq!(config.server.port, 9999);
    assert_eq!(config.editor.jpeg_quality, 75);
}

#[test]
fn test_from_missing_file() {
    let err = Config::from_file("/nonexistent/imprint.yaml").unwrap_err();
    assert!(err.contains("Failed to read config file"));
}

#[rstest]
#[case::zero_canvas("canvas_size", |c: &mut Config| c.editor.canvas_size = 0)]
#[case::zero_quality("jpeg_quality", |c: &mut Config| c.editor.jpeg_quality = 0)]
#[case::quality_over_100("jpeg_quality", |c: &mut Config| c.editor.jpeg_quality = 101)]
#[case::ftp_logo("default_logo_url", |c: &mut Config| {
    c.editor.default_logo_url = "ftp://x/l.png".to_string()
})]
#[case::logo_too_wide("editor.logo", |c: &mut Config| c.editor.logo.width = 2000)]
#[case::zero_font_size("font_size", |c: &mut Config| c.editor.text.font_size = 0.0)]
#[case::ratio_over_one("max_width_ratio", |c: &mut Config| c.editor.text.max_width_ratio = 1.5)]
#[case::named_color("text.color", |c: &mut Config| c.editor.text.color = "white".to_string())]
#[case::band_too_tall("band_height", |c: &mut Config| c.editor.gradient.band_height = Some(5000))]
#[case::zero_request_timeout("request_timeout", |c: &mut Config| c.server.request_timeout = 0)]
#[case::zero_fetch_timeout("fetch_timeout", |c: &mut Config| c.editor.fetch_timeout = 0)]
#[case::zero_source_width("max_source", |c: &mut Config| c.editor.max_source_width = 0)]
#[case::zero_source_pixels("max_source", |c: &mut Config| c.editor.max_source_pixels = 0)]
fn test_validate_rejects_bad_values(#[case] field: &str, #[case] mutate: fn(&mut Config)) {
    let mut config = Config::default();
    mutate(&mut config);

    let err = config.validate().unwrap_err();
    assert!(err.contains(field), "expected error about {field}, got: {err}");
}
