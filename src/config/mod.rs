// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::compositor::parse_hex_color;

pub mod editor;
pub mod server;

pub use editor::{BackdropConfig, EditorConfig, GradientConfig, LogoConfig, TextConfig};
pub use server::ServerConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.request_timeout == 0 {
            return Err("server.request_timeout must be greater than 0".to_string());
        }
        if self.server.max_body_size == 0 {
            return Err("server.max_body_size must be greater than 0".to_string());
        }

        let editor = &self.editor;

        if editor.canvas_size == 0 {
            return Err("editor.canvas_size must be greater than 0".to_string());
        }

        if !(1..=100).contains(&editor.jpeg_quality) {
            return Err(format!(
                "editor.jpeg_quality must be between 1 and 100, got {}",
                editor.jpeg_quality
            ));
        }

        if editor.fetch_timeout == 0 {
            return Err("editor.fetch_timeout must be greater than 0".to_string());
        }
        if editor.max_download_size == 0 {
            return Err("editor.max_download_size must be greater than 0".to_string());
        }
        if editor.max_source_width == 0
            || editor.max_source_height == 0
            || editor.max_source_pixels == 0
        {
            return Err(
                "editor.max_source_width/height/pixels must be greater than 0".to_string(),
            );
        }

        if !is_http_url(&editor.default_logo_url) {
            return Err(format!(
                "editor.default_logo_url '{}' must start with http:// or https://",
                editor.default_logo_url
            ));
        }

        let logo = &editor.logo;
        if logo.width == 0 || logo.height == 0 {
            return Err("editor.logo dimensions must be greater than 0".to_string());
        }
        if logo.width > editor.canvas_size
            || logo.height + logo.offset_from_bottom > editor.canvas_size
        {
            return Err(format!(
                "editor.logo ({}x{} at {}px from bottom) does not fit a {}px canvas",
                logo.width, logo.height, logo.offset_from_bottom, editor.canvas_size
            ));
        }

        let text = &editor.text;
        if !(text.font_size > 0.0) {
            return Err(format!(
                "editor.text.font_size must be greater than 0, got {}",
                text.font_size
            ));
        }
        if !(text.max_width_ratio > 0.0 && text.max_width_ratio <= 1.0) {
            return Err(format!(
                "editor.text.max_width_ratio must be in (0, 1], got {}",
                text.max_width_ratio
            ));
        }
        parse_hex_color(&text.color).map_err(|e| format!("editor.text.color: {}", e))?;

        if let Some(band) = editor.gradient.band_height {
            if band > editor.canvas_size {
                return Err(format!(
                    "editor.gradient.band_height {} exceeds canvas size {}",
                    band, editor.canvas_size
                ));
            }
        }

        Ok(())
    }
}

pub(crate) fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
