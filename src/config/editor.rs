//! Editor configuration types.
//!
//! Everything the compositing pipeline treats as a constant lives here:
//! canvas size, logo geometry, text metrics, gradient and backdrop settings,
//! asset retrieval limits. Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BACKDROP_ALPHA, DEFAULT_BACKDROP_PADDING, DEFAULT_CANVAS_SIZE,
    DEFAULT_FALLBACK_FONTS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE,
    DEFAULT_GRADIENT_MAX_ALPHA, DEFAULT_JPEG_QUALITY, DEFAULT_LOGO_HEIGHT,
    DEFAULT_LOGO_OFFSET_FROM_BOTTOM, DEFAULT_LOGO_URL, DEFAULT_LOGO_WIDTH,
    DEFAULT_MAX_DOWNLOAD_SIZE, DEFAULT_MAX_SOURCE_HEIGHT, DEFAULT_MAX_SOURCE_PIXELS,
    DEFAULT_MAX_SOURCE_WIDTH, DEFAULT_MAX_WIDTH_RATIO, DEFAULT_TEXT, DEFAULT_TEXT_COLOR,
    DEFAULT_TEXT_GAP_ABOVE_LOGO,
};

fn default_logo_url() -> String {
    DEFAULT_LOGO_URL.to_string()
}

fn default_text() -> String {
    DEFAULT_TEXT.to_string()
}

fn default_font_path() -> PathBuf {
    PathBuf::from(DEFAULT_FONT_PATH)
}

fn default_fallback_fonts() -> Vec<PathBuf> {
    DEFAULT_FALLBACK_FONTS.iter().map(PathBuf::from).collect()
}

fn default_canvas_size() -> u32 {
    DEFAULT_CANVAS_SIZE
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_max_download_size() -> usize {
    DEFAULT_MAX_DOWNLOAD_SIZE
}

fn default_max_source_width() -> u32 {
    DEFAULT_MAX_SOURCE_WIDTH
}

fn default_max_source_height() -> u32 {
    DEFAULT_MAX_SOURCE_HEIGHT
}

fn default_max_source_pixels() -> u64 {
    DEFAULT_MAX_SOURCE_PIXELS
}

/// Pipeline configuration handed to the editor at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Logo fetched when a request omits `logo_url`
    #[serde(default = "default_logo_url")]
    pub default_logo_url: String,
    /// Caption used when a request omits `text`
    #[serde(default = "default_text")]
    pub default_text: String,
    #[serde(default = "default_font_path")]
    pub font_path: PathBuf,
    /// Tried in order when `font_path` cannot be loaded
    #[serde(default = "default_fallback_fonts")]
    pub fallback_fonts: Vec<PathBuf>,
    /// Side length of the square output canvas (default: 1080)
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Per-asset fetch timeout in seconds (default: 30)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: u64,
    /// Maximum bytes accepted for a single downloaded asset (default: 20 MB)
    #[serde(default = "default_max_download_size")]
    pub max_download_size: usize,
    /// Decoded dimension limits, checked before full decode
    #[serde(default = "default_max_source_width")]
    pub max_source_width: u32,
    #[serde(default = "default_max_source_height")]
    pub max_source_height: u32,
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
    #[serde(default)]
    pub logo: LogoConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub gradient: GradientConfig,
    #[serde(default)]
    pub backdrop: BackdropConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_logo_url: default_logo_url(),
            default_text: default_text(),
            font_path: default_font_path(),
            fallback_fonts: default_fallback_fonts(),
            canvas_size: default_canvas_size(),
            jpeg_quality: default_jpeg_quality(),
            fetch_timeout: default_fetch_timeout(),
            max_download_size: default_max_download_size(),
            max_source_width: default_max_source_width(),
            max_source_height: default_max_source_height(),
            max_source_pixels: default_max_source_pixels(),
            logo: LogoConfig::default(),
            text: TextConfig::default(),
            gradient: GradientConfig::default(),
            backdrop: BackdropConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Font candidates in load order: `font_path` first, then the fallbacks.
    pub fn font_candidates(&self) -> Vec<PathBuf> {
        std::iter::once(self.font_path.clone())
            .chain(self.fallback_fonts.iter().cloned())
            .collect()
    }

    /// Maximum pixel width of a wrapped text line.
    pub fn max_text_width(&self) -> u32 {
        (self.canvas_size as f32 * self.text.max_width_ratio) as u32
    }
}

fn default_logo_width() -> u32 {
    DEFAULT_LOGO_WIDTH
}

fn default_logo_height() -> u32 {
    DEFAULT_LOGO_HEIGHT
}

fn default_logo_offset() -> u32 {
    DEFAULT_LOGO_OFFSET_FROM_BOTTOM
}

/// Logo target size and placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogoConfig {
    #[serde(default = "default_logo_width")]
    pub width: u32,
    #[serde(default = "default_logo_height")]
    pub height: u32,
    #[serde(default = "default_logo_offset")]
    pub offset_from_bottom: u32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            width: default_logo_width(),
            height: default_logo_height(),
            offset_from_bottom: default_logo_offset(),
        }
    }
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

fn default_max_width_ratio() -> f32 {
    DEFAULT_MAX_WIDTH_RATIO
}

fn default_gap_above_logo() -> u32 {
    DEFAULT_TEXT_GAP_ABOVE_LOGO
}

/// Caption font size, color and layout constraints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextConfig {
    /// Font size in pixels (default: 56)
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Hex color, #RGB or #RRGGBB (default: #FFFFFF)
    #[serde(default = "default_text_color")]
    pub color: String,
    /// Fraction of the canvas width available to a line (default: 0.85)
    #[serde(default = "default_max_width_ratio")]
    pub max_width_ratio: f32,
    /// Gap between the last line and the logo's top edge (default: 42)
    #[serde(default = "default_gap_above_logo")]
    pub gap_above_logo: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            color: default_text_color(),
            max_width_ratio: default_max_width_ratio(),
            gap_above_logo: default_gap_above_logo(),
        }
    }
}

fn default_gradient_max_alpha() -> u8 {
    DEFAULT_GRADIENT_MAX_ALPHA
}

/// Darkening gradient over the bottom band of the canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GradientConfig {
    /// Opacity reached at the bottom row (default: 204, i.e. 80% black)
    #[serde(default = "default_gradient_max_alpha")]
    pub max_alpha: u8,
    /// Band height in pixels; `None` covers the bottom half of the canvas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_height: Option<u32>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            max_alpha: default_gradient_max_alpha(),
            band_height: None,
        }
    }
}

impl GradientConfig {
    /// Resolve the band height for a canvas of the given height.
    pub fn band_height_for(&self, canvas_height: u32) -> u32 {
        self.band_height.unwrap_or(canvas_height / 2)
    }
}

fn default_backdrop_alpha() -> u8 {
    DEFAULT_BACKDROP_ALPHA
}

fn default_backdrop_padding() -> u32 {
    DEFAULT_BACKDROP_PADDING
}

/// Semi-transparent rectangle drawn behind the text block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackdropConfig {
    /// Draw the backdrop when a request does not say otherwise
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_backdrop_alpha")]
    pub alpha: u8,
    /// Extra space above and below the text block
    #[serde(default = "default_backdrop_padding")]
    pub padding: u32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            alpha: default_backdrop_alpha(),
            padding: default_backdrop_padding(),
        }
    }
}
