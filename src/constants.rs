// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Configuration structs source their serde defaults from here.

// =============================================================================
// Server defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listening port
pub const DEFAULT_PORT: u16 = 10000;

/// Default whole-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default maximum request body size (1 MB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Liveness string returned by `GET /`
pub const LIVENESS_MESSAGE: &str = "Image editor is running!";

// =============================================================================
// Asset retrieval defaults
// =============================================================================

/// Logo used when a request does not carry `logo_url`
pub const DEFAULT_LOGO_URL: &str = "https://i.postimg.cc/pLmxYnmy/image-1.png";

/// Default per-fetch timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default maximum downloaded asset size (20 MB)
pub const DEFAULT_MAX_DOWNLOAD_SIZE: usize = 20 * 1024 * 1024;

/// Largest decoded source width/height accepted, checked from the header
pub const DEFAULT_MAX_SOURCE_WIDTH: u32 = 10_000;
pub const DEFAULT_MAX_SOURCE_HEIGHT: u32 = 10_000;

/// Largest decoded source area accepted (100 megapixels)
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 100_000_000;

// =============================================================================
// Canvas and encoding defaults
// =============================================================================

/// Side length of the square output canvas
pub const DEFAULT_CANVAS_SIZE: u32 = 1080;

/// JPEG quality of the encoded output
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

// =============================================================================
// Logo defaults
// =============================================================================

pub const DEFAULT_LOGO_WIDTH: u32 = 252;
pub const DEFAULT_LOGO_HEIGHT: u32 = 44;

/// Distance between the logo's bottom edge and the canvas bottom
pub const DEFAULT_LOGO_OFFSET_FROM_BOTTOM: u32 = 50;

// =============================================================================
// Text defaults
// =============================================================================

/// Caption used when a request does not carry `text`
pub const DEFAULT_TEXT: &str = "Default Text";

pub const DEFAULT_FONT_PATH: &str = "Montserrat-Bold.ttf";

/// Fonts tried in order when `font_path` cannot be loaded
pub const DEFAULT_FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

pub const DEFAULT_FONT_SIZE: f32 = 56.0;

pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";

/// Wrapped lines may use at most this fraction of the canvas width
pub const DEFAULT_MAX_WIDTH_RATIO: f32 = 0.85;

/// Vertical gap between the last text line and the logo's top edge
pub const DEFAULT_TEXT_GAP_ABOVE_LOGO: u32 = 42;

/// Reference glyphs covering both ascenders and descenders
pub const LINE_HEIGHT_REFERENCE: &str = "Ay";

// =============================================================================
// Gradient and backdrop defaults
// =============================================================================

/// Opacity of the darkening gradient at the canvas bottom (80% black)
pub const DEFAULT_GRADIENT_MAX_ALPHA: u8 = 204;

pub const DEFAULT_BACKDROP_ALPHA: u8 = 128;

pub const DEFAULT_BACKDROP_PADDING: u32 = 20;
