//! Caption text rendering.
//!
//! Draws glyph runs straight onto the canvas with anti-aliased coverage
//! blended over the existing pixels.

use image::{Rgba, RgbaImage};

use super::blend_pixels;
use crate::layout::FontFace;

/// Parsed RGB color from hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White color.
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Black color.
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

/// Parse a hex color string into RGB components.
///
/// Supports both #RGB and #RRGGBB formats.
///
/// # Examples
///
/// ```ignore
/// let white = parse_hex_color("#FFF").unwrap();
/// assert_eq!(white, Color::new(255, 255, 255));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, String> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| "Color must start with '#'".to_string())?;

    if !hex.is_ascii() {
        return Err("Invalid hex digit".to_string());
    }

    let component =
        |s: &str| u8::from_str_radix(s, 16).map_err(|_| "Invalid hex digit".to_string());

    match hex.len() {
        // #RGB: each digit doubled, 0xF -> 0xFF
        3 => Ok(Color::new(
            component(&hex[0..1])? * 17,
            component(&hex[1..2])? * 17,
            component(&hex[2..3])? * 17,
        )),
        6 => Ok(Color::new(
            component(&hex[0..2])?,
            component(&hex[2..4])?,
            component(&hex[4..6])?,
        )),
        _ => Err(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            hex.len()
        )),
    }
}

/// Draw one line of text with its top-left corner at `(x, y)`.
///
/// Pixels falling outside `target` are clipped.
pub fn draw_text(
    target: &mut RgbaImage,
    font: &FontFace,
    text: &str,
    x: i32,
    y: i32,
    color: Color,
) {
    let (width, height) = (target.width() as i32, target.height() as i32);

    font.rasterize(text, x as f32, y as f32, |px, py, coverage| {
        if px < 0 || py < 0 || px >= width || py >= height {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * 255.0) as u8;
        if alpha == 0 {
            return;
        }
        let existing = *target.get_pixel(px as u32, py as u32);
        target.put_pixel(
            px as u32,
            py as u32,
            blend_pixels(existing, color.with_alpha(alpha), 1.0),
        );
    });
}
