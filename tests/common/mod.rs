// Fixtures shared by the unit and integration suites and the benchmarks

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imprint::constants::DEFAULT_FALLBACK_FONTS;
use imprint::layout::FontFace;
use std::io::Cursor;
use std::path::PathBuf;

/// Environment variable naming an outline font for tests and benchmarks.
pub const TEST_FONT_ENV: &str = "IMPRINT_TEST_FONT";

/// Font candidates: `IMPRINT_TEST_FONT` first, then the default fallbacks.
pub fn font_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::env::var(TEST_FONT_ENV)
        .map(|p| vec![PathBuf::from(p)])
        .unwrap_or_default();
    candidates.extend(DEFAULT_FALLBACK_FONTS.iter().map(PathBuf::from));
    candidates
}

/// Load a real outline font, panicking with setup instructions when none is
/// installed. Tests calling this are `#[ignore]`d by default.
pub fn require_font(size: f32) -> FontFace {
    FontFace::load_first(&font_candidates(), size).unwrap_or_else(|e| {
        panic!("{e}; install DejaVu Sans Bold or set {TEST_FONT_ENV} to a .ttf file")
    })
}

pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    buffer.into_inner()
}
