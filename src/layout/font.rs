//! Outline font loading and glyph metrics.
//!
//! Fonts are loaded once at startup from a configured path, falling back to a
//! list of system fonts. Measurement follows the bounding-box convention used
//! for caption layout: the origin is the top-left corner of the line, with the
//! baseline one ascent below it.

use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};
use std::path::{Path, PathBuf};

use super::TextMeasure;
use crate::error::EditorError;

/// An outline font at a fixed pixel size.
pub struct FontFace {
    font: FontVec,
    scale: PxScale,
    source: Option<PathBuf>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("size", &self.scale.y)
            .field("source", &self.source)
            .finish()
    }
}

impl FontFace {
    /// Parse font data (TrueType or OpenType) at the given pixel size.
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self, EditorError> {
        let font = FontVec::try_from_vec(data)
            .map_err(|e| EditorError::FontLoad(format!("invalid font data: {}", e)))?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
            source: None,
        })
    }

    /// Load a font file from disk.
    pub fn load(path: &Path, size: f32) -> Result<Self, EditorError> {
        let data = std::fs::read(path)
            .map_err(|e| EditorError::FontLoad(format!("{}: {}", path.display(), e)))?;
        let mut face = Self::from_bytes(data, size)
            .map_err(|e| EditorError::FontLoad(format!("{}: {}", path.display(), e)))?;
        face.source = Some(path.to_path_buf());
        Ok(face)
    }

    /// Load the first candidate that parses.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::FontLoad` listing every attempted path when no
    /// candidate can be loaded.
    pub fn load_first(candidates: &[PathBuf], size: f32) -> Result<Self, EditorError> {
        let mut failures = Vec::new();
        for path in candidates {
            match Self::load(path, size) {
                Ok(face) => return Ok(face),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Font candidate rejected");
                    failures.push(path.display().to_string());
                }
            }
        }
        Err(EditorError::FontLoad(format!(
            "no usable font among [{}]",
            failures.join(", ")
        )))
    }

    /// Path the font was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn size(&self) -> f32 {
        self.scale.y
    }

    pub fn ascent(&self) -> f32 {
        self.font.as_scaled(self.scale).ascent()
    }

    /// Lay out `text` on a single line whose top-left corner is at `(x, y)`.
    ///
    /// Returns the positioned glyphs and the final caret position.
    fn layout_line(&self, text: &str, x: f32, y: f32) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let baseline_y = y + scaled.ascent();

        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = x;
        let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = prev_glyph {
                caret += scaled.kern(prev, glyph_id);
            }
            glyphs.push(glyph_id.with_scale_and_position(self.scale, point(caret, baseline_y)));
            caret += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        (glyphs, caret)
    }

    /// Rasterize `text` with its line's top-left corner at `(x, y)`.
    ///
    /// `plot` receives absolute pixel coordinates and coverage in `0.0..=1.0`.
    /// Coordinates may fall outside any target; clipping is the caller's job.
    pub fn rasterize<F>(&self, text: &str, x: f32, y: f32, mut plot: F)
    where
        F: FnMut(i32, i32, f32),
    {
        let (glyphs, _) = self.layout_line(text, x, y);
        for glyph in glyphs {
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    plot(
                        px as i32 + bounds.min.x as i32,
                        py as i32 + bounds.min.y as i32,
                        coverage,
                    );
                });
            }
        }
    }
}

impl TextMeasure for FontFace {
    fn text_width(&self, text: &str) -> u32 {
        let (_, caret) = self.layout_line(text, 0.0, 0.0);
        caret.max(0.0).ceil() as u32
    }

    fn text_bottom(&self, text: &str) -> u32 {
        let (glyphs, _) = self.layout_line(text, 0.0, 0.0);
        glyphs
            .into_iter()
            .filter_map(|g| self.font.outline_glyph(g))
            .map(|outlined| outlined.px_bounds().max.y)
            .fold(0.0f32, f32::max)
            .ceil() as u32
    }
}
