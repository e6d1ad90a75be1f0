//! Text layout for captions.
//!
//! Measures glyph runs, greedily wraps text to a maximum pixel width and
//! computes where the wrapped block sits relative to an anchor point.
//!
//! # Example
//!
//! ```ignore
//! use imprint::layout::{layout_text_block, FontFace};
//!
//! let font = FontFace::load(Path::new("Montserrat-Bold.ttf"), 56.0)?;
//! let block = layout_text_block("Hello World", &font, 918);
//! assert_eq!(block.lines.len(), 1);
//! ```

pub mod font;
pub mod position;

pub use font::FontFace;
pub use position::{
    centered_x, compute_block_placement, logo_position, BlockPlacement, ImageDimensions,
    PlacementPosition,
};

use crate::constants::LINE_HEIGHT_REFERENCE;

/// Anything that can report the rendered size of a string.
pub trait TextMeasure {
    /// Rendered width of `text` in pixels.
    fn text_width(&self, text: &str) -> u32;

    /// Bottom edge of `text`'s bounding box, measured from the top of the line.
    fn text_bottom(&self, text: &str) -> u32;
}

/// A single wrapped line and its measured width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub width: u32,
}

/// A wrapped caption ready to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
    /// Uniform pitch between consecutive lines
    pub line_height: u32,
    /// Width constraint the block was wrapped against
    pub max_width: u32,
}

impl TextBlock {
    /// Total block height (`lines × line_height`).
    pub fn height(&self) -> u32 {
        self.line_height * self.lines.len() as u32
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Split `text` into lines no wider than `max_width`.
///
/// Words are filled greedily. A word wider than `max_width` on its own is
/// kept whole on its own line. Empty or whitespace-only input yields a single
/// empty line.
pub fn wrap<M: TextMeasure + ?Sized>(text: &str, font: &M, max_width: u32) -> Vec<String> {
    let mut words = text.split_whitespace();

    let mut current = match words.next() {
        Some(word) => word.to_string(),
        None => return vec![String::new()],
    };

    let mut lines = Vec::new();
    for word in words {
        let candidate = format!("{} {}", current, word);
        if font.text_width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);

    lines
}

/// Uniform line pitch for a font, taken from a reference string with both
/// ascenders and descenders.
pub fn measure_line_height<M: TextMeasure + ?Sized>(font: &M) -> u32 {
    font.text_bottom(LINE_HEIGHT_REFERENCE)
}

/// Wrap and measure `text` in one step.
pub fn layout_text_block<M: TextMeasure + ?Sized>(
    text: &str,
    font: &M,
    max_width: u32,
) -> TextBlock {
    let lines = wrap(text, font, max_width)
        .into_iter()
        .map(|line| {
            let width = font.text_width(&line);
            TextLine { text: line, width }
        })
        .collect();

    TextBlock {
        lines,
        line_height: measure_line_height(font),
        max_width,
    }
}
