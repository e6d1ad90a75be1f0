//! Canvas compositing.
//!
//! The compositor owns a single RGBA canvas for the lifetime of one request
//! and applies, in order:
//!
//! 1. A black darkening overlay masked by a vertical gradient over the
//!    bottom band
//! 2. The logo, centered horizontally above the bottom edge, pasted through
//!    its own alpha channel
//! 3. An optional semi-transparent backdrop behind the caption
//! 4. The caption lines, each centered horizontally
//!
//! `finalize` consumes the canvas, drops the alpha channel and encodes JPEG.
//!
//! # Example
//!
//! ```ignore
//! use imprint::compositor::{build_vertical_gradient, Canvas};
//!
//! let mut canvas = Canvas::from_source(&photo, 1080)?;
//! canvas.apply_darkening_overlay(&build_vertical_gradient(1080, 540, 204));
//! let logo_pos = canvas.place_logo(&logo, ImageDimensions::new(252, 44), 50)?;
//! let jpeg = canvas.finalize(90)?;
//! ```

pub mod gradient;
pub mod resize;
pub mod text;

pub use gradient::{build_vertical_gradient, GradientMask};
pub use resize::resize_rgba;
pub use text::{draw_text, parse_hex_color, Color};

use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::EditorError;
use crate::layout::{
    centered_x, logo_position, FontFace, ImageDimensions, PlacementPosition, TextBlock,
};

/// Semi-transparent rectangle drawn behind the caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backdrop {
    pub alpha: u8,
    /// Extra rows above and below the text block
    pub padding: u32,
}

/// The in-flight image being composited.
#[derive(Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .finish()
    }
}

impl Canvas {
    /// Wrap an existing RGBA buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Flatten `source` to opaque RGB and resize it to `size × size`.
    ///
    /// Source alpha is discarded rather than blended, so transparent regions
    /// keep their stored color.
    pub fn from_source(source: &DynamicImage, size: u32) -> Result<Self, EditorError> {
        let opaque = DynamicImage::ImageRgb8(source.to_rgb8()).to_rgba8();
        let image = resize_rgba(&opaque, size, size, false)?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Composite black through `gradient` onto the bottom rows of the canvas.
    ///
    /// The mask's last row lines up with the canvas's last row and its
    /// columns start at the left edge. Parts of the mask beyond the canvas are
    /// cropped, from the top for height and from the right for width.
    pub fn apply_darkening_overlay(&mut self, gradient: &GradientMask) {
        let height = self.image.height();
        let band = gradient.height().min(height);
        let skipped = gradient.height() - band;
        let band_top = height - band;
        let columns = gradient.width().min(self.image.width());

        for row in 0..band {
            let alpha = gradient.column()[(skipped + row) as usize];
            if alpha == 0 {
                continue;
            }
            self.blend_row(band_top + row, columns, Rgba([0, 0, 0, alpha]));
        }
    }

    /// Blend a black rectangle of the given alpha over full-width rows
    /// `top..bottom`, clipped to the canvas.
    pub fn draw_backdrop(&mut self, top: i32, bottom: i32, alpha: u8) {
        let start = top.max(0) as u32;
        let end = bottom.clamp(0, self.image.height() as i32) as u32;
        if alpha == 0 {
            return;
        }
        let columns = self.image.width();
        for y in start..end {
            self.blend_row(y, columns, Rgba([0, 0, 0, alpha]));
        }
    }

    fn blend_row(&mut self, y: u32, columns: u32, color: Rgba<u8>) {
        for x in 0..columns {
            let existing = *self.image.get_pixel(x, y);
            self.image.put_pixel(x, y, blend_pixels(existing, color, 1.0));
        }
    }

    /// Resize `logo` to `size` and paste it centered, `offset_from_bottom`
    /// px above the bottom edge. Transparent logo pixels leave the canvas
    /// untouched.
    ///
    /// Returns the logo's top-left corner.
    pub fn place_logo(
        &mut self,
        logo: &DynamicImage,
        size: ImageDimensions,
        offset_from_bottom: u32,
    ) -> Result<PlacementPosition, EditorError> {
        let resized = resize_rgba(&logo.to_rgba8(), size.width, size.height, true)?;
        let position = logo_position(&self.dimensions(), &size, offset_from_bottom);
        self.paste(&resized, position);
        Ok(position)
    }

    /// Alpha-blend `layer` with its top-left corner at `position`, clipped to
    /// the canvas.
    pub fn paste(&mut self, layer: &RgbaImage, position: PlacementPosition) {
        let target_width = self.image.width() as i32;
        let target_height = self.image.height() as i32;

        let x_start = position.x.max(0);
        let y_start = position.y.max(0);
        let x_end = (position.x + layer.width() as i32).min(target_width);
        let y_end = (position.y + layer.height() as i32).min(target_height);

        for ty in y_start..y_end {
            for tx in x_start..x_end {
                let src = *layer.get_pixel((tx - position.x) as u32, (ty - position.y) as u32);
                if src[3] == 0 {
                    continue;
                }
                let dst = *self.image.get_pixel(tx as u32, ty as u32);
                self.image
                    .put_pixel(tx as u32, ty as u32, blend_pixels(dst, src, 1.0));
            }
        }
    }

    /// Draw every line of `block`, centered horizontally, starting at `top_y`
    /// and advancing by the block's line height.
    ///
    /// With a backdrop, a full-width rectangle covering the block plus
    /// padding is drawn first, clipped at the top of the canvas.
    pub fn render_text_block(
        &mut self,
        block: &TextBlock,
        font: &FontFace,
        top_y: i32,
        color: Color,
        backdrop: Option<Backdrop>,
    ) {
        if let Some(backdrop) = backdrop {
            let padding = backdrop.padding as i32;
            self.draw_backdrop(
                top_y - padding,
                top_y + block.height() as i32 + padding,
                backdrop.alpha,
            );
        }

        let mut current_y = top_y;
        for line in &block.lines {
            if !line.text.is_empty() {
                let x = centered_x(self.image.width(), line.width);
                draw_text(&mut self.image, font, &line.text, x, current_y, color);
            }
            current_y += block.line_height as i32;
        }
    }

    /// Drop the alpha channel and encode the canvas as JPEG.
    ///
    /// Output is deterministic for a given canvas and quality.
    pub fn finalize(self, quality: u8) -> Result<Vec<u8>, EditorError> {
        use image::codecs::jpeg::JpegEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        let (width, height) = self.image.dimensions();
        let rgb_data = rgba_to_rgb(self.image.as_raw());

        let mut output = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100));

        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
            .map_err(|e| EditorError::Encoding(e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// Convert RGBA pixel data to RGB by dropping the alpha channel.
fn rgba_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
pub(crate) fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    // Porter-Duff "over" operator
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
