//! Vertical alpha gradient used to darken the bottom of the canvas.

/// Single-channel blend weights, one value per row, uniform across the
/// `width` columns it covers.
///
/// Row `y` of an `h`-row mask has alpha `floor(max_alpha * y / (h - 1))`:
/// 0 at the top, `max_alpha` at the bottom, monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientMask {
    column: Vec<u8>,
    width: u32,
}

impl GradientMask {
    /// Build a top-to-bottom gradient of `height` rows stretched to `width`.
    pub fn vertical(width: u32, height: u32, max_alpha: u8) -> Self {
        let column = match height {
            0 => Vec::new(),
            1 => vec![max_alpha],
            _ => {
                let last = (height - 1) as u64;
                (0..height as u64)
                    .map(|y| (max_alpha as u64 * y / last) as u8)
                    .collect()
            }
        };

        Self { column, width }
    }

    /// Columns covered, counted from the left edge.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.column.len() as u32
    }

    /// Alpha of row `y`, or `None` past the last row.
    pub fn alpha_at(&self, y: u32) -> Option<u8> {
        self.column.get(y as usize).copied()
    }

    /// Per-row alpha values, top to bottom.
    pub fn column(&self) -> &[u8] {
        &self.column
    }
}

/// Build the darkening mask for a band of `height` rows across `width`.
pub fn build_vertical_gradient(width: u32, height: u32, max_alpha: u8) -> GradientMask {
    GradientMask::vertical(width, height, max_alpha)
}
