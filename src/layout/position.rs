//! Placement geometry for the logo and the caption block.
//!
//! All coordinates are signed: an element larger than the space available
//! ends up partially off-canvas rather than being clamped.
//!
//! # Example
//!
//! ```ignore
//! use imprint::layout::position::{logo_position, ImageDimensions};
//!
//! let canvas = ImageDimensions { width: 1080, height: 1080 };
//! let logo = ImageDimensions { width: 252, height: 44 };
//!
//! let pos = logo_position(&canvas, &logo, 50);
//! assert_eq!((pos.x, pos.y), (414, 986)); // (1080 - 252) / 2, 1080 - 44 - 50
//! ```

/// Width and height of an image or canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left corner where an element is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Vertical extent of a text block, as line origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlacement {
    /// Top of the first line
    pub top_y: i32,
    /// Top of the last line
    pub bottom_y: i32,
}

/// Left edge that centers an item of `item` width inside `container`.
///
/// Uses floor division, so an item wider than its container gets a negative
/// offset that still centers it.
pub fn centered_x(container: u32, item: u32) -> i32 {
    (container as i32 - item as i32).div_euclid(2)
}

/// Logo position: horizontally centered, `offset_from_bottom` px above the
/// canvas bottom edge.
pub fn logo_position(
    canvas: &ImageDimensions,
    logo: &ImageDimensions,
    offset_from_bottom: u32,
) -> PlacementPosition {
    PlacementPosition::new(
        centered_x(canvas.width, logo.width),
        canvas.height as i32 - logo.height as i32 - offset_from_bottom as i32,
    )
}

/// Stack `num_lines` lines upward so the last one ends `gap` px above
/// `anchor_y`.
///
/// A block with zero lines is treated as a single line.
pub fn compute_block_placement(
    num_lines: usize,
    line_height: u32,
    anchor_y: i32,
    gap: u32,
) -> BlockPlacement {
    let line_height = line_height as i32;
    let bottom_y = anchor_y - gap as i32 - line_height;
    let top_y = bottom_y - (num_lines.max(1) as i32 - 1) * line_height;

    BlockPlacement { top_y, bottom_y }
}
