//! Placement of tiles over a source image
//!
//! Neighbouring tiles are 25 pixels apart horizontally and 20 vertically while
//! each one samples a 35x33 region, so samples overlap. Samples that run past
//! the edge of the source read as black.

use crate::io::configuration::{
    CANVAS_MARGIN_X, CANVAS_MARGIN_Y, GRID_PAD_X, GRID_PAD_Y, REGION_HEIGHT, REGION_WIDTH,
    STRIDE_X, STRIDE_Y,
};
use image::{Rgb, RgbImage};

/// Number of tile columns and rows covering an image
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MosaicGrid {
    /// Tile columns
    pub num_x: u32,
    /// Tile rows
    pub num_y: u32,
}

impl MosaicGrid {
    /// Grid for a source image of `width` x `height` pixels
    pub const fn for_image(width: u32, height: u32) -> Self {
        Self {
            num_x: (width + GRID_PAD_X) / STRIDE_X,
            num_y: (height + GRID_PAD_Y) / STRIDE_Y,
        }
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.num_x as usize * self.num_y as usize
    }

    /// Whether the grid holds no cells at all
    pub const fn is_empty(&self) -> bool {
        self.num_x == 0 || self.num_y == 0
    }

    /// Output canvas size (width, height)
    pub const fn canvas_size(&self) -> (u32, u32) {
        (
            CANVAS_MARGIN_X + self.num_x * STRIDE_X,
            CANVAS_MARGIN_Y + self.num_y * STRIDE_Y,
        )
    }

    /// Pixel offset of cell (x, y) in both the source and the canvas
    pub const fn cell_origin(x: u32, y: u32) -> (u32, u32) {
        (x * STRIDE_X, y * STRIDE_Y)
    }

    /// Every cell coordinate, columns outermost
    pub fn cells(&self) -> Vec<(u32, u32)> {
        (0..self.num_x)
            .flat_map(|x| (0..self.num_y).map(move |y| (x, y)))
            .collect()
    }
}

/// Copy the 35x33 sample for cell (x, y), padding with black past the edges
pub fn extract_region(source: &RgbImage, x: u32, y: u32) -> RgbImage {
    let (left, top) = MosaicGrid::cell_origin(x, y);
    RgbImage::from_fn(REGION_WIDTH, REGION_HEIGHT, |dx, dy| {
        source
            .get_pixel_checked(left + dx, top + dy)
            .copied()
            .unwrap_or(Rgb([0, 0, 0]))
    })
}
