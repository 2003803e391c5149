//! Tile rendering from a spot layout
//!
//! A pixel belongs to the foreground when some spot stencil is fully opaque
//! there and the tile's alpha mask is not transparent. Every output channel is
//! taken whole from either the foreground or the background source; pixels are
//! never blended.

use crate::io::configuration::{
    CROP_BOTTOM, CROP_LEFT, CROP_RIGHT, CROP_TOP, REGION_HEIGHT, REGION_WIDTH, TILE_HEIGHT,
    TILE_WIDTH,
};
use crate::pattern::assets::PatternAssets;
use crate::pattern::codec::SpotParameters;
use bitvec::prelude::*;
use image::{Rgb, RgbImage, Rgba, RgbaImage};

const PATTERN_FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PATTERN_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Colour sources used when rendering a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Spots coloured from the mask image over the base sprite
    FullColor,
    /// White spots on opaque black, used for scoring
    PatternOnly,
}

/// Foreground membership of every tile canvas pixel for one layout
#[derive(Clone, Debug)]
pub struct PatternMask {
    bits: BitVec,
}

impl PatternMask {
    /// Compute the foreground for `parameters`
    pub fn new(assets: &PatternAssets, parameters: &SpotParameters) -> Self {
        let mut occupied = bitvec![0; (TILE_WIDTH * TILE_HEIGHT) as usize];

        for (index, stencil) in assets.spots().iter().enumerate() {
            let (dx, dy) = parameters.spot(index).unwrap_or_default();
            let (base_x, base_y) = stencil.offset();
            let left = base_x + u32::from(dx);
            let top = base_y + u32::from(dy);

            for &(sx, sy) in stencil.opaque_pixels() {
                let (x, y) = (left + sx, top + sy);
                if x < TILE_WIDTH && y < TILE_HEIGHT {
                    occupied.set((y * TILE_WIDTH + x) as usize, true);
                }
            }
        }

        occupied &= assets.visible();

        Self { bits: occupied }
    }

    /// Whether canvas pixel (x, y) takes the foreground source
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        x < TILE_WIDTH
            && y < TILE_HEIGHT
            && self
                .bits
                .get((y * TILE_WIDTH + x) as usize)
                .as_deref()
                == Some(&true)
    }

    /// Number of foreground pixels on the canvas
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }
}

/// Render a tile for `parameters`
///
/// With `crop` set only the comparison interior (17,15)-(52,48) is returned.
pub fn render(
    assets: &PatternAssets,
    parameters: &SpotParameters,
    mode: RenderMode,
    crop: bool,
) -> RgbaImage {
    let foreground = PatternMask::new(assets, parameters);

    let pick = |x: u32, y: u32| -> Rgba<u8> {
        let fg = foreground.is_foreground(x, y);
        match mode {
            RenderMode::FullColor if fg => *assets.mask().get_pixel(x, y),
            RenderMode::FullColor => *assets.base().get_pixel(x, y),
            RenderMode::PatternOnly if fg => PATTERN_FOREGROUND,
            RenderMode::PatternOnly => PATTERN_BACKGROUND,
        }
    };

    if crop {
        RgbaImage::from_fn(CROP_RIGHT - CROP_LEFT, CROP_BOTTOM - CROP_TOP, |x, y| {
            pick(x + CROP_LEFT, y + CROP_TOP)
        })
    } else {
        RgbaImage::from_fn(TILE_WIDTH, TILE_HEIGHT, pick)
    }
}

/// Cropped pattern-only render without alpha, the image a region is scored against
pub fn render_pattern_rgb(assets: &PatternAssets, parameters: &SpotParameters) -> RgbImage {
    let foreground = PatternMask::new(assets, parameters);
    RgbImage::from_fn(REGION_WIDTH, REGION_HEIGHT, |x, y| {
        if foreground.is_foreground(x + CROP_LEFT, y + CROP_TOP) {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    })
}
