//! Fixed visual resources every tile is rendered from
//!
//! The base sprite and the alpha mask share the tile canvas. Each of the four
//! spot stencils sits at a hard-coded offset and may move up to 15 pixels right
//! and down from it, so validation checks the stencil fits at its furthest
//! placement. Assets are immutable after loading and are shared by reference
//! across all workers.

use crate::io::configuration::{
    ALPHA_MASK_FILE, BASE_SPRITE_FILE, MAX_COORDINATE, SPOT_COUNT, SPOT_OFFSETS,
    SPOT_STENCIL_FILES, TILE_HEIGHT, TILE_WIDTH,
};
use crate::io::error::{MosaicError, Result, invalid_asset};
use bitvec::prelude::*;
use image::RgbaImage;
use std::path::Path;

/// One movable spot: its opaque stencil pixels and base placement
#[derive(Debug, Clone)]
pub struct SpotStencil {
    offset: (u32, u32),
    width: u32,
    height: u32,
    // Stencil-local coordinates whose alpha is fully opaque
    opaque: Vec<(u32, u32)>,
}

impl SpotStencil {
    fn from_image(image: &RgbaImage, offset: (u32, u32)) -> Self {
        let opaque = image
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel.0[3] == u8::MAX)
            .map(|(x, y, _)| (x, y))
            .collect();

        Self {
            offset,
            width: image.width(),
            height: image.height(),
            opaque,
        }
    }

    /// Base placement of the stencil's top-left corner on the tile canvas
    pub const fn offset(&self) -> (u32, u32) {
        self.offset
    }

    /// Stencil dimensions (width, height)
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Stencil-local coordinates of fully opaque pixels
    pub fn opaque_pixels(&self) -> &[(u32, u32)] {
        &self.opaque
    }
}

/// Base sprite, alpha mask and spot stencils for rendering tiles
#[derive(Debug, Clone)]
pub struct PatternAssets {
    base: RgbaImage,
    mask: RgbaImage,
    // Canvas pixels where the mask alpha is non-zero, row-major
    visible: BitVec,
    spots: [SpotStencil; SPOT_COUNT],
}

impl PatternAssets {
    /// Validate in-memory images and assemble the asset set
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The base sprite or alpha mask is not exactly the tile canvas size
    /// - A spot stencil would extend past the canvas at its furthest placement
    pub fn from_images(
        base: RgbaImage,
        mask: RgbaImage,
        spots: [RgbaImage; SPOT_COUNT],
    ) -> Result<Self> {
        check_canvas("base sprite", &base)?;
        check_canvas("alpha mask", &mask)?;

        let reach = u32::from(MAX_COORDINATE);
        for (index, (stencil, &(offset_x, offset_y))) in
            spots.iter().zip(SPOT_OFFSETS.iter()).enumerate()
        {
            let right = offset_x + reach + stencil.width();
            let bottom = offset_y + reach + stencil.height();
            if right > TILE_WIDTH || bottom > TILE_HEIGHT {
                return Err(invalid_asset(
                    &format!("spot {}", index + 1),
                    &format!(
                        "{}x{} stencil at ({offset_x}, {offset_y}) reaches ({right}, {bottom}) \
                         beyond the {TILE_WIDTH}x{TILE_HEIGHT} canvas",
                        stencil.width(),
                        stencil.height()
                    ),
                ));
            }
        }

        let mut offsets = SPOT_OFFSETS.iter();
        let spots = spots.map(|image| {
            let offset = offsets.next().copied().unwrap_or_default();
            SpotStencil::from_image(&image, offset)
        });

        let visible = mask.pixels().map(|pixel| pixel.0[3] != 0).collect();

        Ok(Self {
            base,
            mask,
            visible,
            spots,
        })
    }

    /// Load the asset set from a directory
    ///
    /// Expects `base.png`, `mask.png` and `spots/spot_1.png` through
    /// `spots/spot_4.png`.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be decoded or fails validation
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let base = load_rgba(&dir.join(BASE_SPRITE_FILE))?;
        let mask = load_rgba(&dir.join(ALPHA_MASK_FILE))?;

        let [s1, s2, s3, s4] = SPOT_STENCIL_FILES;
        let spots = [
            load_rgba(&dir.join(s1))?,
            load_rgba(&dir.join(s2))?,
            load_rgba(&dir.join(s3))?,
            load_rgba(&dir.join(s4))?,
        ];

        let assets = Self::from_images(base, mask, spots)?;
        log::info!("Loaded pattern assets from {}", dir.display());
        Ok(assets)
    }

    /// Full-colour background sprite
    pub const fn base(&self) -> &RgbaImage {
        &self.base
    }

    /// Image supplying spot colours; its alpha marks the patterned area
    pub const fn mask(&self) -> &RgbaImage {
        &self.mask
    }

    /// Row-major visibility of every canvas pixel under the alpha mask
    pub fn visible(&self) -> &BitSlice {
        &self.visible
    }

    /// The four spot stencils in identifier order
    pub const fn spots(&self) -> &[SpotStencil; SPOT_COUNT] {
        &self.spots
    }
}

fn check_canvas(asset: &str, image: &RgbaImage) -> Result<()> {
    if image.dimensions() == (TILE_WIDTH, TILE_HEIGHT) {
        Ok(())
    } else {
        Err(invalid_asset(
            &asset,
            &format!(
                "expected {TILE_WIDTH}x{TILE_HEIGHT}, found {}x{}",
                image.width(),
                image.height()
            ),
        ))
    }
}

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| MosaicError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })
}
