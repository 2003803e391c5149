//! Dissimilarity between a rendered pattern and a source region

use crate::io::configuration::{CROP_LEFT, CROP_TOP, REGION_HEIGHT, REGION_WIDTH};
use crate::io::error::{MosaicError, Result};
use crate::pattern::assets::PatternAssets;
use crate::pattern::codec::SpotParameters;
use crate::pattern::render::PatternMask;
use image::RgbImage;

/// Ensure `region` has the comparison crop's dimensions
///
/// # Errors
///
/// Returns [`MosaicError::RegionMismatch`] when the sizes differ
pub fn check_region(region: &RgbImage) -> Result<()> {
    let actual = region.dimensions();
    if actual == (REGION_WIDTH, REGION_HEIGHT) {
        Ok(())
    } else {
        Err(MosaicError::RegionMismatch {
            expected: (REGION_WIDTH, REGION_HEIGHT),
            actual,
        })
    }
}

/// Sum of absolute channel differences against the pattern render, divided by 3
///
/// Compares `region` with the cropped pattern-only render of `parameters`.
/// Lower is better and 0 is an exact match.
///
/// # Errors
///
/// Returns [`MosaicError::RegionMismatch`] if `region` is not 35x33
pub fn score(assets: &PatternAssets, parameters: &SpotParameters, region: &RgbImage) -> Result<f64> {
    check_region(region)?;
    Ok(score_unchecked(assets, parameters, region))
}

// Callers must have validated the region size
pub(crate) fn score_unchecked(
    assets: &PatternAssets,
    parameters: &SpotParameters,
    region: &RgbImage,
) -> f64 {
    let foreground = PatternMask::new(assets, parameters);

    let total: u64 = region
        .enumerate_pixels()
        .map(|(x, y, pixel)| {
            let rendered: u8 = if foreground.is_foreground(x + CROP_LEFT, y + CROP_TOP) {
                255
            } else {
                0
            };
            pixel
                .0
                .iter()
                .map(|&channel| u64::from(channel.abs_diff(rendered)))
                .sum::<u64>()
        })
        .sum();

    total as f64 / 3.0
}
