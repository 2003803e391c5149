//! Source image loading and mosaic image export

use crate::io::error::{MosaicError, Result, file_system};
use image::{RgbImage, RgbaImage};
use std::path::Path;

/// Load an image as 8-bit RGB, dropping any alpha channel
///
/// With `invert` every channel is flipped before the image is returned.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_target(path: &Path, invert: bool) -> Result<RgbImage> {
    let img = image::open(path).map_err(|source| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rgb = img.to_rgb8();
    if invert {
        invert_colors(&mut rgb);
    }
    Ok(rgb)
}

/// Flip every channel of every pixel
pub fn invert_colors(image: &mut RgbImage) {
    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0 {
            *channel = u8::MAX - *channel;
        }
    }
}

/// Save a composited mosaic, creating the parent directory if needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_mosaic(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(file_system(parent, "create directory"))?;
    }

    image.save(path).map_err(|source| MosaicError::ImageExport {
        path: path.to_path_buf(),
        source,
    })
}
