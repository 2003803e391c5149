//! Mosaics of spotted pattern tiles fitted to source images
//!
//! Every tile is a base sprite carrying four movable spots. A tile's layout is
//! eight 4-bit coordinates packed into a 32-bit identifier. For each grid cell
//! of a source image a bounded quasi-Newton search picks the layout whose
//! black-and-white pattern best matches the cell, and the winning full-colour
//! tiles are composited into one mosaic.

#![forbid(unsafe_code)]

/// Input/output operations and error handling
pub mod io;
/// Grid layout and parallel mosaic assembly
pub mod mosaic;
/// Spot layouts, rendering assets and scoring
pub mod pattern;
/// Per-tile parameter search
pub mod search;

pub use io::error::{MosaicError, Result};
