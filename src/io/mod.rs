//! Command line, files, progress, configuration and errors

/// Frame directory processing
pub mod batch;
/// Command-line interface definition and dispatch
pub mod cli;
/// Geometry, search and layout constants
pub mod configuration;
/// Error types
pub mod error;
/// Source image loading and mosaic export
pub mod image;
/// Progress bars for frames and tiles
pub mod progress;
