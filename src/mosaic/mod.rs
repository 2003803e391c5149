//! Mosaic layout, parallel assembly and identifier output

/// Parallel tile fitting and canvas composition
pub mod assembler;
/// Grid arithmetic and source sampling
pub mod grid;
/// Identifier matrix storage and serialization
pub mod matrix;

pub use assembler::{Mosaic, MosaicAssembler};
pub use grid::MosaicGrid;
pub use matrix::IdentifierMatrix;
