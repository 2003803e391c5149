//! Numerical search for best-fitting spot layouts

/// Fast paths and unit-step gradient search per tile
pub mod optimizer;
/// Bounded quasi-Newton minimiser
pub mod solver;

pub use optimizer::{TileFit, TileOptimizer};
