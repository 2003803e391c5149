//! Tile patterns: identifiers, assets, rendering and scoring

/// Fixed sprite, mask and spot stencil resources
pub mod assets;
/// Identifier packing for spot layouts
pub mod codec;
/// Full-colour and pattern-only tile rendering
pub mod render;
/// Difference scoring against source regions
pub mod score;

pub use assets::PatternAssets;
pub use codec::SpotParameters;
