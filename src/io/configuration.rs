//! Tile geometry, search constants and runtime configuration defaults

// Tile canvas geometry, shared by the base sprite and the alpha mask
/// Width of a full tile canvas in pixels
pub const TILE_WIDTH: u32 = 64;
/// Height of a full tile canvas in pixels
pub const TILE_HEIGHT: u32 = 64;

// Interior rectangle compared against the source image
/// Left edge of the comparison crop (inclusive)
pub const CROP_LEFT: u32 = 17;
/// Top edge of the comparison crop (inclusive)
pub const CROP_TOP: u32 = 15;
/// Right edge of the comparison crop (exclusive)
pub const CROP_RIGHT: u32 = 52;
/// Bottom edge of the comparison crop (exclusive)
pub const CROP_BOTTOM: u32 = 48;
/// Width of the comparison region
pub const REGION_WIDTH: u32 = CROP_RIGHT - CROP_LEFT;
/// Height of the comparison region
pub const REGION_HEIGHT: u32 = CROP_BOTTOM - CROP_TOP;

// Grid placement of tiles over the source image
/// Horizontal distance between neighbouring tiles
pub const STRIDE_X: u32 = 25;
/// Vertical distance between neighbouring tiles
pub const STRIDE_Y: u32 = 20;
/// Slack added to the image width before counting columns
pub const GRID_PAD_X: u32 = 10;
/// Slack added to the image height before counting rows
pub const GRID_PAD_Y: u32 = 13;
/// Extra canvas width beyond the column strides
pub const CANVAS_MARGIN_X: u32 = TILE_WIDTH - STRIDE_X;
/// Extra canvas height beyond the row strides
pub const CANVAS_MARGIN_Y: u32 = TILE_HEIGHT - STRIDE_Y;

// Spot layout
/// Number of movable spots on a tile
pub const SPOT_COUNT: usize = 4;
/// Length of a parameter vector (an x and y per spot)
pub const PARAMETER_COUNT: usize = SPOT_COUNT * 2;
/// Largest value a single spot coordinate can take
pub const MAX_COORDINATE: u8 = 15;
/// Base placement of each spot stencil within the tile canvas
pub const SPOT_OFFSETS: [(u32, u32); SPOT_COUNT] = [(8, 6), (32, 7), (14, 24), (26, 25)];

// Fast path thresholds on a 0-255 scale
/// Every channel at or above this value marks a light region
pub const LIGHT_THRESHOLD: u8 = 128;
/// Every colour channel at or below this value marks a dark region
pub const DARK_THRESHOLD: u8 = 127;

// Bounded solver stopping criteria
/// Iteration cap for a single tile search
pub const SOLVER_MAX_ITERATIONS: usize = 100;
/// Number of curvature pairs kept by the quasi-Newton update
pub const SOLVER_MEMORY: usize = 10;
/// Maximum backtracking steps per line search
pub const SOLVER_MAX_LINE_SEARCH: usize = 20;
/// Projected gradient tolerance (infinity norm)
pub const SOLVER_GRADIENT_TOLERANCE: f64 = 1e-5;
/// Relative objective reduction tolerance
pub const SOLVER_FUNCTION_TOLERANCE: f64 = 2.220_446_049_250_313e-9;

// Worker pool
/// Worker count used when hardware parallelism cannot be queried
pub const FALLBACK_WORKERS: usize = 2;

// Asset layout inside the asset directory
/// Default asset directory
pub const DEFAULT_ASSET_DIR: &str = "res";
/// Base sprite file name
pub const BASE_SPRITE_FILE: &str = "base.png";
/// Alpha mask file name
pub const ALPHA_MASK_FILE: &str = "mask.png";
/// Spot stencil file names, relative to the asset directory
pub const SPOT_STENCIL_FILES: [&str; SPOT_COUNT] = [
    "spots/spot_1.png",
    "spots/spot_2.png",
    "spots/spot_3.png",
    "spots/spot_4.png",
];

// Batch output naming
/// Prefix of every frame output file
pub const FRAME_PREFIX: &str = "frame";
/// Sub-directory of the output directory holding identifier matrices
pub const IDS_DIR: &str = "ids";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
