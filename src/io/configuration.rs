//! Generation constants and runtime configuration defaults

use crate::spatial::Position;

// Tile identities
/// Empty-space tile, also the closed-world default neighbor
pub const AIR_TILE: usize = 0;
/// Layout value marking a position whose tile is not yet known
pub const UNDETERMINED_TILE: i32 = -1;

// Built-in sample: a column standing in air
/// Sample extents `[x, y, z]`
pub const DEFAULT_SAMPLE_DIMENSIONS: [usize; 3] = [4, 4, 4];
/// Non-air tiles of the built-in sample, bottom to top
pub const DEFAULT_SAMPLE_TILES: [(Position, i32); 4] = [
    ([2, 0, 2], 3),
    ([2, 1, 2], 2),
    ([2, 2, 2], 2),
    ([2, 3, 2], 1),
];
/// Number of tiles in the built-in catalog
pub const DEFAULT_CATALOG_SIZE: usize = 4;

/// Default target extents `[x, y, z]`
pub const DEFAULT_TARGET_DIMENSIONS: [usize; 3] = [6, 6, 6];

// Safety limit to prevent excessive memory allocation
/// Maximum number of cells in one grid
pub const MAX_GRID_VOLUME: usize = 16_777_216;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;
/// Generation attempts before giving up on contradictions
///
/// Roughly one seed in 125 completes the built-in column without a
/// contradiction.
pub const DEFAULT_MAX_ATTEMPTS: usize = 2000;

// Progress bar display settings
/// Threshold for switching to a single batch bar
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 5;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
/// Transparent gap between layers in exported images, in pixels
pub const LAYER_GAP_PIXELS: u32 = 1;

/// Colors for the built-in catalog: air, cap, shaft, base
pub const DEFAULT_PALETTE: [[u8; 4]; DEFAULT_CATALOG_SIZE] = [
    [0, 0, 0, 0],
    [214, 92, 64, 255],
    [150, 150, 160, 255],
    [90, 70, 50, 255],
];
