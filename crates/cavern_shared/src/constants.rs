//! # World Constants
//!
//! Defaults for the classic small world. Every value here can be overridden
//! through the world configuration; these are what an empty config yields.

use crate::math::GridDims;

/// Default world width (X) in cells.
pub const WORLD_X: u32 = 64;

/// Default world height (Y) in cells.
pub const WORLD_Y: u32 = 32;

/// Default world depth (Z) in cells.
pub const WORLD_Z: u32 = 64;

/// Default world dimensions.
pub const WORLD_DIMS: GridDims = GridDims::new(WORLD_X, WORLD_Y, WORLD_Z);

/// Default world seed.
pub const DEFAULT_SEED: u64 = 1337;

/// Smallest world height the terrain model supports.
///
/// Heights clamp to `[4, Y - 3]` and tunnels stop 6 layers below the ceiling,
/// so anything lower leaves no room for terrain.
pub const MIN_WORLD_Y: u32 = 8;

/// How far above the topmost solid cell the player spawns.
pub const SPAWN_CLEARANCE: i32 = 3;
