//! # Cavern Procedural Generation
//!
//! Deterministic terrain for a bounded voxel world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and parameters always produce the same world
//! 2. **Pure fields**: Height and cave density are functions of position only
//! 3. **Bulk writes**: Terrain fills the grid in storage order, once
//!
//! ## Core Components
//!
//! - `WorldSeed`: Root of every random stream
//! - `TerrainParams` / `CaveParams`: Height field and tunnel band
//! - `WorldGenerator`: Terrain pass followed by the tree pass
//!
//! ## Example
//!
//! ```rust
//! use cavern_procedural::{WorldGenerator, WorldSeed};
//! use cavern_shared::{GridDims, WorldOffset};
//!
//! let dims = GridDims::new(32, 16, 32);
//! let generator = WorldGenerator::new(WorldSeed::new(1337));
//! let (grid, stats) = generator.generate(dims, WorldOffset::centered(dims));
//! assert_eq!(grid.solid_count(), stats.solid_cells);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod generator;
pub mod seed;
pub mod terrain;

pub use generator::{GenerationStats, TreeParams, WorldGenerator};
pub use seed::{WorldSeed, TREE_STREAM};
pub use terrain::{CaveParams, TerrainParams};
