//! # Cavern Core
//!
//! Bounded voxel storage and exact, incremental surface tracking.
//!
//! ## Architecture Rules
//!
//! 1. **Dense storage** - one byte per cell, no hashing on the hot path
//! 2. **Local repair** - a single-cell mutation re-evaluates seven cells
//! 3. **Host-agnostic** - visible instances are created and destroyed through
//!    the [`SurfaceHost`] trait; this crate never renders
//!
//! ## Example
//!
//! ```rust
//! use cavern_core::{BlockTag, HandleRegistry, SurfaceTracker, VoxelGrid};
//! use cavern_shared::{Coord, GridDims, WorldOffset};
//!
//! let grid = VoxelGrid::filled(GridDims::cube(3), BlockTag::Stone);
//! let mut surface = SurfaceTracker::new(grid, WorldOffset::IDENTITY, HandleRegistry::new());
//! assert_eq!(surface.build_initial(), 26);
//!
//! assert!(surface.break_block(Coord::new(1, 2, 1)));
//! assert!(surface.is_exposed(Coord::new(1, 1, 1)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod error;
pub mod grid;
pub mod handle;
pub mod surface;

pub use block::BlockTag;
pub use error::{ParseBlockTagError, SurfaceError, SurfaceResult};
pub use grid::VoxelGrid;
pub use handle::{HandleRegistry, SurfaceHandle, SurfaceInstance};
pub use surface::{SurfaceHost, SurfaceTracker};
