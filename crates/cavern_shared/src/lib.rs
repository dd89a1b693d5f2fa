//! # Cavern Shared
//!
//! Common types used by every Cavern crate.
//!
//! ## CRITICAL RULE
//!
//! This crate holds pure data and math only. It must never depend on the
//! grid, the generator or any host-facing code.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{DEFAULT_SEED, MIN_WORLD_Y, SPAWN_CLEARANCE, WORLD_DIMS};
pub use math::{Coord, GridDims, Vec3, WorldCoord, WorldOffset, FACE_OFFSETS};
