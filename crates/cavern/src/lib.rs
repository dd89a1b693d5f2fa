//! # Cavern
//!
//! A bounded voxel world: generated terrain, an exactly tracked visible
//! surface, and place/break interaction.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   bulk fill   ┌──────────────────┐
//! │  WorldGenerator  │──────────────>│    VoxelGrid     │
//! │  (procedural)    │               │    (core)        │
//! └──────────────────┘               └────────┬─────────┘
//!                                             │ owned by
//!                                    ┌────────┴─────────┐  on_exposed /
//!   host: place / break / queries ──>│  SurfaceTracker  │──on_occluded──> SurfaceHost
//!                                    │  (core)          │
//!                                    └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `world`: The owned session object
//! - `interaction`: Aim targets, hotbar, target-cell rules
//! - `physics`: Box and ray queries
//! - `config`: TOML world configuration
//! - `events`: Channel-backed surface host
//! - `shared`: Coarse-locked world for multi-threaded hosts
//!
//! ## Example
//!
//! ```rust
//! use cavern::{World, WorldConfig};
//! use cavern_core::HandleRegistry;
//! use cavern_shared::{GridDims, Vec3};
//!
//! let config = WorldConfig {
//!     size: GridDims::new(32, 16, 32),
//!     ..WorldConfig::default()
//! };
//! let mut world = World::generate(&config, HandleRegistry::new()).unwrap();
//!
//! let spawn = world.spawn_point();
//! let below = spawn.offset(0, -3, 0);
//! assert!(world.break_block(below.to_vec3()));
//! assert!(world.audit().is_ok());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod events;
pub mod interaction;
pub mod physics;
pub mod shared;
pub mod world;

pub use config::WorldConfig;
pub use error::{ConfigError, ConfigResult};
pub use events::{ChannelHost, SurfaceEvent, SurfaceReceiver};
pub use interaction::{AimAction, AimSource, AimTarget, Hotbar};
pub use physics::{Aabb, RaycastHit};
pub use shared::SharedWorld;
pub use world::World;
