//! # World Session
//!
//! One owned object per running world: the voxels, the tracked surface, the
//! host's instances and the player's block selection. Nothing is global;
//! the host holds the `World` and calls into it from its own loop.

use tracing::{debug, info};

use cavern_core::{BlockTag, SurfaceHost, SurfaceResult, SurfaceTracker, VoxelGrid};
use cavern_procedural::{GenerationStats, TerrainParams, WorldSeed};
use cavern_shared::{Coord, Vec3, WorldCoord, WorldOffset, SPAWN_CLEARANCE};

use crate::config::WorldConfig;
use crate::error::ConfigResult;
use crate::interaction::{break_target, place_target, AimAction, AimSource, Hotbar};
use crate::physics::{self, Aabb, RaycastHit};

/// A live voxel world.
pub struct World<H: SurfaceHost> {
    /// Grid, exposed set and host.
    surface: SurfaceTracker<H>,
    /// Height field the terrain was built from.
    terrain: TerrainParams,
    /// Seed the world was built from.
    seed: WorldSeed,
    /// Block used by [`place`](Self::place).
    hotbar: Hotbar,
    /// Generation summary.
    stats: GenerationStats,
}

impl<H: SurfaceHost> World<H> {
    /// Generates a world from `config` and builds its surface into `host`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`](crate::ConfigError::Invalid) if the config
    /// fails validation. Nothing is generated in that case.
    pub fn generate(config: &WorldConfig, host: H) -> ConfigResult<Self> {
        config.validate()?;
        let offset = config.offset();
        let (grid, stats) = config.generator().generate(config.size, offset);

        let mut surface = SurfaceTracker::new(grid, offset, host);
        let exposed = surface.build_initial();
        info!(
            seed = config.seed,
            size = ?config.size,
            exposed,
            trees = stats.trees,
            "world ready"
        );

        Ok(Self {
            surface,
            terrain: config.terrain.clone(),
            seed: WorldSeed::new(config.seed),
            hotbar: Hotbar::default(),
            stats,
        })
    }

    /// Wraps an existing grid (tests, tools) and builds its surface.
    ///
    /// [`height_at`](Self::height_at) reports the default height field.
    #[must_use]
    pub fn from_grid(grid: VoxelGrid, offset: WorldOffset, host: H) -> Self {
        let stats = GenerationStats {
            solid_cells: grid.solid_count(),
            ..GenerationStats::default()
        };
        let mut surface = SurfaceTracker::new(grid, offset, host);
        surface.build_initial();
        Self {
            surface,
            terrain: TerrainParams::default(),
            seed: WorldSeed::default(),
            hotbar: Hotbar::default(),
            stats,
        }
    }

    // =========================================================================
    // Host API
    // =========================================================================

    /// Places the selected block in front of the face at `hit` with `normal`.
    ///
    /// Returns `false` if the target cell is outside the world or occupied,
    /// or if either vector is not finite.
    pub fn place(&mut self, hit: Vec3, normal: Vec3) -> bool {
        if !hit.is_finite() || !normal.is_finite() {
            debug!(?hit, ?normal, "place rejected: non-finite input");
            return false;
        }
        self.place_at(place_target(hit, normal), self.hotbar.selected())
    }

    /// Breaks the voxel containing `hit`.
    ///
    /// Returns `false` if the target cell is outside the world or empty,
    /// or if `hit` is not finite.
    pub fn break_block(&mut self, hit: Vec3) -> bool {
        if !hit.is_finite() {
            debug!(?hit, "break rejected: non-finite input");
            return false;
        }
        self.break_at(break_target(hit))
    }

    /// Whether the voxel containing `pos` is solid.
    #[must_use]
    pub fn is_solid_at(&self, pos: Vec3) -> bool {
        pos.is_finite() && self.is_solid_world(pos.to_world_coord())
    }

    /// Generated terrain height at world column `(x, z)`.
    ///
    /// This is the height field value (cells `[0, h)` of the column were
    /// terrain before caves), not the current top of the column.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        self.terrain.height_at(x, z, self.grid().dims().y as i32)
    }

    // =========================================================================
    // Cell-level operations
    // =========================================================================

    /// Places `tag` at world cell `w`.
    pub fn place_at(&mut self, w: WorldCoord, tag: BlockTag) -> bool {
        let Some(c) = self.to_index(w) else {
            debug!(?w, "place rejected: outside index range");
            return false;
        };
        let placed = self.surface.place(c, tag);
        if placed {
            debug!(?w, %tag, "block placed");
        }
        placed
    }

    /// Clears world cell `w`.
    pub fn break_at(&mut self, w: WorldCoord) -> bool {
        let Some(c) = self.to_index(w) else {
            debug!(?w, "break rejected: outside index range");
            return false;
        };
        let broken = self.surface.break_block(c);
        if broken {
            debug!(?w, "block broken");
        }
        broken
    }

    /// Applies `action` to whatever `source` is aiming at.
    ///
    /// Returns `false` if there is no target or the action had no effect.
    pub fn use_aim(&mut self, source: &dyn AimSource, action: AimAction) -> bool {
        let Some(target) = source.aim_target() else {
            return false;
        };
        match action {
            AimAction::Place => self.place(target.point, target.normal),
            AimAction::Break => self.break_block(target.point),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// World-to-index translation, `None` if it leaves the `i32` range.
    #[inline]
    #[must_use]
    pub fn to_index(&self, w: WorldCoord) -> Option<Coord> {
        self.surface.offset().to_index(w)
    }

    /// Index-to-world translation.
    #[inline]
    #[must_use]
    pub fn to_world(&self, c: Coord) -> WorldCoord {
        self.surface.offset().to_world(c)
    }

    /// Whether world cell `w` is solid.
    #[inline]
    #[must_use]
    pub fn is_solid_world(&self, w: WorldCoord) -> bool {
        self.to_index(w).is_some_and(|c| self.grid().is_solid(c))
    }

    /// Tag at world cell `w`.
    #[must_use]
    pub fn block_at_world(&self, w: WorldCoord) -> Option<BlockTag> {
        self.to_index(w).and_then(|c| self.grid().block_at(c))
    }

    /// Where the player starts: three cells above the top of the centre
    /// column, or at the ceiling if the column is empty.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn spawn_point(&self) -> WorldCoord {
        let dims = self.grid().dims();
        let (x, z) = ((dims.x / 2) as i32, (dims.z / 2) as i32);
        let y = self
            .grid()
            .topmost_solid(x, z)
            .map_or(dims.y as i32 - 1, |top| top + SPAWN_CLEARANCE);
        self.to_world(Coord::new(x, y, z))
    }

    /// Whether `aabb` overlaps any solid voxel.
    #[must_use]
    pub fn aabb_hits_solid(&self, aabb: &Aabb) -> bool {
        physics::aabb_hits_solid(aabb, |w| self.is_solid_world(w))
    }

    /// First solid voxel along a ray.
    #[must_use]
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        physics::raycast(origin, direction, max_distance, |w| self.is_solid_world(w))
    }

    // =========================================================================
    // Surface & state
    // =========================================================================

    /// Read-only voxels.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &VoxelGrid {
        self.surface.grid()
    }

    /// The tracked surface.
    #[inline]
    #[must_use]
    pub const fn surface(&self) -> &SurfaceTracker<H> {
        &self.surface
    }

    /// Number of exposed voxels.
    #[inline]
    #[must_use]
    pub fn exposed_count(&self) -> usize {
        self.surface.exposed_count()
    }

    /// Full consistency check of the surface.
    ///
    /// # Errors
    ///
    /// The first inconsistency found.
    pub fn audit(&self) -> SurfaceResult<()> {
        self.surface.audit()
    }

    /// Releases every surface handle back to the host. Returns how many.
    pub fn teardown(&mut self) -> usize {
        self.surface.teardown()
    }

    /// The host.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        self.surface.host()
    }

    /// The host, mutably.
    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        self.surface.host_mut()
    }

    /// Index-to-world offset.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> WorldOffset {
        self.surface.offset()
    }

    /// Seed the world was built from.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Generation summary.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> GenerationStats {
        self.stats
    }

    /// Block selection.
    #[inline]
    #[must_use]
    pub const fn hotbar(&self) -> &Hotbar {
        &self.hotbar
    }

    /// Block selection, mutably.
    #[inline]
    pub fn hotbar_mut(&mut self) -> &mut Hotbar {
        &mut self.hotbar
    }
}

impl<H: SurfaceHost> std::fmt::Debug for World<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("surface", &self.surface)
            .field("seed", &self.seed)
            .field("hotbar", &self.hotbar)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
