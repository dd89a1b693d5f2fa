//! # Surface Tracking
//!
//! Maintains the exact set of *exposed* voxels: solid voxels with at least
//! one face neighbour that is empty or outside the grid. Each exposed voxel
//! owns one host handle (a renderable instance, a collider, whatever the
//! host needs).
//!
//! ## Cost model
//!
//! - [`SurfaceTracker::build_initial`] scans the whole volume once.
//! - Every mutation afterwards repairs exactly seven cells: the mutated cell
//!   and its six face neighbours. No other cell's exposure can change.
//!
//! ## Invariants
//!
//! Between calls, for every in-bounds cell `c`:
//! `handle_at(c).is_some() == is_exposed(c)`, and
//! `exposed_count()` equals the number of live handles.
//! [`SurfaceTracker::audit`] verifies both with a full scan.

use cavern_shared::{Coord, WorldCoord, WorldOffset};
use tracing::{debug, info, trace, warn};

use crate::block::BlockTag;
use crate::error::{SurfaceError, SurfaceResult};
use crate::grid::VoxelGrid;

/// The receiving side of surface changes.
///
/// Implemented by whatever owns visible instances. The tracker guarantees
/// that every handle returned by `on_exposed` is passed back to
/// `on_occluded` exactly once, and never afterwards.
pub trait SurfaceHost {
    /// Token identifying one instance.
    type Handle;

    /// A solid voxel became exposed. Create its instance.
    fn on_exposed(&mut self, coord: Coord, world: WorldCoord, tag: BlockTag) -> Self::Handle;

    /// A previously exposed voxel is now hidden or gone. Destroy its instance.
    fn on_occluded(&mut self, handle: Self::Handle);
}

impl<H: SurfaceHost + ?Sized> SurfaceHost for &mut H {
    type Handle = H::Handle;

    #[inline]
    fn on_exposed(&mut self, coord: Coord, world: WorldCoord, tag: BlockTag) -> Self::Handle {
        (**self).on_exposed(coord, world, tag)
    }

    #[inline]
    fn on_occluded(&mut self, handle: Self::Handle) {
        (**self).on_occluded(handle);
    }
}

/// Exposure test against the current grid contents.
#[inline]
fn exposed_in(grid: &VoxelGrid, c: Coord) -> bool {
    grid.is_solid(c) && c.face_neighbors().iter().any(|&n| !grid.is_solid(n))
}

/// Owns a [`VoxelGrid`] and keeps its exposed set and host handles in sync.
///
/// All single-cell mutations go through [`place`](Self::place) and
/// [`break_block`](Self::break_block); callers only ever see `&VoxelGrid`.
pub struct SurfaceTracker<H: SurfaceHost> {
    /// Voxel data.
    grid: VoxelGrid,
    /// Index-to-world translation passed to the host.
    offset: WorldOffset,
    /// One slot per grid cell; `Some` exactly for exposed voxels once built.
    handles: Box<[Option<H::Handle>]>,
    /// Number of `Some` entries in `handles`.
    exposed_count: usize,
    /// Whether the initial scan has run.
    built: bool,
    /// Receiver of exposure changes.
    host: H,
}

impl<H: SurfaceHost> SurfaceTracker<H> {
    /// Wraps a grid. No handles exist until [`build_initial`](Self::build_initial).
    #[must_use]
    pub fn new(grid: VoxelGrid, offset: WorldOffset, host: H) -> Self {
        let handles = std::iter::repeat_with(|| None)
            .take(grid.volume())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            grid,
            offset,
            handles,
            exposed_count: 0,
            built: false,
            host,
        }
    }

    /// Scans the whole grid and creates a handle for every exposed voxel.
    ///
    /// Runs once. Later calls log a warning and change nothing. Returns the
    /// number of exposed voxels.
    pub fn build_initial(&mut self) -> usize {
        if self.built {
            warn!("build_initial called on an already built surface; ignoring");
            return self.exposed_count;
        }
        for i in 0..self.grid.volume() {
            let c = self.grid.coord_of(i);
            if exposed_in(&self.grid, c) {
                self.expose(i, c);
            }
        }
        self.built = true;
        info!(
            exposed = self.exposed_count,
            solid = self.grid.solid_count(),
            volume = self.grid.volume(),
            "surface built"
        );
        self.exposed_count
    }

    /// Whether the initial scan has run.
    #[inline]
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.built
    }

    /// Whether `c` is solid with an empty or out-of-bounds face neighbour.
    #[inline]
    #[must_use]
    pub fn is_exposed(&self, c: Coord) -> bool {
        exposed_in(&self.grid, c)
    }

    /// Puts a `tag` voxel at `c` and repairs exposure around it.
    ///
    /// Returns `false`, changing nothing, if `c` is out of bounds or occupied.
    pub fn place(&mut self, c: Coord, tag: BlockTag) -> bool {
        if !self.grid.in_bounds(c) {
            debug!(?c, "place rejected: out of bounds");
            return false;
        }
        if self.grid.is_solid(c) {
            debug!(?c, "place rejected: occupied");
            return false;
        }
        self.grid.set_voxel(c, tag);
        self.refresh(c);
        true
    }

    /// Removes the voxel at `c` and repairs exposure around it.
    ///
    /// Returns `false`, changing nothing, if `c` is out of bounds or empty.
    pub fn break_block(&mut self, c: Coord) -> bool {
        if !self.grid.in_bounds(c) {
            debug!(?c, "break rejected: out of bounds");
            return false;
        }
        if !self.grid.is_solid(c) {
            debug!(?c, "break rejected: empty");
            return false;
        }
        self.grid.clear_voxel(c);
        self.refresh(c);
        true
    }

    /// Re-evaluates `c` and its six face neighbours.
    ///
    /// Creates handles for cells that became exposed and destroys handles of
    /// cells that no longer are. Out-of-bounds cells are skipped. Does
    /// nothing before [`build_initial`](Self::build_initial).
    pub fn refresh(&mut self, c: Coord) {
        if !self.built {
            return;
        }
        let mut created = 0u32;
        let mut destroyed = 0u32;
        for n in c.with_face_neighbors() {
            let Some(i) = self.grid.linear_index(n) else {
                continue;
            };
            let want = exposed_in(&self.grid, n);
            match (want, self.handles[i].is_some()) {
                (true, false) => {
                    self.expose(i, n);
                    created += 1;
                }
                (false, true) => {
                    self.occlude(i);
                    destroyed += 1;
                }
                _ => {}
            }
        }
        trace!(?c, created, destroyed, "surface refreshed");
    }

    /// Destroys every live handle and returns how many there were.
    ///
    /// The tracker goes back to the unbuilt state; the grid is untouched.
    pub fn teardown(&mut self) -> usize {
        let mut released = 0;
        for i in 0..self.handles.len() {
            if self.handles[i].is_some() {
                self.occlude(i);
                released += 1;
            }
        }
        self.built = false;
        info!(released, "surface torn down");
        released
    }

    /// Full-scan consistency check of the exposed set and handle array.
    ///
    /// # Errors
    ///
    /// The first inconsistency found, or [`SurfaceError::NotBuilt`].
    pub fn audit(&self) -> SurfaceResult<()> {
        if !self.built {
            return Err(SurfaceError::NotBuilt);
        }
        let mut actual = 0;
        for (i, slot) in self.handles.iter().enumerate() {
            let c = self.grid.coord_of(i);
            match (exposed_in(&self.grid, c), slot.is_some()) {
                (true, false) => return Err(SurfaceError::MissingHandle(c)),
                (false, true) => return Err(SurfaceError::StaleHandle(c)),
                (true, true) => actual += 1,
                (false, false) => {}
            }
        }
        if actual != self.exposed_count {
            return Err(SurfaceError::CountMismatch {
                tracked: self.exposed_count,
                actual,
            });
        }
        Ok(())
    }

    /// Number of exposed voxels (live handles).
    #[inline]
    #[must_use]
    pub const fn exposed_count(&self) -> usize {
        self.exposed_count
    }

    /// Every tracked exposed voxel, in storage order.
    pub fn exposed(&self) -> impl Iterator<Item = Coord> + '_ {
        self.handles
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| self.grid.coord_of(i))
    }

    /// Handle owned by the voxel at `c`, if it is tracked as exposed.
    #[inline]
    #[must_use]
    pub fn handle_at(&self, c: Coord) -> Option<&H::Handle> {
        self.grid
            .linear_index(c)
            .and_then(|i| self.handles[i].as_ref())
    }

    /// Whether `c` is tracked as exposed.
    #[inline]
    #[must_use]
    pub fn contains(&self, c: Coord) -> bool {
        self.handle_at(c).is_some()
    }

    /// Read-only view of the voxels.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Index-to-world translation.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> WorldOffset {
        self.offset
    }

    /// The host.
    #[inline]
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably. Handles stay owned by the tracker.
    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn expose(&mut self, i: usize, c: Coord) {
        let Some(tag) = self.grid.block_at(c) else {
            return;
        };
        let handle = self.host.on_exposed(c, self.offset.to_world(c), tag);
        self.handles[i] = Some(handle);
        self.exposed_count += 1;
    }

    fn occlude(&mut self, i: usize) {
        if let Some(handle) = self.handles[i].take() {
            self.host.on_occluded(handle);
            self.exposed_count -= 1;
        }
    }
}

impl<H: SurfaceHost> std::fmt::Debug for SurfaceTracker<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceTracker")
            .field("grid", &self.grid)
            .field("offset", &self.offset)
            .field("exposed_count", &self.exposed_count)
            .field("built", &self.built)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::HandleRegistry;
    use cavern_shared::GridDims;

    fn tracker(grid: VoxelGrid) -> SurfaceTracker<HandleRegistry> {
        let mut t = SurfaceTracker::new(grid, WorldOffset::IDENTITY, HandleRegistry::new());
        t.build_initial();
        t
    }

    #[test]
    fn test_single_voxel_is_exposed() {
        let mut grid = VoxelGrid::new(GridDims::cube(3));
        grid.set_voxel(Coord::new(1, 1, 1), BlockTag::Stone);
        let t = tracker(grid);
        assert_eq!(t.exposed_count(), 1);
        assert!(t.contains(Coord::new(1, 1, 1)));
        assert_eq!(t.host().live_count(), 1);
        t.audit().unwrap();
    }

    #[test]
    fn test_second_build_is_noop() {
        let mut t = tracker(VoxelGrid::filled(GridDims::cube(2), BlockTag::Dirt));
        assert_eq!(t.exposed_count(), 8);
        assert_eq!(t.build_initial(), 8);
        assert_eq!(t.host().live_count(), 8);
    }

    #[test]
    fn test_mutation_before_build_is_picked_up() {
        let mut t = SurfaceTracker::new(
            VoxelGrid::new(GridDims::cube(3)),
            WorldOffset::IDENTITY,
            HandleRegistry::new(),
        );
        assert!(t.place(Coord::new(0, 0, 0), BlockTag::Glass));
        assert_eq!(t.exposed_count(), 0);
        assert_eq!(t.audit(), Err(SurfaceError::NotBuilt));

        assert_eq!(t.build_initial(), 1);
        t.audit().unwrap();
    }

    #[test]
    fn test_handles_carry_world_position() {
        let mut grid = VoxelGrid::new(GridDims::cube(4));
        grid.set_voxel(Coord::new(2, 0, 3), BlockTag::Wood);
        let mut t = SurfaceTracker::new(grid, WorldOffset::new(-2, 5, -2), HandleRegistry::new());
        t.build_initial();

        let handle = *t.handle_at(Coord::new(2, 0, 3)).unwrap();
        let inst = t.host().get(handle).unwrap();
        assert_eq!(inst.world, WorldCoord::new(0, 5, 1));
        assert_eq!(inst.tag, BlockTag::Wood);
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut t = tracker(VoxelGrid::filled(GridDims::cube(3), BlockTag::Stone));
        assert_eq!(t.teardown(), 26);
        assert_eq!(t.exposed_count(), 0);
        assert_eq!(t.host().live_count(), 0);
        assert!(!t.is_built());
        assert_eq!(t.grid().solid_count(), 27);
    }

    #[test]
    fn test_borrowed_host() {
        let mut reg = HandleRegistry::new();
        {
            let mut t = SurfaceTracker::new(
                VoxelGrid::filled(GridDims::cube(2), BlockTag::Stone),
                WorldOffset::IDENTITY,
                &mut reg,
            );
            t.build_initial();
            assert!(t.break_block(Coord::new(0, 0, 0)));
        }
        assert_eq!(reg.live_count(), 7);
    }
}
