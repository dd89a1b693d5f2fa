//! # Voxel Grid
//!
//! Dense occupancy and block-tag storage over a fixed, bounded volume.
//!
//! ## Layout
//!
//! One `Option<BlockTag>` per cell, indexed as `(y * Z + z) * X + x`.
//! `None` is empty space, `Some(tag)` is solid. Occupancy is derived from the
//! tag, so "solid exactly when tagged" cannot be violated.
//!
//! ## Out of bounds
//!
//! Space outside the grid is permanently empty: reads answer "empty" and
//! writes are refused with `false`. Nothing here panics on a bad coordinate.

use std::fmt;

use cavern_shared::{Coord, GridDims};

use crate::block::BlockTag;

/// Dense 3D voxel storage.
///
/// The grid itself does not know about exposure. Single-cell writes made
/// through a [`SurfaceTracker`](crate::SurfaceTracker) are followed by a
/// surface repair; writes made directly (world generation) are not.
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    /// Size along each axis.
    dims: GridDims,
    /// Cell data in `y, z, x` order.
    cells: Box<[Option<BlockTag>]>,
    /// Number of solid cells.
    solid_count: usize,
}

impl VoxelGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![None; dims.volume()].into_boxed_slice(),
            solid_count: 0,
        }
    }

    /// Creates a grid with every cell solid.
    #[must_use]
    pub fn filled(dims: GridDims, tag: BlockTag) -> Self {
        let volume = dims.volume();
        Self {
            dims,
            cells: vec![Some(tag); volume].into_boxed_slice(),
            solid_count: volume,
        }
    }

    /// Grid dimensions.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> usize {
        self.cells.len()
    }

    /// Number of solid cells.
    #[inline]
    #[must_use]
    pub const fn solid_count(&self) -> usize {
        self.solid_count
    }

    /// Whether `c` lies inside the grid.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, c: Coord) -> bool {
        self.dims.contains(c)
    }

    /// Storage index of `c`, or `None` when out of bounds.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn linear_index(&self, c: Coord) -> Option<usize> {
        if !self.dims.contains(c) {
            return None;
        }
        let (x, y, z) = (c.x as usize, c.y as usize, c.z as usize);
        Some((y * self.dims.z as usize + z) * self.dims.x as usize + x)
    }

    /// Coordinate stored at `index`. Inverse of [`linear_index`](Self::linear_index).
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn coord_of(&self, index: usize) -> Coord {
        let sx = self.dims.x as usize;
        let sz = self.dims.z as usize;
        let x = index % sx;
        let z = (index / sx) % sz;
        let y = index / (sx * sz);
        Coord::new(x as i32, y as i32, z as i32)
    }

    /// Whether `c` holds a solid voxel. Out-of-bounds cells are empty.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, c: Coord) -> bool {
        self.block_at(c).is_some()
    }

    /// Tag of the voxel at `c`, or `None` for empty or out-of-bounds cells.
    #[inline]
    #[must_use]
    pub fn block_at(&self, c: Coord) -> Option<BlockTag> {
        self.linear_index(c).and_then(|i| self.cells[i])
    }

    /// Makes `c` solid with `tag`.
    ///
    /// Returns `false` (and changes nothing) when `c` is out of bounds.
    /// Overwrites whatever was there; exposure is not repaired.
    pub fn set_voxel(&mut self, c: Coord, tag: BlockTag) -> bool {
        let Some(i) = self.linear_index(c) else {
            return false;
        };
        if self.cells[i].replace(tag).is_none() {
            self.solid_count += 1;
        }
        true
    }

    /// Empties `c`.
    ///
    /// Returns `false` (and changes nothing) when `c` is out of bounds.
    pub fn clear_voxel(&mut self, c: Coord) -> bool {
        let Some(i) = self.linear_index(c) else {
            return false;
        };
        if self.cells[i].take().is_some() {
            self.solid_count -= 1;
        }
        true
    }

    /// Makes `c` solid only if it is currently empty.
    ///
    /// Returns `true` if the voxel was placed.
    pub fn place_if_empty(&mut self, c: Coord, tag: BlockTag) -> bool {
        let Some(i) = self.linear_index(c) else {
            return false;
        };
        if self.cells[i].is_some() {
            return false;
        }
        self.cells[i] = Some(tag);
        self.solid_count += 1;
        true
    }

    /// Bulk write: sets every cell to `f(coord)`, in storage order.
    ///
    /// This is the generation path. It touches each cell exactly once and
    /// recounts solids at the end.
    #[allow(clippy::cast_possible_wrap)]
    pub fn fill_with<F>(&mut self, mut f: F)
    where
        F: FnMut(Coord) -> Option<BlockTag>,
    {
        let (sx, sz) = (self.dims.x as usize, self.dims.z as usize);
        let mut solid = 0;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let c = Coord::new(
                (i % sx) as i32,
                (i / (sx * sz)) as i32,
                ((i / sx) % sz) as i32,
            );
            *cell = f(c);
            solid += usize::from(cell.is_some());
        }
        self.solid_count = solid;
    }

    /// Every in-bounds coordinate, in storage order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.volume()).map(|i| self.coord_of(i))
    }

    /// Every solid voxel with its tag, in storage order.
    pub fn iter_solid(&self) -> impl Iterator<Item = (Coord, BlockTag)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|tag| (self.coord_of(i), tag)))
    }

    /// Index-space Y of the highest solid voxel in column `(x, z)`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn topmost_solid(&self, x: i32, z: i32) -> Option<i32> {
        (0..self.dims.y as i32)
            .rev()
            .find(|&y| self.is_solid(Coord::new(x, y, z)))
    }
}

impl fmt::Debug for VoxelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoxelGrid")
            .field("dims", &self.dims)
            .field("solid_count", &self.solid_count)
            .finish_non_exhaustive()
    }
}
