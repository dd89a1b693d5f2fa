//! Coordinate math shared by the grid, the generator and the session.
//!
//! Two integer spaces exist side by side:
//! - **Index space** ([`Coord`]): `[0, size)` on every axis, what the grid stores.
//! - **World space** ([`WorldCoord`]): what the renderer and controller see.
//!
//! A [`WorldOffset`] translates between them. The translation is fixed for the
//! lifetime of a world.

use std::ops::{Add, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Offsets to the six axis-aligned face neighbours, in the order
/// +X, -X, +Y, -Y, +Z, -Z.
pub const FACE_OFFSETS: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// A cell position in index space.
///
/// Signed so that the neighbours of edge cells are representable; such
/// neighbours are simply out of bounds.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
pub struct Coord {
    /// X index.
    pub x: i32,
    /// Y index (up).
    pub y: i32,
    /// Z index.
    pub z: i32,
}

impl Coord {
    /// Creates a new index-space coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this coordinate shifted by `(dx, dy, dz)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The six face neighbours, in [`FACE_OFFSETS`] order.
    #[inline]
    #[must_use]
    pub fn face_neighbors(self) -> [Self; 6] {
        FACE_OFFSETS.map(|[dx, dy, dz]| self.offset(dx, dy, dz))
    }

    /// This cell followed by its six face neighbours.
    ///
    /// These are the only cells whose exposure can change when this cell
    /// alone is mutated.
    #[inline]
    #[must_use]
    pub fn with_face_neighbors(self) -> [Self; 7] {
        let n = self.face_neighbors();
        [self, n[0], n[1], n[2], n[3], n[4], n[5]]
    }

    /// Manhattan distance to another coordinate.
    #[inline]
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }

    /// Converts to an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[i32; 3]> for Coord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// A cell position in world space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct WorldCoord {
    /// World X.
    pub x: i32,
    /// World Y (up).
    pub y: i32,
    /// World Z.
    pub z: i32,
}

impl WorldCoord {
    /// Creates a new world-space coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this coordinate shifted by `(dx, dy, dz)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The centre of this cell as a float position.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

/// Constant translation from index space to world space.
///
/// `world = index + offset` and `index = world - offset`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct WorldOffset {
    /// X translation.
    pub x: i32,
    /// Y translation.
    pub y: i32,
    /// Z translation.
    pub z: i32,
}

impl WorldOffset {
    /// No translation: index space and world space coincide.
    pub const IDENTITY: Self = Self::new(0, 0, 0);

    /// Creates a new offset.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The offset that centres a grid horizontally on the world origin,
    /// with index `y = 0` at world `y = 0`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn centered(dims: GridDims) -> Self {
        Self::new(-((dims.x / 2) as i32), 0, -((dims.z / 2) as i32))
    }

    /// Maps an index-space coordinate to world space.
    #[inline]
    #[must_use]
    pub const fn to_world(self, c: Coord) -> WorldCoord {
        WorldCoord::new(c.x + self.x, c.y + self.y, c.z + self.z)
    }

    /// Maps a world-space coordinate to index space.
    ///
    /// The result may be out of bounds; bounds are the grid's concern.
    /// Returns `None` when the translated position does not fit in `i32`,
    /// which no grid can contain either.
    #[inline]
    #[must_use]
    pub fn to_index(self, w: WorldCoord) -> Option<Coord> {
        Some(Coord::new(
            w.x.checked_sub(self.x)?,
            w.y.checked_sub(self.y)?,
            w.z.checked_sub(self.z)?,
        ))
    }
}

/// Size of a grid in cells along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    /// Cells along X.
    pub x: u32,
    /// Cells along Y.
    pub y: u32,
    /// Cells along Z.
    pub z: u32,
}

impl GridDims {
    /// Creates new dimensions.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// A cube of `n` cells per side.
    #[inline]
    #[must_use]
    pub const fn cube(n: u32) -> Self {
        Self::new(n, n, n)
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub const fn volume(self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Whether `c` lies inside `[0, x) × [0, y) × [0, z)`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn contains(self, c: Coord) -> bool {
        c.x >= 0
            && c.y >= 0
            && c.z >= 0
            && (c.x as u32) < self.x
            && (c.y as u32) < self.y
            && (c.z as u32) < self.z
    }
}

/// 3D float vector - hit points, normals, player positions.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Whether no component is infinite or NaN.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Rounds every component to the nearest integer (halves away from zero).
    #[must_use]
    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round(), self.z.round())
    }

    /// Rounds to the world cell whose centre is nearest to this point.
    ///
    /// Voxel `c` occupies `[c - 0.5, c + 0.5)` on each axis.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_world_coord(self) -> WorldCoord {
        let r = self.round();
        WorldCoord::new(r.x as i32, r.y as i32, r.z as i32)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_roundtrip() {
        let offset = WorldOffset::new(-32, 0, -32);
        let c = Coord::new(5, 7, 40);
        let w = offset.to_world(c);
        assert_eq!(w, WorldCoord::new(-27, 7, 8));
        assert_eq!(offset.to_index(w), Some(c));
    }

    #[test]
    fn test_centered_offset() {
        let offset = WorldOffset::centered(GridDims::new(64, 32, 64));
        assert_eq!(offset, WorldOffset::new(-32, 0, -32));
        assert_eq!(offset.to_index(WorldCoord::new(0, 0, 0)), Some(Coord::new(32, 0, 32)));
    }

    #[test]
    fn test_to_index_outside_i32_range() {
        let offset = WorldOffset::new(-32, 0, -32);
        assert_eq!(offset.to_index(WorldCoord::new(i32::MAX, 0, 0)), None);
        assert_eq!(offset.to_index(WorldCoord::new(0, 0, i32::MAX)), None);
        assert_eq!(
            WorldOffset::new(5, 0, 0).to_index(WorldCoord::new(i32::MIN, 0, 0)),
            None
        );
        assert_eq!(
            offset.to_index(WorldCoord::new(i32::MIN, 0, 0)),
            Some(Coord::new(i32::MIN + 32, 0, 32))
        );
    }

    #[test]
    fn test_dims_contains() {
        let dims = GridDims::new(4, 2, 3);
        assert!(dims.contains(Coord::new(0, 0, 0)));
        assert!(dims.contains(Coord::new(3, 1, 2)));
        assert!(!dims.contains(Coord::new(4, 0, 0)));
        assert!(!dims.contains(Coord::new(0, -1, 0)));
        assert!(!dims.contains(Coord::new(0, 0, 3)));
        assert_eq!(dims.volume(), 24);
    }

    #[test]
    fn test_face_neighbors_are_distinct_and_adjacent() {
        let c = Coord::new(2, 2, 2);
        let n = c.face_neighbors();
        for (i, a) in n.iter().enumerate() {
            assert_eq!(a.manhattan(c), 1);
            for b in &n[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(c.with_face_neighbors()[0], c);
    }

    #[test]
    fn test_vec3_to_world_coord() {
        assert_eq!(Vec3::new(0.4, -0.4, 2.6).to_world_coord(), WorldCoord::new(0, 0, 3));
        assert_eq!(Vec3::new(-1.5, 1.5, 0.0).to_world_coord(), WorldCoord::new(-2, 2, 0));
    }

    #[test]
    fn test_vec3_bytemuck() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 12); // 3 * 4 bytes
    }
}
