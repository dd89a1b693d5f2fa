//! # Spatial Queries
//!
//! Point, box and ray queries against a voxel world. No collision
//! response lives here; that belongs to the host's controller.
//!
//! Voxel `c` occupies `[c - 0.5, c + 0.5)` on every axis.

use cavern_shared::{Vec3, WorldCoord};

use crate::interaction::AimTarget;

/// Axis-Aligned Bounding Box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// A box standing on `feet`, `width` wide on X and Z and `height` tall.
    #[must_use]
    pub fn from_feet(feet: Vec3, width: f32, height: f32) -> Self {
        let half = width / 2.0;
        Self {
            min: Vec3::new(feet.x - half, feet.y, feet.z - half),
            max: Vec3::new(feet.x + half, feet.y + height, feet.z + half),
        }
    }

    /// The box filled by voxel `c`.
    #[must_use]
    pub fn from_voxel(c: WorldCoord) -> Self {
        let centre = c.to_vec3();
        let half = Vec3::new(0.5, 0.5, 0.5);
        Self {
            min: centre - half,
            max: centre + half,
        }
    }

    /// Whether the interiors of the two boxes overlap. Touching faces do not count.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// This box moved by `delta`.
    #[must_use]
    pub fn translate(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Inclusive range of voxels whose interiors the box overlaps.
    ///
    /// Empty (min > max on some axis) for a degenerate box.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn voxel_span(&self) -> (WorldCoord, WorldCoord) {
        let lo = |v: f32| (v + 0.5).floor() as i32;
        let hi = |v: f32| (v + 0.5).ceil() as i32 - 1;
        (
            WorldCoord::new(lo(self.min.x), lo(self.min.y), lo(self.min.z)),
            WorldCoord::new(hi(self.max.x), hi(self.max.y), hi(self.max.z)),
        )
    }
}

/// Whether any voxel overlapped by `aabb` is solid.
pub fn aabb_hits_solid(aabb: &Aabb, is_solid: impl Fn(WorldCoord) -> bool) -> bool {
    let (lo, hi) = aabb.voxel_span();
    for y in lo.y..=hi.y {
        for z in lo.z..=hi.z {
            for x in lo.x..=hi.x {
                if is_solid(WorldCoord::new(x, y, z)) {
                    return true;
                }
            }
        }
    }
    false
}

/// Raycast hit result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// The voxel that was hit.
    pub voxel: WorldCoord,
    /// Outward normal of the face the ray entered through.
    /// Zero when the ray starts inside a solid voxel.
    pub normal: [i32; 3],
    /// Distance along the ray.
    pub distance: f32,
    /// Point where the ray entered the voxel.
    pub hit_point: Vec3,
}

impl RaycastHit {
    /// The hit as an interaction target (voxel centre plus face normal).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aim_target(&self) -> AimTarget {
        let [nx, ny, nz] = self.normal;
        AimTarget::new(
            self.voxel.to_vec3(),
            Vec3::new(nx as f32, ny as f32, nz as f32),
        )
    }
}

/// Largest coordinate or distance a ray is traced at.
const RAY_LIMIT: f32 = 16_777_216.0;

/// Walks the voxels along a ray (DDA) until one is solid or `max_distance`
/// is reached.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn raycast(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    is_solid: impl Fn(WorldCoord) -> bool,
) -> Option<RaycastHit> {
    let len = direction.length();
    if len < 0.0001 || !len.is_finite() || max_distance.is_nan() {
        return None;
    }
    // Past this magnitude f32 no longer resolves single cells.
    if origin.to_array().iter().any(|v| !v.is_finite() || v.abs() >= RAY_LIMIT) {
        return None;
    }
    let max_distance = max_distance.min(RAY_LIMIT);
    let dir = (direction * (1.0 / len)).to_array();
    let start = origin.to_array();
    // Shift so that voxel c spans [c, c + 1) and floor finds it
    let o = [start[0] + 0.5, start[1] + 0.5, start[2] + 0.5];

    let mut voxel = [o[0].floor() as i32, o[1].floor() as i32, o[2].floor() as i32];
    let step = dir.map(|d| if d >= 0.0 { 1 } else { -1 });
    let t_delta = dir.map(|d| if d.abs() < 0.0001 { f32::MAX } else { (1.0 / d).abs() });
    let mut t_max: [f32; 3] = std::array::from_fn(|axis| {
        if dir[axis] >= 0.0 {
            (voxel[axis].saturating_add(1) as f32 - o[axis]) / dir[axis].max(0.0001)
        } else {
            (voxel[axis] as f32 - o[axis]) / dir[axis].min(-0.0001)
        }
    });

    let mut distance = 0.0;
    let mut last_normal = [0, 0, 0];

    // Each step crosses one cell boundary, so the walk is bounded.
    let max_steps = 3 * (max_distance.max(0.0) as u32 + 3);
    for _ in 0..max_steps {
        if distance > max_distance {
            break;
        }
        let cell = WorldCoord::new(voxel[0], voxel[1], voxel[2]);
        if is_solid(cell) {
            return Some(RaycastHit {
                voxel: cell,
                normal: last_normal,
                distance,
                hit_point: origin + Vec3::from_array(dir) * distance,
            });
        }

        let axis = if t_max[0] < t_max[1] && t_max[0] < t_max[2] {
            0
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        distance = t_max[axis];
        t_max[axis] += t_delta[axis];
        voxel[axis] = voxel[axis].saturating_add(step[axis]);
        last_normal = [0, 0, 0];
        last_normal[axis] = -step[axis];
    }

    None
}
