//! # Interaction
//!
//! Turns "the player is pointing at this face" into a grid cell.
//!
//! Voxel centres sit on integer world positions, so a cell is found by
//! rounding. The face normal is rounded first so a slightly tilted normal
//! still picks a face-adjacent cell.

use cavern_core::BlockTag;
use cavern_shared::{Vec3, WorldCoord};

/// Where the player is aiming: a point on or in the target voxel, and the
/// normal of the face being looked at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimTarget {
    /// Point on the aimed-at voxel (its centre works).
    pub point: Vec3,
    /// Outward normal of the aimed-at face.
    pub normal: Vec3,
}

impl AimTarget {
    /// Creates a new aim target.
    #[must_use]
    pub const fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// The cell a placement would fill.
    #[must_use]
    pub fn place_cell(&self) -> WorldCoord {
        place_target(self.point, self.normal)
    }

    /// The cell a break would clear.
    #[must_use]
    pub fn break_cell(&self) -> WorldCoord {
        break_target(self.point)
    }
}

/// The host's "what is the crosshair on" query.
pub trait AimSource {
    /// Current target, if the player is aiming at a voxel.
    fn aim_target(&self) -> Option<AimTarget>;
}

impl AimSource for AimTarget {
    fn aim_target(&self) -> Option<AimTarget> {
        Some(*self)
    }
}

impl AimSource for Option<AimTarget> {
    fn aim_target(&self) -> Option<AimTarget> {
        *self
    }
}

/// What to do with an aim target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AimAction {
    /// Fill the cell in front of the aimed-at face.
    Place,
    /// Clear the aimed-at cell.
    Break,
}

/// Cell in front of the face at `hit` with outward `normal`.
#[must_use]
pub fn place_target(hit: Vec3, normal: Vec3) -> WorldCoord {
    (hit + normal.round()).to_world_coord()
}

/// Cell containing `hit`.
#[must_use]
pub fn break_target(hit: Vec3) -> WorldCoord {
    hit.to_world_coord()
}

/// Currently selected block for placement.
///
/// Slots 1 to 6 map to grass, dirt, stone, wood, leaves and glass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hotbar {
    selected: BlockTag,
}

impl Hotbar {
    /// Number of slots.
    pub const SLOTS: u8 = 6;

    /// Creates a hotbar with `tag` selected.
    #[must_use]
    pub const fn new(tag: BlockTag) -> Self {
        Self { selected: tag }
    }

    /// The selected block.
    #[inline]
    #[must_use]
    pub const fn selected(&self) -> BlockTag {
        self.selected
    }

    /// Selects `tag`.
    pub fn select(&mut self, tag: BlockTag) {
        self.selected = tag;
    }

    /// Selects the block bound to `slot` (1-6). Other slots change nothing.
    ///
    /// Returns whether the slot exists.
    pub fn select_slot(&mut self, slot: u8) -> bool {
        match BlockTag::from_slot(slot) {
            Some(tag) => {
                self.selected = tag;
                true
            }
            None => false,
        }
    }

    /// The selected slot number.
    #[must_use]
    pub const fn slot(&self) -> u8 {
        self.selected.slot()
    }
}
