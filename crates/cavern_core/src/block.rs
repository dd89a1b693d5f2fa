//! # Block Tags
//!
//! The closed set of materials a solid voxel can carry. Empty space has no
//! tag; it is represented as `None` wherever a tag is optional.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseBlockTagError;

/// Material of a solid voxel.
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    /// Surface layer of every terrain column.
    #[default]
    Grass = 1,
    /// Shallow subsurface.
    Dirt = 2,
    /// Deep subsurface.
    Stone = 3,
    /// Tree trunks.
    Wood = 4,
    /// Tree canopies.
    Leaves = 5,
    /// Player-placed transparent block.
    Glass = 6,
}

impl BlockTag {
    /// Every tag, in hotbar order (slot 1 first).
    pub const ALL: [Self; 6] = [
        Self::Grass,
        Self::Dirt,
        Self::Stone,
        Self::Wood,
        Self::Leaves,
        Self::Glass,
    ];

    /// Lowercase name, as used in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Dirt => "dirt",
            Self::Stone => "stone",
            Self::Wood => "wood",
            Self::Leaves => "leaves",
            Self::Glass => "glass",
        }
    }

    /// Display colour as RGBA.
    ///
    /// Leaves and glass are translucent.
    #[must_use]
    pub const fn color(self) -> [u8; 4] {
        match self {
            Self::Grass => [108, 170, 95, 255],
            Self::Dirt => [120, 88, 60, 255],
            Self::Stone => [135, 135, 135, 255],
            Self::Wood => [102, 74, 50, 255],
            Self::Leaves => [70, 130, 70, 220],
            Self::Glass => [170, 220, 255, 120],
        }
    }

    /// Whether light passes through this block.
    #[must_use]
    pub const fn is_translucent(self) -> bool {
        self.color()[3] < 255
    }

    /// Hotbar slot (1-6) of this tag.
    #[must_use]
    pub const fn slot(self) -> u8 {
        self as u8
    }

    /// The tag bound to hotbar slot `slot` (1-6).
    #[must_use]
    pub const fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(Self::Grass),
            2 => Some(Self::Dirt),
            3 => Some(Self::Stone),
            4 => Some(Self::Wood),
            5 => Some(Self::Leaves),
            6 => Some(Self::Glass),
            _ => None,
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockTag {
    type Err = ParseBlockTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseBlockTagError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_roundtrip() {
        for tag in BlockTag::ALL {
            assert_eq!(BlockTag::from_slot(tag.slot()), Some(tag));
        }
        assert_eq!(BlockTag::from_slot(0), None);
        assert_eq!(BlockTag::from_slot(7), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("stone".parse::<BlockTag>(), Ok(BlockTag::Stone));
        assert_eq!(" Leaves ".parse::<BlockTag>(), Ok(BlockTag::Leaves));
        assert!("diamond".parse::<BlockTag>().is_err());
    }

    #[test]
    fn test_translucency() {
        assert!(BlockTag::Glass.is_translucent());
        assert!(BlockTag::Leaves.is_translucent());
        assert!(!BlockTag::Stone.is_translucent());
    }

    #[test]
    fn test_option_tag_is_one_byte() {
        assert_eq!(std::mem::size_of::<Option<BlockTag>>(), 1);
    }
}
