//! # Terrain Fields
//!
//! Pure functions of world-space position: no state, no seed. The
//! generator samples them once per column (height) and once per cell
//! (caves), and anything else may call them later with the same answer.
//!
//! ## Height
//!
//! ```text
//! h(x, z) = round(base + ax*sin(x*fx) + az*cos(z*fz) + ad*sin((x+z)*fd))
//! ```
//!
//! clamped to `[min_height, size_y - ceiling_gap]`.
//!
//! ## Caves
//!
//! ```text
//! d(x, y, z) = sin(x*cx) + cos(z*cz) + sin(y*cy) + sin((x+z-y)*cd)
//! ```
//!
//! A cell is carved when `d` lies strictly inside `(lower, upper)`, the cell
//! is at least `surface_gap` below the column top and no higher than
//! `size_y - ceiling_gap`.

use serde::{Deserialize, Serialize};

use cavern_core::BlockTag;

/// Rolling-hills height field and layer thicknesses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Mean column height.
    pub base: f64,
    /// Amplitude of the X wave.
    pub amp_x: f64,
    /// Frequency of the X wave.
    pub freq_x: f64,
    /// Amplitude of the Z wave.
    pub amp_z: f64,
    /// Frequency of the Z wave.
    pub freq_z: f64,
    /// Amplitude of the diagonal wave.
    pub amp_diag: f64,
    /// Frequency of the diagonal wave.
    pub freq_diag: f64,
    /// Lowest allowed column height.
    pub min_height: i32,
    /// Columns stop this many cells below the world ceiling.
    pub ceiling_gap: i32,
    /// Dirt cells between the grass cap and the stone below.
    pub dirt_depth: i32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base: 8.0,
            amp_x: 4.0,
            freq_x: 0.12,
            amp_z: 4.0,
            freq_z: 0.10,
            amp_diag: 2.0,
            freq_diag: 0.07,
            min_height: 4,
            ceiling_gap: 3,
            dirt_depth: 3,
        }
    }
}

impl TerrainParams {
    /// Unclamped, unrounded height at world column `(x, z)`.
    #[must_use]
    pub fn raw_height(&self, x: i32, z: i32) -> f64 {
        let (x, z) = (f64::from(x), f64::from(z));
        self.base
            + self.amp_x * (x * self.freq_x).sin()
            + self.amp_z * (z * self.freq_z).cos()
            + self.amp_diag * ((x + z) * self.freq_diag).sin()
    }

    /// Column height at world `(x, z)` for a world `size_y` cells tall.
    ///
    /// Cells `[0, height)` of the column are terrain before carving.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn height_at(&self, x: i32, z: i32, size_y: i32) -> i32 {
        let h = self.raw_height(x, z).round() as i32;
        h.max(self.min_height).min(size_y - self.ceiling_gap)
    }

    /// Layer tag for cell `y` of a column `height` cells tall.
    ///
    /// `None` above the column.
    #[must_use]
    pub const fn layer_at(&self, y: i32, height: i32) -> Option<BlockTag> {
        if y < 0 || y >= height {
            None
        } else if y == height - 1 {
            Some(BlockTag::Grass)
        } else if y >= height - 1 - self.dirt_depth {
            Some(BlockTag::Dirt)
        } else {
            Some(BlockTag::Stone)
        }
    }
}

/// Tunnel density field and carve band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveParams {
    /// Whether caves are carved at all.
    pub enabled: bool,
    /// X frequency.
    pub freq_x: f64,
    /// Y frequency.
    pub freq_y: f64,
    /// Z frequency.
    pub freq_z: f64,
    /// Frequency of the `x + z - y` term.
    pub freq_diag: f64,
    /// Exclusive lower bound of the carve band.
    pub lower: f64,
    /// Exclusive upper bound of the carve band.
    pub upper: f64,
    /// No carving above `size_y - ceiling_gap`.
    pub ceiling_gap: i32,
    /// No carving in the top `surface_gap - 1` cells of a column.
    pub surface_gap: i32,
}

impl Default for CaveParams {
    fn default() -> Self {
        Self {
            enabled: true,
            freq_x: 0.22,
            freq_y: 0.29,
            freq_z: 0.21,
            freq_diag: 0.13,
            lower: -0.7,
            upper: 0.35,
            ceiling_gap: 6,
            surface_gap: 2,
        }
    }
}

impl CaveParams {
    /// Cave density at world `(x, y, z)`.
    #[must_use]
    pub fn density(&self, x: i32, y: i32, z: i32) -> f64 {
        let (fx, fy, fz) = (f64::from(x), f64::from(y), f64::from(z));
        (fx * self.freq_x).sin()
            + (fz * self.freq_z).cos()
            + (fy * self.freq_y).sin()
            + ((fx + fz - fy) * self.freq_diag).sin()
    }

    /// Whether `d` falls strictly inside the carve band.
    #[inline]
    #[must_use]
    pub fn in_band(&self, d: f64) -> bool {
        self.lower < d && d < self.upper
    }

    /// Whether terrain cell `(x, y, z)` of a column `height` tall is carved
    /// out in a world `size_y` cells tall.
    #[must_use]
    pub fn is_carved(&self, x: i32, y: i32, z: i32, height: i32, size_y: i32) -> bool {
        self.enabled
            && y <= height - self.surface_gap
            && y <= size_y - self.ceiling_gap
            && self.in_band(self.density(x, y, z))
    }
}
