//! # World Configuration
//!
//! Everything needed to rebuild a world exactly: seed, size, placement and
//! generation parameters. Loaded once at startup from TOML; every field is
//! optional and falls back to the classic 64x32x64 world.
//!
//! ```toml
//! seed = 1337
//! size = { x = 64, y = 32, z = 64 }
//!
//! [caves]
//! upper = 0.4
//!
//! [trees]
//! chance = 0.05
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cavern_procedural::{CaveParams, TerrainParams, TreeParams, WorldGenerator, WorldSeed};
use cavern_shared::{GridDims, WorldOffset, DEFAULT_SEED, MIN_WORLD_Y, WORLD_DIMS};

use crate::error::{ConfigError, ConfigResult};

/// Largest accepted size along any axis.
pub const MAX_AXIS: u32 = 4096;

/// Largest accepted cell count.
pub const MAX_VOLUME: usize = 1 << 28;

/// Largest leaf blob half-extent a config may ask for.
pub const MAX_CANOPY_RADIUS: i32 = 8;

/// World description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Root seed.
    pub seed: u64,
    /// Grid size in cells.
    pub size: GridDims,
    /// Index-to-world offset. Centred on the origin column when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<WorldOffset>,
    /// Height field.
    pub terrain: TerrainParams,
    /// Tunnels.
    pub caves: CaveParams,
    /// Trees.
    pub trees: TreeParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            size: WORLD_DIMS,
            origin: None,
            terrain: TerrainParams::default(),
            caves: CaveParams::default(),
            trees: TreeParams::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`]
    /// when the values describe an impossible world.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading world config");
        Self::from_toml_str(&text)
    }

    /// Renders this config as pretty TOML.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Serialize`] if a value cannot be represented.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks that the values describe a world that can be built.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        let size = self.size;
        if size.x == 0 || size.y == 0 || size.z == 0 {
            return invalid(format!("size must be non-zero on every axis, got {size:?}"));
        }
        if size.x > MAX_AXIS || size.y > MAX_AXIS || size.z > MAX_AXIS {
            return invalid(format!("size exceeds {MAX_AXIS} on some axis, got {size:?}"));
        }
        if size.volume() > MAX_VOLUME {
            return invalid(format!("world volume {} exceeds {MAX_VOLUME}", size.volume()));
        }
        if size.y < MIN_WORLD_Y {
            return invalid(format!("size.y must be at least {MIN_WORLD_Y}, got {}", size.y));
        }

        // Axes are capped at MAX_AXIS, so these fit.
        #[allow(clippy::cast_possible_wrap)]
        let [size_x, size_y, size_z] = [size.x as i32, size.y as i32, size.z as i32];
        if let Some(origin) = self.origin {
            let fits = origin.x.checked_add(size_x).is_some()
                && origin.y.checked_add(size_y).is_some()
                && origin.z.checked_add(size_z).is_some();
            if !fits {
                return invalid(format!("origin {origin:?} puts the world outside the i32 range"));
            }
        }

        let terrain = &self.terrain;
        if terrain.min_height < 1 || terrain.ceiling_gap < 0 || terrain.dirt_depth < 0 {
            return invalid("terrain.min_height must be >= 1; ceiling_gap and dirt_depth >= 0");
        }
        let max_height = size_y - terrain.ceiling_gap;
        if terrain.min_height > max_height {
            return invalid(format!(
                "terrain.min_height {} is above the highest allowed column {max_height}",
                terrain.min_height
            ));
        }

        let caves = &self.caves;
        if caves.lower.is_nan() || caves.upper.is_nan() || caves.lower >= caves.upper {
            return invalid(format!(
                "caves band ({}, {}) is empty",
                caves.lower, caves.upper
            ));
        }
        for (name, gap) in [
            ("caves.ceiling_gap", caves.ceiling_gap),
            ("caves.surface_gap", caves.surface_gap),
        ] {
            if !(0..=size_y).contains(&gap) {
                return invalid(format!("{name} must be within [0, {size_y}], got {gap}"));
            }
        }

        let trees = &self.trees;
        for (name, p) in [("trees.chance", trees.chance), ("trees.leaf_chance", trees.leaf_chance)] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} must be within [0, 1], got {p}"));
            }
        }
        if trees.trunk_min < 1 || trees.trunk_min > trees.trunk_max {
            return invalid(format!(
                "trees.trunk_min must be in [1, trunk_max], got {}..={}",
                trees.trunk_min, trees.trunk_max
            ));
        }
        if trees.trunk_max > size_y {
            return invalid(format!(
                "trees.trunk_max must be at most size.y ({size_y}), got {}",
                trees.trunk_max
            ));
        }
        if !(0..=MAX_CANOPY_RADIUS).contains(&trees.canopy_radius) {
            return invalid(format!(
                "trees.canopy_radius must be within [0, {MAX_CANOPY_RADIUS}], got {}",
                trees.canopy_radius
            ));
        }
        #[allow(clippy::cast_sign_loss)]
        let max_reach = 3 * MAX_CANOPY_RADIUS as u32;
        if trees.canopy_reach > max_reach {
            return invalid(format!(
                "trees.canopy_reach must be at most {max_reach}, got {}",
                trees.canopy_reach
            ));
        }
        if trees.edge_margin < 0 {
            return invalid("trees.edge_margin must be >= 0");
        }
        Ok(())
    }

    /// The index-to-world offset this config asks for.
    #[must_use]
    pub fn offset(&self) -> WorldOffset {
        self.origin.unwrap_or_else(|| WorldOffset::centered(self.size))
    }

    /// A generator carrying this config's seed and parameters.
    #[must_use]
    pub fn generator(&self) -> WorldGenerator {
        WorldGenerator::new(WorldSeed::new(self.seed))
            .with_terrain(self.terrain.clone())
            .with_caves(self.caves.clone())
            .with_trees(self.trees.clone())
    }
}

fn invalid(reason: impl Into<String>) -> ConfigResult<()> {
    Err(ConfigError::Invalid(reason.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.offset(), WorldOffset::new(-32, 0, -32));
    }

    #[test]
    fn test_partial_sections() {
        let config = WorldConfig::from_toml_str(
            r#"
            seed = 7

            [trees]
            chance = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert!((config.trees.chance - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.trees.trunk_max, 5);
        assert_eq!(config.caves, CaveParams::default());
    }

    #[test]
    fn test_explicit_origin() {
        let config = WorldConfig::from_toml_str("origin = { x = 0, y = 0, z = 0 }").unwrap();
        assert_eq!(config.offset(), WorldOffset::IDENTITY);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            "size = { x = 0, y = 32, z = 64 }",
            "size = { x = 16, y = 4, z = 16 }",
            "size = { x = 9000, y = 32, z = 16 }",
            "[trees]\nchance = 1.5",
            "[trees]\nleaf_chance = -0.1",
            "[trees]\ntrunk_min = 6\ntrunk_max = 5",
            "[caves]\nlower = 0.5\nupper = 0.1",
            "[terrain]\nmin_height = 40",
            "[trees]\ncanopy_radius = 100000",
            "[trees]\ncanopy_radius = -1",
            "[trees]\ncanopy_reach = 4000000000",
            "[trees]\ntrunk_max = 2147483647",
            "size = { x = 16, y = 16, z = 16 }\n[trees]\ntrunk_max = 17",
            "[trees]\nedge_margin = -3",
            "[caves]\nsurface_gap = -2147483648",
            "[caves]\nceiling_gap = 33",
            "origin = { x = 2147483600, y = 0, z = 0 }",
        ];
        for text in cases {
            let err = WorldConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text:?} gave {err}");
        }
    }

    #[test]
    fn test_parse_error() {
        let err = WorldConfig::from_toml_str("seed = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = WorldConfig {
            seed: 99,
            size: GridDims::new(24, 16, 20),
            origin: Some(WorldOffset::new(3, -1, 2)),
            trees: TreeParams {
                chance: 0.125,
                ..TreeParams::default()
            },
            ..WorldConfig::default()
        };

        let text = config.to_toml().unwrap();
        assert_eq!(WorldConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = WorldConfig::load("/definitely/not/here/world.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
