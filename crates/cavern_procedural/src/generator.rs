//! # World Generator
//!
//! Two passes over a bounded grid:
//!
//! 1. **Terrain**: heightmap columns layered grass / dirt / stone, with
//!    tunnels carved out, written with one bulk fill.
//! 2. **Trees**: a seeded walk over the interior columns that stamps trunks
//!    and leaf blobs onto grass, never overwriting anything solid.
//!
//! Column positions are evaluated in world space, so a grid generated with
//! a different offset shows a different part of the same landscape.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cavern_core::{BlockTag, VoxelGrid};
use cavern_shared::{Coord, GridDims, WorldOffset};

use crate::seed::{WorldSeed, TREE_STREAM};
use crate::terrain::{CaveParams, TerrainParams};

/// Tree stamping parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Whether trees are stamped at all.
    pub enabled: bool,
    /// Chance that an eligible grass column grows a tree.
    pub chance: f64,
    /// Columns this close to a horizontal edge never grow trees.
    pub edge_margin: i32,
    /// Shortest trunk.
    pub trunk_min: i32,
    /// Tallest trunk.
    pub trunk_max: i32,
    /// Leaf blob half-extent on each axis.
    pub canopy_radius: i32,
    /// Leaf blob Manhattan reach from the trunk top.
    pub canopy_reach: u32,
    /// Chance that each leaf cell in the blob is filled.
    pub leaf_chance: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            enabled: true,
            chance: 0.02,
            edge_margin: 2,
            trunk_min: 3,
            trunk_max: 5,
            canopy_radius: 2,
            canopy_reach: 4,
            leaf_chance: 0.92,
        }
    }
}

/// What a generation run produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Solid cells after both passes.
    pub solid_cells: usize,
    /// Terrain cells left empty by caves.
    pub carved_cells: usize,
    /// Trees stamped.
    pub trees: usize,
}

/// Deterministic world generator.
#[derive(Clone, Debug, Default)]
pub struct WorldGenerator {
    seed: WorldSeed,
    terrain: TerrainParams,
    caves: CaveParams,
    trees: TreeParams,
}

impl WorldGenerator {
    /// Creates a generator with default terrain, caves and trees.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Replaces the height field parameters.
    #[must_use]
    pub fn with_terrain(mut self, terrain: TerrainParams) -> Self {
        self.terrain = terrain;
        self
    }

    /// Replaces the cave parameters.
    #[must_use]
    pub fn with_caves(mut self, caves: CaveParams) -> Self {
        self.caves = caves;
        self
    }

    /// Replaces the tree parameters.
    #[must_use]
    pub fn with_trees(mut self, trees: TreeParams) -> Self {
        self.trees = trees;
        self
    }

    /// The seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Height field parameters.
    #[inline]
    #[must_use]
    pub const fn terrain(&self) -> &TerrainParams {
        &self.terrain
    }

    /// Cave parameters.
    #[inline]
    #[must_use]
    pub const fn caves(&self) -> &CaveParams {
        &self.caves
    }

    /// Tree parameters.
    #[inline]
    #[must_use]
    pub const fn trees(&self) -> &TreeParams {
        &self.trees
    }

    /// Generated column height at world `(x, z)`, before carving and trees.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn height_at(&self, x: i32, z: i32, dims: GridDims) -> i32 {
        self.terrain.height_at(x, z, dims.y as i32)
    }

    /// Builds a fresh grid of `dims` placed at `offset`.
    #[must_use]
    pub fn generate(&self, dims: GridDims, offset: WorldOffset) -> (VoxelGrid, GenerationStats) {
        let mut grid = VoxelGrid::new(dims);
        let stats = self.generate_into(&mut grid, offset);
        (grid, stats)
    }

    /// Runs both passes against `grid`, replacing its contents.
    pub fn generate_into(&self, grid: &mut VoxelGrid, offset: WorldOffset) -> GenerationStats {
        let carved_cells = self.generate_terrain(grid, offset);
        let trees = self.stamp_trees(grid);
        let stats = GenerationStats {
            solid_cells: grid.solid_count(),
            carved_cells,
            trees,
        };
        info!(
            seed = self.seed.value(),
            solid = stats.solid_cells,
            carved = stats.carved_cells,
            trees = stats.trees,
            "world generated"
        );
        stats
    }

    /// Pass 1: layered columns with tunnels. Returns the number of carved cells.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn generate_terrain(&self, grid: &mut VoxelGrid, offset: WorldOffset) -> usize {
        let dims = grid.dims();
        let size_y = dims.y as i32;

        // One height per column, indexed `z * X + x`
        let mut heights = Vec::with_capacity(dims.x as usize * dims.z as usize);
        for iz in 0..dims.z as i32 {
            for ix in 0..dims.x as i32 {
                let w = offset.to_world(Coord::new(ix, 0, iz));
                heights.push(self.terrain.height_at(w.x, w.z, size_y));
            }
        }

        let mut carved = 0;
        grid.fill_with(|c| {
            let h = heights[c.z as usize * dims.x as usize + c.x as usize];
            let tag = self.terrain.layer_at(c.y, h)?;
            let w = offset.to_world(c);
            if self.caves.is_carved(w.x, c.y, w.z, h, size_y) {
                carved += 1;
                return None;
            }
            Some(tag)
        });
        debug!(carved, solid = grid.solid_count(), "terrain pass done");
        carved
    }

    /// Pass 2: trees on grass columns. Returns the number of trees stamped.
    #[allow(clippy::cast_possible_wrap)]
    pub fn stamp_trees(&self, grid: &mut VoxelGrid) -> usize {
        if !self.trees.enabled {
            return 0;
        }
        let dims = grid.dims();
        let margin = self.trees.edge_margin;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.derive(TREE_STREAM).value());
        let mut count = 0;

        for ix in margin..dims.x as i32 - margin {
            for iz in margin..dims.z as i32 - margin {
                let Some(top) = grid.topmost_solid(ix, iz) else {
                    continue;
                };
                if grid.block_at(Coord::new(ix, top, iz)) != Some(BlockTag::Grass) {
                    continue;
                }
                if rng.gen::<f64>() < self.trees.chance {
                    self.stamp_tree(grid, Coord::new(ix, top + 1, iz), &mut rng);
                    count += 1;
                }
            }
        }
        count
    }

    /// Trunk upward from `base`, then a leaf blob around the trunk top.
    fn stamp_tree(&self, grid: &mut VoxelGrid, base: Coord, rng: &mut ChaCha8Rng) {
        let params = &self.trees;
        let lo = params.trunk_min.min(params.trunk_max);
        let hi = params.trunk_min.max(params.trunk_max);
        let height = rng.gen_range(lo..=hi);

        for dy in 0..height {
            grid.place_if_empty(base.offset(0, dy, 0), BlockTag::Wood);
        }

        let top = base.offset(0, height - 1, 0);
        let r = params.canopy_radius;
        for dx in -r..=r {
            for dz in -r..=r {
                for dy in -r..=r {
                    let cell = top.offset(dx, dy, dz);
                    if cell.manhattan(top) > params.canopy_reach {
                        continue;
                    }
                    if rng.gen::<f64>() < params.leaf_chance {
                        grid.place_if_empty(cell, BlockTag::Leaves);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_only_world_has_grass_caps() {
        let gen = WorldGenerator::new(WorldSeed::new(1)).with_trees(TreeParams {
            enabled: false,
            ..TreeParams::default()
        });
        let dims = GridDims::cube(16);
        let offset = WorldOffset::centered(dims);
        let (grid, stats) = gen.generate(dims, offset);

        assert_eq!(stats.trees, 0);
        for x in 0..16 {
            for z in 0..16 {
                let w = offset.to_world(Coord::new(x, 0, z));
                let h = gen.height_at(w.x, w.z, dims);
                assert_eq!(grid.topmost_solid(x, z), Some(h - 1));
                assert_eq!(grid.block_at(Coord::new(x, h - 1, z)), Some(BlockTag::Grass));
            }
        }
    }

    #[test]
    fn test_forced_tree_shape() {
        let mut grid = VoxelGrid::new(GridDims::cube(9));
        grid.set_voxel(Coord::new(4, 0, 4), BlockTag::Grass);

        let gen = WorldGenerator::new(WorldSeed::new(9)).with_trees(TreeParams {
            chance: 1.0,
            leaf_chance: 1.0,
            trunk_min: 4,
            trunk_max: 4,
            edge_margin: 4,
            ..TreeParams::default()
        });
        assert_eq!(gen.stamp_trees(&mut grid), 1);

        for y in 1..=4 {
            assert_eq!(grid.block_at(Coord::new(4, y, 4)), Some(BlockTag::Wood));
        }
        // 5x5x5 cube minus cells past reach 4 (8 at distance 6, 24 at distance 5),
        // minus the 3 trunk cells inside the blob
        let top = Coord::new(4, 4, 4);
        let leaves = grid
            .iter_solid()
            .filter(|&(_, tag)| tag == BlockTag::Leaves)
            .inspect(|&(c, _)| assert!(c.manhattan(top) <= 4))
            .count();
        assert_eq!(leaves, 125 - 8 - 24 - 3);
    }
}
