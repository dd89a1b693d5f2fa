//! # Terrain Golden Tests
//!
//! Fixed values for seed 1337. Any change here means every existing world
//! looks different.

use cavern_core::{BlockTag, VoxelGrid};
use cavern_procedural::{TreeParams, WorldGenerator, WorldSeed};
use cavern_shared::{Coord, GridDims, WorldOffset};

fn terrain_only(dims: GridDims) -> (VoxelGrid, usize) {
    let gen = WorldGenerator::new(WorldSeed::new(1337));
    let mut grid = VoxelGrid::new(dims);
    let carved = gen.generate_terrain(&mut grid, WorldOffset::centered(dims));
    (grid, carved)
}

/// Index-space Y values of the cells carved out of one column.
fn carved_in_column(grid: &VoxelGrid, gen: &WorldGenerator, offset: WorldOffset, x: i32, z: i32) -> Vec<i32> {
    let w = offset.to_world(Coord::new(x, 0, z));
    let h = gen.height_at(w.x, w.z, grid.dims());
    (0..h).filter(|&y| !grid.is_solid(Coord::new(x, y, z))).collect()
}

#[test]
fn test_golden_heights() {
    let gen = WorldGenerator::new(WorldSeed::new(1337));
    let dims = GridDims::cube(16);
    assert_eq!(gen.height_at(0, 0, dims), 12);
    assert_eq!(gen.height_at(-8, -8, dims), 6);
    assert_eq!(gen.height_at(7, 7, dims), 13);
    assert_eq!(gen.height_at(3, -5, dims), 13);
    assert_eq!(gen.height_at(-8, 7, dims), 8);
    assert_eq!(gen.height_at(0, 0, GridDims::new(64, 32, 64)), 12);
}

#[test]
fn test_golden_small_volume() {
    let dims = GridDims::cube(16);
    let offset = WorldOffset::centered(dims);
    assert_eq!(offset, WorldOffset::new(-8, 0, -8));

    let (grid, carved) = terrain_only(dims);
    assert_eq!(carved, 758);
    assert_eq!(grid.solid_count(), 2006);

    let count = |tag| grid.iter_solid().filter(|&(_, t)| t == tag).count();
    assert_eq!(count(BlockTag::Grass), 256);
    assert_eq!(count(BlockTag::Dirt), 385);
    assert_eq!(count(BlockTag::Stone), 1365);
}

#[test]
fn test_golden_first_carved_cells() {
    let dims = GridDims::cube(16);
    let (grid, _) = terrain_only(dims);
    let gen = WorldGenerator::new(WorldSeed::new(1337));
    let offset = WorldOffset::centered(dims);

    let carved: Vec<Coord> = grid
        .iter_coords()
        .filter(|&c| {
            let w = offset.to_world(c);
            c.y < gen.height_at(w.x, w.z, dims) && !grid.is_solid(c)
        })
        .take(6)
        .collect();
    assert_eq!(
        carved,
        vec![
            Coord::new(9, 0, 0),
            Coord::new(10, 0, 0),
            Coord::new(11, 0, 0),
            Coord::new(12, 0, 0),
            Coord::new(8, 0, 1),
            Coord::new(9, 0, 1),
        ]
    );
}

#[test]
fn test_golden_columns() {
    let dims = GridDims::cube(16);
    let (grid, _) = terrain_only(dims);
    let gen = WorldGenerator::new(WorldSeed::new(1337));
    let offset = WorldOffset::centered(dims);

    // World column (0, 0): stone 0-7, dirt 8-10, grass 11, tunnel through y = 10
    assert_eq!(carved_in_column(&grid, &gen, offset, 8, 8), vec![10]);
    assert_eq!(grid.block_at(Coord::new(8, 11, 8)), Some(BlockTag::Grass));
    assert_eq!(grid.block_at(Coord::new(8, 9, 8)), Some(BlockTag::Dirt));
    assert_eq!(grid.block_at(Coord::new(8, 7, 8)), Some(BlockTag::Stone));
    assert_eq!(grid.block_at(Coord::new(8, 12, 8)), None);

    // World column (-8, 7)
    assert_eq!(carved_in_column(&grid, &gen, offset, 0, 15), vec![3, 4, 5, 6]);
}

#[test]
fn test_golden_default_world() {
    let (grid, carved) = terrain_only(GridDims::new(64, 32, 64));
    assert_eq!(grid.solid_count(), 25_708);
    assert_eq!(carved, 8_272);
}

#[test]
fn test_generation_is_deterministic() {
    let dims = GridDims::new(32, 24, 32);
    let offset = WorldOffset::centered(dims);
    let a = WorldGenerator::new(WorldSeed::new(1337)).generate(dims, offset);
    let b = WorldGenerator::new(WorldSeed::new(1337)).generate(dims, offset);
    assert_eq!(a.1, b.1);
    assert!(a.0 == b.0, "Same seed produced different grids");
}

#[test]
fn test_seed_only_moves_trees() {
    let dims = GridDims::new(48, 24, 48);
    let offset = WorldOffset::centered(dims);
    let (a, sa) = WorldGenerator::new(WorldSeed::new(1)).generate(dims, offset);
    let (b, sb) = WorldGenerator::new(WorldSeed::new(2)).generate(dims, offset);

    assert_eq!(sa.carved_cells, sb.carved_cells);
    for c in a.iter_coords() {
        let terrain = |t: Option<BlockTag>| t.filter(|&t| t != BlockTag::Wood && t != BlockTag::Leaves);
        assert_eq!(terrain(a.block_at(c)), terrain(b.block_at(c)), "Terrain differs at {c:?}");
    }
}

#[test]
fn test_trees_never_overwrite_terrain() {
    let dims = GridDims::new(64, 32, 64);
    let offset = WorldOffset::centered(dims);
    let gen = WorldGenerator::new(WorldSeed::new(1337)).with_trees(TreeParams {
        chance: 0.2,
        ..TreeParams::default()
    });

    let mut terrain = VoxelGrid::new(dims);
    gen.generate_terrain(&mut terrain, offset);
    let (world, stats) = gen.generate(dims, offset);
    assert!(stats.trees > 0);

    for (c, tag) in terrain.iter_solid() {
        assert_eq!(world.block_at(c), Some(tag), "Terrain overwritten at {c:?}");
    }
    for (c, tag) in world.iter_solid() {
        if terrain.block_at(c).is_none() {
            assert!(matches!(tag, BlockTag::Wood | BlockTag::Leaves));
        }
    }
}
