//! # Cavern Probe
//!
//! Headless world check: builds a world, digs a shaft, puts a block back and
//! audits the surface after every step.
//!
//! Usage: `cavern_probe [world.toml]`
//!
//! Logging follows `RUST_LOG` (default `info`). Exits non-zero if the config
//! is bad or any audit fails.

use std::process::ExitCode;

use cavern::{World, WorldConfig};
use cavern_core::{BlockTag, HandleRegistry};

/// Cells dug straight down from the spawn column.
const SHAFT_DEPTH: i32 = 6;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::default(),
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &WorldConfig) -> Result<(), String> {
    let mut world =
        World::generate(config, HandleRegistry::new()).map_err(|err| err.to_string())?;
    let stats = world.stats();
    let dims = world.grid().dims();

    println!("=== CAVERN PROBE ===");
    println!("seed:         {}", config.seed);
    println!("size:         {} x {} x {}", dims.x, dims.y, dims.z);
    println!("solid cells:  {}", stats.solid_cells);
    println!("carved cells: {}", stats.carved_cells);
    println!("trees:        {}", stats.trees);
    println!("exposed:      {}", world.exposed_count());
    println!("height(0,0):  {}", world.height_at(0, 0));

    let spawn = world.spawn_point();
    println!("spawn:        ({}, {}, {})", spawn.x, spawn.y, spawn.z);
    check(&world, "initial build")?;

    let mut dug = 0;
    for depth in 1..=SHAFT_DEPTH {
        let cell = spawn.offset(0, -2 - depth, 0);
        if world.break_at(cell) {
            dug += 1;
        }
        check(&world, "dig")?;
    }
    println!("dug:          {dug} cells, exposed now {}", world.exposed_count());

    let top = spawn.offset(0, -3, 0);
    if world.place_at(top, BlockTag::Glass) {
        println!("capped shaft with glass");
    }
    check(&world, "cap")?;

    let released = world.teardown();
    if world.host().live_count() != 0 {
        return Err(format!("{} handles leaked after teardown", world.host().live_count()));
    }
    println!("teardown:     {released} handles released");
    println!("OK");
    Ok(())
}

fn check(world: &World<HandleRegistry>, step: &str) -> Result<(), String> {
    world
        .audit()
        .map_err(|err| format!("audit failed after {step}: {err}"))?;
    let live = world.host().live_count();
    if live != world.exposed_count() {
        return Err(format!(
            "after {step}: host holds {live} handles, surface tracks {}",
            world.exposed_count()
        ));
    }
    Ok(())
}
