//! # Render Channel Tests
//!
//! A renderer that only sees the event stream must end up with exactly the
//! world's exposed set, including when several threads mutate the world.

use std::collections::HashMap;
use std::thread;

use cavern::{ChannelHost, SharedWorld, SurfaceEvent, SurfaceReceiver, World, WorldConfig};
use cavern_core::{BlockTag, SurfaceHandle};
use cavern_shared::{GridDims, Vec3, WorldCoord};

/// What a render thread would keep: one instance per live handle.
#[derive(Default)]
struct RenderMirror {
    instances: HashMap<SurfaceHandle, (WorldCoord, BlockTag)>,
}

impl RenderMirror {
    fn apply(&mut self, rx: &SurfaceReceiver) {
        for event in rx.drain() {
            match event {
                SurfaceEvent::Exposed { handle, world, tag } => {
                    assert!(
                        self.instances.insert(handle, (world, tag)).is_none(),
                        "handle {handle:?} exposed twice"
                    );
                }
                SurfaceEvent::Occluded { handle } => {
                    assert!(
                        self.instances.remove(&handle).is_some(),
                        "handle {handle:?} occluded while not live"
                    );
                }
            }
        }
    }

    fn assert_matches(&self, world: &World<ChannelHost>) {
        assert_eq!(self.instances.len(), world.exposed_count());
        for c in world.surface().exposed() {
            let handle = world.surface().handle_at(c).expect("exposed without handle");
            let (pos, tag) = self.instances.get(handle).expect("renderer missing instance");
            assert_eq!(*pos, world.to_world(c));
            assert_eq!(Some(*tag), world.grid().block_at(c));
        }
    }
}

fn config() -> WorldConfig {
    WorldConfig {
        size: GridDims::new(24, 16, 24),
        ..WorldConfig::default()
    }
}

#[test]
fn test_mirror_follows_build_and_edits() {
    let (host, rx) = ChannelHost::new();
    let mut world = World::generate(&config(), host).unwrap();
    let mut mirror = RenderMirror::default();

    mirror.apply(&rx);
    mirror.assert_matches(&world);

    let top = world.spawn_point().offset(0, -3, 0);
    for depth in 0..4 {
        world.break_at(top.offset(0, -depth, 0));
    }
    world.hotbar_mut().select(BlockTag::Glass);
    world.place(top.offset(0, -4, 0).to_vec3(), Vec3::Y);

    mirror.apply(&rx);
    mirror.assert_matches(&world);
    world.audit().unwrap();

    world.teardown();
    mirror.apply(&rx);
    assert!(mirror.instances.is_empty());
}

#[test]
fn test_shared_world_across_threads() {
    let (host, rx) = ChannelHost::new();
    let shared = SharedWorld::new(World::generate(&config(), host).unwrap());

    let workers: Vec<_> = (0..4)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || {
                // Each worker digs and refills its own quadrant column
                let x = if t % 2 == 0 { -6 } else { 5 };
                let z = if t < 2 { -6 } else { 5 };
                for y in (2..12).rev() {
                    shared.break_block(Vec3::new(x as f32, y as f32, z as f32));
                }
                for y in 2..6 {
                    shared.with(|w| w.place_at(WorldCoord::new(x, y, z), BlockTag::Stone));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let world = shared.try_into_inner().expect("all workers finished");
    world.audit().unwrap();

    let mut mirror = RenderMirror::default();
    mirror.apply(&rx);
    mirror.assert_matches(&world);
}

#[test]
fn test_shared_queries() {
    let (host, _rx) = ChannelHost::new();
    let shared = SharedWorld::new(World::generate(&config(), host).unwrap());
    let spawn = shared.spawn_point();
    assert!(shared.is_solid_at(spawn.offset(0, -3, 0).to_vec3()));
    assert_eq!(shared.height_at(0, 0), shared.lock().height_at(0, 0));

    let other = shared.clone();
    assert!(other.try_into_inner().is_err());
}
