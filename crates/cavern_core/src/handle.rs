//! # Surface Handles
//!
//! Generational handles for exposed-voxel instances, plus a registry that
//! hands them out. Headless hosts (tools, tests, the channel host) use the
//! registry as their "renderer": it records what would be drawn and rejects
//! double releases.

use cavern_shared::{Coord, WorldCoord};
use tracing::warn;

use crate::block::BlockTag;
use crate::surface::SurfaceHost;

/// Opaque token for one exposed voxel's instance.
///
/// - Lower 32 bits: slot index in the registry
/// - Upper 32 bits: generation, bumped every time the slot is released
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    /// Null handle; never issued by a registry.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates a handle from slot index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Slot index.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Whether this is [`SurfaceHandle::NULL`].
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }

    /// Raw 64-bit value.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }
}

impl Default for SurfaceHandle {
    fn default() -> Self {
        Self::NULL
    }
}

/// What a live handle stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceInstance {
    /// Index-space position.
    pub coord: Coord,
    /// World-space position.
    pub world: WorldCoord,
    /// Block tag at creation time.
    pub tag: BlockTag,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    instance: Option<SurfaceInstance>,
}

/// Growable slot array with a free list.
///
/// Released slots are reused last-in first-out with a bumped generation, so
/// a stale handle never aliases a new instance.
#[derive(Clone, Debug, Default)]
pub struct HandleRegistry {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl HandleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with room for `capacity` live handles.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Issues a handle for `instance`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn allocate(&mut self, instance: SurfaceInstance) -> SurfaceHandle {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.instance = Some(instance);
            return SurfaceHandle::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            instance: Some(instance),
        });
        SurfaceHandle::new(index, 0)
    }

    /// Releases `handle`, returning what it stood for.
    ///
    /// Stale, null or foreign handles return `None` and change nothing.
    pub fn release(&mut self, handle: SurfaceHandle) -> Option<SurfaceInstance> {
        let index = handle.index();
        let slot = self.slots.get_mut(index as usize)?;
        if handle.is_null() || slot.generation != handle.generation() {
            return None;
        }
        let instance = slot.instance.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(index);
        self.live -= 1;
        Some(instance)
    }

    /// Whether `handle` is currently live.
    #[must_use]
    pub fn is_live(&self, handle: SurfaceHandle) -> bool {
        self.get(handle).is_some()
    }

    /// The instance behind a live handle.
    #[must_use]
    pub fn get(&self, handle: SurfaceHandle) -> Option<&SurfaceInstance> {
        if handle.is_null() {
            return None;
        }
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.instance.as_ref())
    }

    /// Number of live handles.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live
    }

    /// Every live handle with its instance.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (SurfaceHandle, &SurfaceInstance)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.instance
                .as_ref()
                .map(|inst| (SurfaceHandle::new(i as u32, slot.generation), inst))
        })
    }
}

impl SurfaceHost for HandleRegistry {
    type Handle = SurfaceHandle;

    fn on_exposed(&mut self, coord: Coord, world: WorldCoord, tag: BlockTag) -> SurfaceHandle {
        self.allocate(SurfaceInstance { coord, world, tag })
    }

    fn on_occluded(&mut self, handle: SurfaceHandle) {
        if self.release(handle).is_none() {
            warn!(handle = handle.to_bits(), "released a handle that is not live");
        }
    }
}
