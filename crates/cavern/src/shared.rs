//! # Shared World
//!
//! A coarse-locked handle for hosts that touch the world from more than one
//! thread. Every operation takes the lock once, so each mutation and its
//! surface repair are atomic with respect to other callers.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use cavern_core::SurfaceHost;
use cavern_shared::{Vec3, WorldCoord};

use crate::world::World;

/// Cloneable, thread-safe handle to one [`World`].
pub struct SharedWorld<H: SurfaceHost> {
    inner: Arc<Mutex<World<H>>>,
}

impl<H: SurfaceHost> SharedWorld<H> {
    /// Wraps a world.
    #[must_use]
    pub fn new(world: World<H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    /// Locks the world for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, World<H>> {
        self.inner.lock()
    }

    /// Runs `f` with the world locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut World<H>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// See [`World::place`].
    pub fn place(&self, hit: Vec3, normal: Vec3) -> bool {
        self.inner.lock().place(hit, normal)
    }

    /// See [`World::break_block`].
    pub fn break_block(&self, hit: Vec3) -> bool {
        self.inner.lock().break_block(hit)
    }

    /// See [`World::is_solid_at`].
    #[must_use]
    pub fn is_solid_at(&self, pos: Vec3) -> bool {
        self.inner.lock().is_solid_at(pos)
    }

    /// See [`World::height_at`].
    #[must_use]
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        self.inner.lock().height_at(x, z)
    }

    /// See [`World::spawn_point`].
    #[must_use]
    pub fn spawn_point(&self) -> WorldCoord {
        self.inner.lock().spawn_point()
    }

    /// Unwraps the world if this is the last handle.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged while other handles exist.
    pub fn try_into_inner(self) -> Result<World<H>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<H: SurfaceHost> Clone for SharedWorld<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: SurfaceHost> std::fmt::Debug for SharedWorld<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedWorld")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}
