//! # Surface Event Channel
//!
//! A [`SurfaceHost`] for hosts whose renderer lives on another thread.
//!
//! ```text
//! ┌─────────────┐  Exposed / Occluded  ┌─────────────┐
//! │   World     │─────────────────────>│  Renderer   │
//! │ (tracker)   │   crossbeam channel  │  (mirror)   │
//! └─────────────┘                      └─────────────┘
//! ```
//!
//! The channel is unbounded: a dropped event would leave the renderer's
//! mirror out of step with the exposed set for good.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::warn;

use cavern_core::{BlockTag, HandleRegistry, SurfaceHandle, SurfaceHost, SurfaceInstance};
use cavern_shared::{Coord, WorldCoord};

/// One change to the visible surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Create an instance.
    Exposed {
        /// Instance handle; later passed back in `Occluded`.
        handle: SurfaceHandle,
        /// World-space position.
        world: WorldCoord,
        /// Block tag, for material selection.
        tag: BlockTag,
    },
    /// Destroy an instance.
    Occluded {
        /// Handle from the matching `Exposed`.
        handle: SurfaceHandle,
    },
}

/// Surface host that allocates handles locally and streams events out.
#[derive(Debug)]
pub struct ChannelHost {
    registry: HandleRegistry,
    sender: Sender<SurfaceEvent>,
}

impl ChannelHost {
    /// Creates a host and the receiving end for the render thread.
    #[must_use]
    pub fn new() -> (Self, SurfaceReceiver) {
        let (sender, receiver) = unbounded();
        (
            Self {
                registry: HandleRegistry::new(),
                sender,
            },
            SurfaceReceiver { receiver },
        )
    }

    /// Live handles on the world side.
    #[must_use]
    pub const fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    fn send(&self, event: SurfaceEvent) {
        if self.sender.send(event).is_err() {
            warn!(?event, "surface receiver dropped; event lost");
        }
    }
}

impl SurfaceHost for ChannelHost {
    type Handle = SurfaceHandle;

    fn on_exposed(&mut self, coord: Coord, world: WorldCoord, tag: BlockTag) -> SurfaceHandle {
        let handle = self.registry.allocate(SurfaceInstance { coord, world, tag });
        self.send(SurfaceEvent::Exposed { handle, world, tag });
        handle
    }

    fn on_occluded(&mut self, handle: SurfaceHandle) {
        if self.registry.release(handle).is_none() {
            warn!(handle = handle.to_bits(), "occluded a handle that is not live");
            return;
        }
        self.send(SurfaceEvent::Occluded { handle });
    }
}

/// Render-thread end of a [`ChannelHost`].
#[derive(Clone, Debug)]
pub struct SurfaceReceiver {
    receiver: Receiver<SurfaceEvent>,
}

impl SurfaceReceiver {
    /// Receives all pending events (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<SurfaceEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<SurfaceEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
