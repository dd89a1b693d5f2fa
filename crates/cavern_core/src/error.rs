//! # Core Error Types
//!
//! Mutations never fail loudly: out-of-range and invalid-for-state requests
//! answer `false`. The errors here come from consistency audits and from
//! parsing user-supplied names.

use cavern_shared::Coord;
use thiserror::Error;

/// Inconsistencies between the voxel grid and the tracked surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// A solid, exposed voxel has no handle.
    #[error("exposed voxel at {0:?} has no surface handle")]
    MissingHandle(Coord),

    /// A handle exists for a voxel that is empty or fully enclosed.
    #[error("surface handle at {0:?} belongs to a hidden or empty voxel")]
    StaleHandle(Coord),

    /// The running exposed count disagrees with the handle array.
    #[error("exposed count mismatch: tracked {tracked}, actual {actual}")]
    CountMismatch {
        /// Value of the running counter.
        tracked: usize,
        /// Number of live handles found by a full scan.
        actual: usize,
    },

    /// The initial surface scan has not run yet.
    #[error("surface has not been built")]
    NotBuilt,
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// A block name that matches no [`BlockTag`](crate::BlockTag).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown block tag: {0:?}")]
pub struct ParseBlockTagError(pub String);
