//! Geometry error type.

use thiserror::Error;

use sv_core::OsmId;

/// Errors produced by `sv-geometry`.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("no relation found in the element set")]
    MissingRelation,

    #[error("relation {relation} has no way member with geometry")]
    NoUsableWays { relation: OsmId },

    #[error("path has {points} point(s); at least 2 are required")]
    InsufficientGeometry { points: usize },
}

pub type GeometryResult<T> = Result<T, GeometryError>;
