//! `sv-geometry` — route geometry: from raw OSM elements to a sampled path.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`osm`]       | `RawElement` (node / way / relation), `OverpassResponse`   |
//! | [`assembler`] | `assemble` — relation members → ordered path + stops       |
//! | [`sampler`]   | `position_at`, `path_length`, `has_reached_end`            |
//! | [`route`]     | `RouteGeometry`, `Stop`                                    |
//! | [`stops`]     | `StopIndex` — R-tree nearest-stop lookup                   |
//! | [`error`]     | `GeometryError`, `GeometryResult<T>`                       |
//!
//! Everything here is pure and synchronous; fetching the raw elements is the
//! job of `sv-ingest`.

pub mod assembler;
pub mod error;
pub mod osm;
pub mod route;
pub mod sampler;
pub mod stops;


pub use assembler::assemble;
pub use error::{GeometryError, GeometryResult};
pub use osm::{MemberKind, OverpassResponse, RawElement, RawNode, RawRelation, RawWay, RelationMember};
pub use route::{RouteGeometry, Stop};
pub use sampler::{has_reached_end, path_length, position_at, Sample, DEFAULT_END_THRESHOLD_M, HEADING_LOOKAHEAD_M};
pub use stops::StopIndex;
