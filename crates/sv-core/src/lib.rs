//! `sv-core` — foundational types for the `rust_sv` transit supervision
//! simulator.
//!
//! This crate is a dependency of every other `sv-*` crate.  It has no `sv-*`
//! dependencies and only small external ones (`thiserror`, `serde`, `chrono`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`ids`]       | `VehicleId`, `OsmId`, `RouteId`, `RouteKey`              |
//! | [`geo`]       | `GeoPoint`, planar distance, compass bearing             |
//! | [`direction`] | `Direction` (forward / backward)                         |
//! | [`time`]      | `VirtualClock`, `SpeedMultiplier`, `WallClock`           |
//! | [`error`]     | `CoreError`, `CoreResult`                                |

pub mod direction;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{OsmId, RouteId, RouteKey, VehicleId};
pub use time::{ManualClock, SpeedMultiplier, SystemClock, VirtualClock, WallClock};
