//! `sv-fleet` — vehicles and how they move.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`vehicle`]   | `Vehicle`, `VehicleStatus`, `BusType`, `BusSegment`, `Telemetry` |
//! | [`store`]     | `Fleet` — `Vec<Vehicle>` indexed by `VehicleId`              |
//! | [`roster`]    | `Roster` — initial fleet from JSON                           |
//! | [`simulator`] | `FleetSimulator`, `GeometryLookup`, `FleetEvent`             |
//! | [`error`]     | `FleetError`, `FleetResult<T>`                               |
//!
//! # Movement model
//!
//! Each vehicle carries one scalar of progress, `distance_on_path_m`.  An
//! update adds `speed · Δt` to it and asks `sv_geometry::position_at` where
//! that lands on the assigned path.  Vehicles stop at the terminus; there is
//! no reversal or depot return.

pub mod error;
pub mod roster;
pub mod simulator;
pub mod store;
pub mod vehicle;


pub use error::{FleetError, FleetResult};
pub use roster::{Roster, RosterEntry, DEPOT_POSITION};
pub use simulator::{FleetEvent, FleetSimulator, GeometryLookup};
pub use store::Fleet;
pub use vehicle::{
    Alerts, Assignment, BusSegment, BusType, EnergyType, Telemetry, Vehicle, VehicleStatus,
    DEFAULT_BUS_SPEED_KMH, DOOR_COUNT,
};
