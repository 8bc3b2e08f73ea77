//! The `Vehicle` record and its parts.
//!
//! Status and type enums serialise in `SCREAMING_SNAKE_CASE`
//! (`"IN_SERVICE"`, `"BI_ARTICULATED"`), which is what supervision UIs
//! display verbatim.

use serde::{Deserialize, Serialize};

use sv_core::{Direction, GeoPoint, RouteId, RouteKey, VehicleId};

/// Cruise speed given to a vehicle when it is put into service.
pub const DEFAULT_BUS_SPEED_KMH: f64 = 30.0;

/// Every bus model in the fleet has four doors.
pub const DOOR_COUNT: usize = 4;

const TRACTOR_LENGTH_M: f64 = 12.0;
const TRAILER_LENGTH_M: f64 = 6.0;
const BUS_WIDTH_M: f64 = 2.5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    #[default]
    Idle,
    InService,
    /// Haut-le-pied: running empty, e.g. to or from the depot.
    Hlp,
    Emergency,
    OffLine,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Idle      => "IDLE",
            VehicleStatus::InService => "IN_SERVICE",
            VehicleStatus::Hlp       => "HLP",
            VehicleStatus::Emergency => "EMERGENCY",
            VehicleStatus::OffLine   => "OFF_LINE",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusType {
    #[default]
    Standard,
    Articulated,
    BiArticulated,
}

impl BusType {
    /// Rigid body count: the tractor plus one per articulation.
    pub fn segment_count(self) -> usize {
        match self {
            BusType::Standard      => 1,
            BusType::Articulated   => 2,
            BusType::BiArticulated => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BusType::Standard      => "STANDARD",
            BusType::Articulated   => "ARTICULATED",
            BusType::BiArticulated => "BI_ARTICULATED",
        }
    }
}

/// One rigid body of a bus.  Index 0 is the tractor; only it is moved by
/// the simulator, trailers keep their last pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusSegment {
    pub id:          String,
    pub length_m:    f64,
    pub width_m:     f64,
    pub position:    GeoPoint,
    pub heading_deg: f64,
}

impl BusSegment {
    fn build(bus_type: BusType, position: GeoPoint) -> Vec<BusSegment> {
        (0..bus_type.segment_count())
            .map(|i| BusSegment {
                id:          if i == 0 { "tractor".to_string() } else { format!("trailer_{i}") },
                length_m:    if i == 0 { TRACTOR_LENGTH_M } else { TRAILER_LENGTH_M },
                width_m:     BUS_WIDTH_M,
                position,
                heading_deg: 0.0,
            })
            .collect()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergyType {
    #[default]
    Electric,
    Cng,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alerts {
    pub abs:      bool,
    pub overheat: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    /// State of charge or tank level, percent.
    pub energy_level:  f64,
    pub energy_type:   EnergyType,
    /// `true` = open.
    pub doors:         [bool; DOOR_COUNT],
    pub engine_temp_c: f64,
    pub alerts:        Alerts,
    pub odometer_km:   f64,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            energy_level:  85.0,
            energy_type:   EnergyType::Electric,
            doors:         [false; DOOR_COUNT],
            engine_temp_c: 75.0,
            alerts:        Alerts::default(),
            odometer_km:   0.0,
        }
    }
}

/// The line and direction a vehicle is working.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub route_id:  RouteId,
    pub direction: Direction,
}

impl Assignment {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.route_id.clone(), self.direction)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id:                 VehicleId,
    /// Operator-facing name, e.g. `"bus-001"`.
    pub label:              String,
    pub bus_type:           BusType,
    pub status:             VehicleStatus,
    pub speed_kmh:          f64,
    pub assignment:         Option<Assignment>,
    /// Metres travelled along the assigned route's path.
    pub distance_on_path_m: f64,
    pub segments:           Vec<BusSegment>,
    pub telemetry:          Telemetry,
}

impl Vehicle {
    /// An idle, unassigned vehicle parked at `position`.
    pub fn new(id: VehicleId, label: impl Into<String>, bus_type: BusType, position: GeoPoint) -> Self {
        Self {
            id,
            label: label.into(),
            bus_type,
            status: VehicleStatus::Idle,
            speed_kmh: 0.0,
            assignment: None,
            distance_on_path_m: 0.0,
            segments: BusSegment::build(bus_type, position),
            telemetry: Telemetry::default(),
        }
    }

    /// Position of the tractor.
    pub fn position(&self) -> GeoPoint {
        self.segments[0].position
    }

    pub fn heading_deg(&self) -> f64 {
        self.segments[0].heading_deg
    }

    pub fn route_key(&self) -> Option<RouteKey> {
        self.assignment.as_ref().map(Assignment::key)
    }

    /// Metres per second at the current speed.
    pub fn speed_mps(&self) -> f64 {
        self.speed_kmh * 1000.0 / 3600.0
    }
}
