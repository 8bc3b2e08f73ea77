//! Initial fleet description, loaded from JSON.
//!
//! ```json
//! [ { "id": "bus-001", "busType": "STANDARD", "route": "T1",
//!     "direction": "forward", "startDistance": 0 } ]
//! ```
//!
//! `route` and `direction` are optional together; a vehicle without them
//! starts idle at the depot.

use std::path::Path;

use serde::{Deserialize, Serialize};

use sv_core::{Direction, GeoPoint, RouteId};

use crate::{BusType, Fleet, FleetResult};

/// Where vehicles stand before their route geometry is known
/// (Place Stanislas, Nancy).
pub const DEPOT_POSITION: GeoPoint = GeoPoint::new(6.18, 48.68);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id:             String,
    #[serde(default)]
    pub bus_type:       BusType,
    #[serde(default)]
    pub route:          Option<RouteId>,
    #[serde(default)]
    pub direction:      Option<Direction>,
    #[serde(default)]
    pub start_distance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn from_json_str(json: &str) -> FleetResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> FleetResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Build the fleet, assigning every entry that names a route.  A route
    /// without a direction runs forward.
    pub fn build_fleet(&self) -> FleetResult<Fleet> {
        let mut fleet = Fleet::new();
        for entry in &self.entries {
            let id = fleet.add_vehicle(entry.id.clone(), entry.bus_type, DEPOT_POSITION);
            if let Some(route) = &entry.route {
                let direction = entry.direction.unwrap_or(Direction::Forward);
                fleet.assign_to_route(id, route.clone(), direction, entry.start_distance)?;
            }
        }
        Ok(fleet)
    }
}

impl Default for Roster {
    /// One standard bus working T1 forward from the start of the line.
    fn default() -> Self {
        Self {
            entries: vec![RosterEntry {
                id:             "bus-001".to_string(),
                bus_type:       BusType::Standard,
                route:          Some(RouteId::new("T1")),
                direction:      Some(Direction::Forward),
                start_distance: 0.0,
            }],
        }
    }
}
