//! Plain data row types written by output backends.

use chrono::NaiveDateTime;

use sv_fleet::Vehicle;
use sv_sim::LogEntry;

/// One vehicle's state at a snapshot frame.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshotRow {
    pub frame:        u64,
    pub virtual_time: NaiveDateTime,
    pub vehicle:      String,
    pub status:       &'static str,
    /// Empty when unassigned.
    pub route:        String,
    pub direction:    &'static str,
    pub distance_m:   f64,
    pub lon:          f64,
    pub lat:          f64,
    pub heading_deg:  f64,
    pub speed_kmh:    f64,
    pub odometer_km:  f64,
}

impl VehicleSnapshotRow {
    pub fn from_vehicle(frame: u64, virtual_time: NaiveDateTime, v: &Vehicle) -> Self {
        let (route, direction) = match &v.assignment {
            Some(a) => (a.route_id.to_string(), a.direction.as_str()),
            None    => (String::new(), ""),
        };
        let position = v.position();
        Self {
            frame,
            virtual_time,
            vehicle:     v.label.clone(),
            status:      v.status.as_str(),
            route,
            direction,
            distance_m:  v.distance_on_path_m,
            lon:         position.lon,
            lat:         position.lat,
            heading_deg: v.heading_deg(),
            speed_kmh:   v.speed_kmh,
            odometer_km: v.telemetry.odometer_km,
        }
    }
}

/// One event-log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLogRow {
    pub id:           u64,
    pub virtual_time: NaiveDateTime,
    pub severity:     &'static str,
    pub source:       &'static str,
    pub message:      String,
    /// Empty when the entry is not about a specific entity.
    pub entity_id:    String,
}

impl From<&LogEntry> for EventLogRow {
    fn from(e: &LogEntry) -> Self {
        Self {
            id:           e.id,
            virtual_time: e.virtual_time,
            severity:     e.severity.as_str(),
            source:       e.source.as_str(),
            message:      e.message.clone(),
            entity_id:    e.entity_id.clone().unwrap_or_default(),
        }
    }
}
