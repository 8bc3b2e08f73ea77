//! The `Fleet` — a dense arena of vehicles addressed by `VehicleId`.

use tracing::info;

use sv_core::{Direction, GeoPoint, RouteId, VehicleId};

use crate::{Assignment, BusType, FleetError, FleetResult, Vehicle, VehicleStatus, DEFAULT_BUS_SPEED_KMH, DOOR_COUNT};

/// All vehicles, indexed by `VehicleId`.  Vehicles are never removed, so
/// ids stay valid for the life of the fleet.
#[derive(Clone, Debug, Default)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an idle, unassigned vehicle parked at `position` and return its id.
    pub fn add_vehicle(&mut self, label: impl Into<String>, bus_type: BusType, position: GeoPoint) -> VehicleId {
        let id = VehicleId(self.vehicles.len() as u32);
        self.vehicles.push(Vehicle::new(id, label, bus_type, position));
        id
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id.index())
    }

    pub fn find_by_label(&self, label: &str) -> Option<VehicleId> {
        self.vehicles.iter().find(|v| v.label == label).map(|v| v.id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vehicle> {
        self.vehicles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Vehicle> {
        self.vehicles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Put `id` into service on `route_id` / `direction`, `start_distance_m`
    /// metres along the path, at [`DEFAULT_BUS_SPEED_KMH`].
    pub fn assign_to_route(
        &mut self,
        id:               VehicleId,
        route_id:         RouteId,
        direction:        Direction,
        start_distance_m: f64,
    ) -> FleetResult<()> {
        let vehicle = self.vehicle_mut(id)?;
        info!(
            vehicle = %vehicle.label,
            route = %route_id,
            %direction,
            start_m = start_distance_m,
            "vehicle assigned to route",
        );
        vehicle.assignment = Some(Assignment { route_id, direction });
        vehicle.distance_on_path_m = start_distance_m.max(0.0);
        vehicle.speed_kmh = DEFAULT_BUS_SPEED_KMH;
        vehicle.status = VehicleStatus::InService;
        Ok(())
    }

    pub fn set_status(&mut self, id: VehicleId, status: VehicleStatus) -> FleetResult<()> {
        self.vehicle_mut(id)?.status = status;
        Ok(())
    }

    /// Flip door `index` and return its new state (`true` = open).
    pub fn toggle_door(&mut self, id: VehicleId, index: usize) -> FleetResult<bool> {
        if index >= DOOR_COUNT {
            return Err(FleetError::DoorOutOfRange { vehicle: id, index });
        }
        let door = &mut self.vehicle_mut(id)?.telemetry.doors[index];
        *door = !*door;
        Ok(*door)
    }

    pub fn set_speed(&mut self, id: VehicleId, speed_kmh: f64) -> FleetResult<()> {
        if !speed_kmh.is_finite() || speed_kmh < 0.0 {
            return Err(FleetError::InvalidSpeed(speed_kmh));
        }
        self.vehicle_mut(id)?.speed_kmh = speed_kmh;
        Ok(())
    }

    fn vehicle_mut(&mut self, id: VehicleId) -> FleetResult<&mut Vehicle> {
        self.vehicles.get_mut(id.index()).ok_or(FleetError::VehicleNotFound(id))
    }
}

impl<'a> IntoIterator for &'a Fleet {
    type Item = &'a Vehicle;
    type IntoIter = std::slice::Iter<'a, Vehicle>;

    fn into_iter(self) -> Self::IntoIter {
        self.vehicles.iter()
    }
}
