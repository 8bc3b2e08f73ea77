use sv_core::VehicleId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),

    #[error("vehicle {vehicle} has no door {index}")]
    DoorOutOfRange { vehicle: VehicleId, index: usize },

    #[error("invalid speed {0} km/h")]
    InvalidSpeed(f64),

    #[error("invalid roster: {0}")]
    Roster(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FleetResult<T> = Result<T, FleetError>;
