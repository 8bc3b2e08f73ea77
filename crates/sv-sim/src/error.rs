use sv_fleet::FleetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("fleet error: {0}")]
    Fleet(#[from] FleetError),
}

pub type SimResult<T> = Result<T, SimError>;
