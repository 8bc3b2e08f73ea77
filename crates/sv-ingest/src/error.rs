use std::time::Duration;

use sv_core::RouteId;
use sv_geometry::GeometryError;
use thiserror::Error;

/// Everything that can go wrong between a route id and an assembled
/// geometry.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unknown route: {0}")]
    NotFound(RouteId),

    #[error("request timeout ({}s exceeded)", .0.as_secs())]
    Timeout(Duration),

    #[error("Overpass API error: status {status}")]
    Upstream { status: u16 },

    #[error("Overpass transport error: {0}")]
    Transport(String),

    #[error("malformed route data: {0}")]
    MalformedSource(#[from] GeometryError),

    #[error("invalid route table: {0}")]
    RouteTable(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for IngestError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => IngestError::Upstream { status: status.as_u16() },
            None => IngestError::Transport(e.to_string()),
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
