//! HTTP error mapping.
//!
//! Every failure leaves the server as JSON `{ "error": "<message>" }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use sv_fleet::FleetError;
use sv_ingest::IngestError;
use sv_sim::SimError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("unknown vehicle: {0}")]
    UnknownVehicle(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Sim(#[from] SimError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_)                              => StatusCode::BAD_REQUEST,
            ApiError::UnknownVehicle(_)                            => StatusCode::NOT_FOUND,
            ApiError::Ingest(IngestError::NotFound(_))             => StatusCode::NOT_FOUND,
            ApiError::Ingest(IngestError::Timeout(_))              => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Ingest(_)                                    => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Fleet(FleetError::VehicleNotFound(_))
            | ApiError::Sim(SimError::Fleet(FleetError::VehicleNotFound(_))) => StatusCode::NOT_FOUND,
            ApiError::Fleet(_) | ApiError::Sim(_)                  => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), "{self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
