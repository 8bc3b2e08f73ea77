//! Shared error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! into them via `From` or keep it as one variant.

use thiserror::Error;

/// The base error type for `sv-core` parsing and validation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid direction {0:?}: expected \"forward\" or \"backward\"")]
    InvalidDirection(String),

    #[error("invalid speed multiplier {0}: expected one of 1, 10, 30, 60")]
    InvalidSpeed(u32),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `sv-core`.
pub type CoreResult<T> = Result<T, CoreError>;
