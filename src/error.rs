use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the location-record core.
///
/// Everything is surfaced synchronously to the caller; there are no retries
/// and no partial recovery. A failed rewrite never leaves a half-written
/// record behind (see `updater::LocationUpdater`).
#[derive(Debug, Error)]
pub enum LocationError {
    /// The `.location` file does not exist. Happens when the host has never
    /// persisted the project, or the project name is wrong.
    #[error("location record not found: {path}")]
    RecordNotFound { path: PathBuf },

    /// The record bytes do not parse: truncated stream, bad chunk marker,
    /// negative reference count, or an invalid string payload.
    #[error("malformed location record: {reason}")]
    MalformedRecord { reason: String },

    /// Encode-side contract violation. The location URI must be constructed
    /// through `uri::build_location_uri` so it carries the `URI//` marker.
    #[error("invalid location record: {reason}")]
    InvalidRecord { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LocationError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        LocationError::MalformedRecord {
            reason: reason.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        LocationError::InvalidRecord {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocationError>;
