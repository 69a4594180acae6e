use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Raised by the pure response normalizer when a payload has the wrong shape.
#[derive(Debug, ThisError)]
pub enum NormalizeError {
    #[error("Malformed Response Error: {message} {location}")]
    MalformedResponse {
        message: String,
        location: ErrorLocation,
    },
}

impl NormalizeError {
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        NormalizeError::MalformedResponse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
