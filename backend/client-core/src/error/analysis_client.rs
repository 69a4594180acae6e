//! Errors raised while talking to the images and analysis backends.
//!
//! Classification is by variant, never by message content:
//! - `InvalidInput` fails fast and is never retried
//! - `Http`, `Server`, `MalformedResponse` and `Json` are transient service failures
//! - `UrlParse` is a configuration problem

use crate::error::normalizer::NormalizeError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AnalysisClientError {
    #[error("Invalid Input Error: {message} {location}")]
    InvalidInput {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("Server Error: HTTP {status} - {message} {location}")]
    Server {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed Response Error: {message} {location}")]
    MalformedResponse {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },
}

impl AnalysisClientError {
    #[track_caller]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AnalysisClientError::InvalidInput {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Non-2xx response with whatever body the backend sent.
    #[track_caller]
    pub fn server(status_code: u16, body: impl Into<String>) -> Self {
        AnalysisClientError::Server {
            status: HttpStatusCode(status_code),
            message: body.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AnalysisClientError::Http { .. }
            | AnalysisClientError::Server { .. }
            | AnalysisClientError::MalformedResponse { .. }
            | AnalysisClientError::Json { .. } => true,
            AnalysisClientError::InvalidInput { .. } | AnalysisClientError::UrlParse { .. } => {
                false
            }
        }
    }

    pub fn error_category(&self) -> &'static str {
        match self {
            AnalysisClientError::InvalidInput { .. } => "invalid_input",
            AnalysisClientError::UrlParse { .. } => "configuration",
            _ => "transient_service_failure",
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            AnalysisClientError::Server { status, .. } => Some(status.0),
            _ => None,
        }
    }
}

impl From<NormalizeError> for AnalysisClientError {
    fn from(error: NormalizeError) -> Self {
        match error {
            NormalizeError::MalformedResponse { message, location } => {
                AnalysisClientError::MalformedResponse { message, location }
            }
        }
    }
}

impl From<url::ParseError> for AnalysisClientError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        AnalysisClientError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for AnalysisClientError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        AnalysisClientError::Http {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for AnalysisClientError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        AnalysisClientError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
