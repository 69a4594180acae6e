use common::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the application commands.
///
/// Serialised with a `type` tag so a front end can branch on the kind while
/// the location stays available for bug reports.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Access360Error {
    /// Error from this App
    #[error("Access360 Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Error from access-core operations (config, orchestration, session)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// The search form was submitted with a missing name or address
    #[error("Invalid Location Error: {message} {location}")]
    InvalidLocation {
        message: String,
        location: ErrorLocation,
    },

    /// A report was requested while no results are on screen
    #[error("No Results Error: {message} {location}")]
    NoResults {
        message: String,
        location: ErrorLocation,
    },
}
