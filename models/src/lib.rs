//! Domain models for Access 360.
//!
//! Pure data: the location a user picked, the imagery fetched for it and the
//! accessibility analysis returned by the backend. Behaviour that talks to the
//! network or drives the UI lives in `access-core`.

pub mod analysis;
pub mod error;
pub mod images;
pub mod location;

pub use analysis::{AnalysisResult, Observation, Sentiment};
pub use common::ErrorLocation;
pub use error::model_error::ModelError;
pub use images::ImageBundle;
pub use location::{Location, LocationBuilder};

#[cfg(test)]
mod tests;
