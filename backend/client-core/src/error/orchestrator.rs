use crate::error::analysis_client::AnalysisClientError;
use crate::error::session::SessionError;

use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum OrchestratorError {
    /// The session was not in a state that accepts a new cycle. Nothing changed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The cycle ran and failed; the session is back on the search view.
    #[error("Cycle Failed Error: {message} {location}")]
    CycleFailed {
        message: String,
        location: ErrorLocation,
        #[source]
        source: AnalysisClientError,
    },
}
