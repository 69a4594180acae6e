use crate::session::ViewState;

use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("Invalid Transition Error: cannot {action} while {view} {location}")]
    InvalidTransition {
        action: &'static str,
        view: ViewState,
        location: ErrorLocation,
    },
}
