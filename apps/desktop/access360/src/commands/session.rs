use crate::error::Access360Error;
use crate::state::{AppState, StateCommand};

use access_core::error::OrchestratorError;
use access_core::orchestrator::Notification;
use access_core::report::AccessibilityReport;
use access_core::session::{ViewSnapshot, ViewState};

use common::ErrorLocation;
use models::LocationBuilder;

use std::panic::Location;

use log::{debug, error, info};
use tokio::sync::oneshot;

/// Submit the search form and wait for the cycle to finish.
///
/// Validates the inputs, runs a full analysis cycle on the state actor and
/// builds the report from the results view.
///
/// # Returns
///
/// * `Ok(AccessibilityReport)` - The cycle succeeded and results are on screen
/// * `Err(Access360Error::InvalidLocation)` - Name or address missing
/// * `Err(Access360Error::Core)` - A cycle is already running or the analysis
///   could not be obtained; the session is back on the search view in the latter case
pub async fn submit_location(
    state: &AppState,
    name: &str,
    address: &str,
) -> Result<AccessibilityReport, Access360Error> {
    let location = LocationBuilder::default()
        .with_name(name)
        .with_address(address)
        .build()
        .map_err(|e| Access360Error::InvalidLocation {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!("Submitting {} ({})", location.name, location.address);

    let (reply, outcome) = oneshot::channel();
    state
        .update(StateCommand::Submit { location, reply })
        .await?;

    outcome
        .await
        .map_err(|e| Access360Error::App {
            message: format!("State actor dropped the submit reply: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?
        .map_err(|e| {
            error!("Analysis cycle failed: {e}");
            core_error(&e)
        })?;

    current_report(state)
}

/// Report for the results currently on screen.
pub fn current_report(state: &AppState) -> Result<AccessibilityReport, Access360Error> {
    let view = state.current_view();

    AccessibilityReport::from_snapshot(&view).ok_or_else(|| Access360Error::NoResults {
        message: format!("No results to report while {}", view.view_state()),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Leave the results view and clear the session.
pub async fn return_to_search(state: &AppState) -> Result<(), Access360Error> {
    if state.current_view().view_state() != ViewState::ShowingResults {
        debug!("Return to search requested outside the results view");
    }

    state.update(StateCommand::ReturnToSearch).await
}

pub fn current_view(state: &AppState) -> ViewSnapshot {
    state.current_view()
}

pub fn drain_notifications(state: &AppState) -> Vec<Notification> {
    state.drain_notifications()
}

#[track_caller]
fn core_error(error: &OrchestratorError) -> Access360Error {
    Access360Error::Core {
        message: error.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
