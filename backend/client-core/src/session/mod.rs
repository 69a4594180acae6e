//! Presentation state for one user session.
//!
//! The session owns everything a view needs (selected location, imagery,
//! analysis, progress stage) and publishes a [`ViewSnapshot`] on every
//! transition. `begin` and `return_to_search` are the user-facing transitions;
//! the in-cycle transitions are crate-private and driven by the orchestrator,
//! which holds `&mut Session` for the whole cycle. That exclusive borrow is what
//! keeps a second cycle from starting while one is in flight.

mod stage;

pub use stage::AnalysisStage;

use crate::error::SessionError;

use common::ErrorLocation;
use models::{AnalysisResult, ImageBundle, Location};

use std::fmt;
use std::panic::Location as PanicLocation;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::watch;

/// Which of the three top-level views is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Searching,
    InProgress,
    ShowingResults,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewState::Searching => "searching",
            ViewState::InProgress => "in progress",
            ViewState::ShowingResults => "showing results",
        };
        f.write_str(name)
    }
}

/// Raw view selector. `ViewState` is derived from it together with the data
/// the results view needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Step {
    #[default]
    Search,
    Progress,
    Results,
}

/// Everything a renderer needs for the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewSnapshot {
    Searching,
    InProgress {
        stage: AnalysisStage,
        label: &'static str,
        progress_percent: f64,
    },
    ShowingResults {
        location: Location,
        analysis: AnalysisResult,
        images: ImageBundle,
    },
}

impl ViewSnapshot {
    pub fn view_state(&self) -> ViewState {
        match self {
            ViewSnapshot::Searching => ViewState::Searching,
            ViewSnapshot::InProgress { .. } => ViewState::InProgress,
            ViewSnapshot::ShowingResults { .. } => ViewState::ShowingResults,
        }
    }

    fn in_progress(stage: AnalysisStage) -> Self {
        ViewSnapshot::InProgress {
            stage,
            label: stage.label(),
            progress_percent: stage.progress_percent(),
        }
    }
}

pub struct Session {
    step: Step,
    stage: AnalysisStage,
    location: Option<Location>,
    analysis: Option<AnalysisResult>,
    images: ImageBundle,
    publisher: watch::Sender<ViewSnapshot>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(ViewSnapshot::Searching);

        Self {
            step: Step::default(),
            stage: AnalysisStage::default(),
            location: None,
            analysis: None,
            images: ImageBundle::empty(),
            publisher,
        }
    }

    /// Receive a snapshot after every transition. The current one is marked seen.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.publisher.subscribe()
    }

    /// The view to render. Results fall back to search unless both the
    /// location and the analysis are present.
    pub fn view_state(&self) -> ViewState {
        match self.step {
            Step::Search => ViewState::Searching,
            Step::Progress => ViewState::InProgress,
            Step::Results if self.location.is_some() && self.analysis.is_some() => {
                ViewState::ShowingResults
            }
            Step::Results => ViewState::Searching,
        }
    }

    pub fn stage(&self) -> AnalysisStage {
        self.stage
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn images(&self) -> &ImageBundle {
        &self.images
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        match (self.view_state(), &self.location, &self.analysis) {
            (ViewState::ShowingResults, Some(location), Some(analysis)) => {
                ViewSnapshot::ShowingResults {
                    location: location.clone(),
                    analysis: analysis.clone(),
                    images: self.images.clone(),
                }
            }
            (ViewState::InProgress, _, _) => ViewSnapshot::in_progress(self.stage),
            _ => ViewSnapshot::Searching,
        }
    }

    /// Start a cycle for `location`. Only valid from the search view.
    #[track_caller]
    pub fn begin(&mut self, location: Location) -> Result<(), SessionError> {
        let view = self.view_state();
        if view != ViewState::Searching {
            return Err(SessionError::InvalidTransition {
                action: "submit a location",
                view,
                location: ErrorLocation::from(PanicLocation::caller()),
            });
        }

        info!("Starting analysis for {} ({})", location.name, location.address);

        self.location = Some(location);
        self.analysis = None;
        self.images = ImageBundle::empty();
        self.stage = AnalysisStage::FetchingImages;
        self.step = Step::Progress;
        self.publish();
        Ok(())
    }

    /// Clear the selection and go back to the search view.
    ///
    /// The UI only offers this from the results view, but the reset itself is
    /// unconditional.
    pub fn return_to_search(&mut self) {
        let view = self.view_state();
        if view != ViewState::ShowingResults {
            warn!("Return to search requested while {view}");
        }
        self.reset();
    }

    pub(crate) fn set_stage(&mut self, stage: AnalysisStage) {
        self.stage = stage;
        self.publish();
    }

    /// Replace the bundle wholesale, even with an empty one.
    pub(crate) fn set_images(&mut self, images: ImageBundle) {
        self.images = images;
    }

    pub(crate) fn complete(&mut self, analysis: AnalysisResult) {
        self.analysis = Some(analysis);
        self.step = Step::Results;
        self.publish();
    }

    /// Discard everything from the failed cycle.
    pub(crate) fn fail(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.step = Step::Search;
        self.stage = AnalysisStage::FetchingImages;
        self.location = None;
        self.analysis = None;
        self.images = ImageBundle::empty();
        self.publish();
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        debug!("Session view: {} ({:?})", snapshot.view_state(), self.step);
        self.publisher.send_replace(snapshot);
    }
}
