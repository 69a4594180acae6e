//! One full analysis cycle: images, pacing, analysis, results.
//!
//! ```text
//! Idle -> FetchingImages -> Waiting -> FetchingAnalysis -> Done
//!                                            \-> Failed (back to search)
//! ```
//!
//! The image fetch never aborts a cycle. Any analysis failure does, and the
//! cycle has to be restarted with a fresh submit.

mod notification;

pub use notification::{
    ANALYSIS_COMPLETE_MESSAGE, ANALYSIS_FAILED_MESSAGE, NO_IMAGES_MESSAGE, Notification,
    NotificationLevel, Notifier,
};

use crate::analysis_client::AnalysisClient;
use crate::config::AppConfig;
use crate::error::{AnalysisClientError, OrchestratorError};
use crate::session::{AnalysisStage, Session};
use crate::{DEFAULT_PROCESSING_DELAY, DEFAULT_REPORT_DELAY};

use common::ErrorLocation;
use models::{ImageBundle, Location};

use std::fmt;
use std::panic::Location as PanicLocation;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::time::sleep as TokioSleep;
use uuid::Uuid;

/// Cosmetic waits that stage the progress display. Zero skips the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After the image fetch, before the analysis request.
    pub processing_delay: Duration,
    /// After the analysis arrives, before the results view.
    pub report_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            processing_delay: DEFAULT_PROCESSING_DELAY,
            report_delay: DEFAULT_REPORT_DELAY,
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            processing_delay: Duration::ZERO,
            report_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    FetchingImages,
    Waiting,
    FetchingAnalysis,
    Done,
    Failed,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CyclePhase::Idle => "idle",
            CyclePhase::FetchingImages => "fetching images",
            CyclePhase::Waiting => "waiting",
            CyclePhase::FetchingAnalysis => "fetching analysis",
            CyclePhase::Done => "done",
            CyclePhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Log correlation for a single cycle.
struct Cycle {
    id: Uuid,
    phase: CyclePhase,
}

impl Cycle {
    fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: CyclePhase::Idle,
        }
    }

    fn advance(&mut self, next: CyclePhase) {
        debug!("Cycle {}: {} -> {}", self.id, self.phase, next);
        self.phase = next;
    }
}

pub struct Orchestrator {
    client: AnalysisClient,
    pacing: Pacing,
    notifier: Arc<dyn Notifier>,
}

impl Orchestrator {
    pub fn new(client: AnalysisClient, pacing: Pacing, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            pacing,
            notifier,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AnalysisClientError> {
        let client = AnalysisClient::from_config(config)?;
        Ok(Self::new(client, config.pacing(), notifier))
    }

    /// Run a full cycle for `location` on `session`.
    ///
    /// On success the session shows the results. On failure the session is
    /// reset to the search view and an error notification has been sent.
    ///
    /// # Errors
    ///
    /// * [`OrchestratorError::Session`] - the session was not on the search
    ///   view; nothing was changed
    /// * [`OrchestratorError::CycleFailed`] - the analysis could not be obtained
    pub async fn submit(
        &self,
        session: &mut Session,
        location: Location,
    ) -> Result<(), OrchestratorError> {
        session.begin(location.clone())?;

        let mut cycle = Cycle::start();
        info!(
            "Cycle {} started for {} ({})",
            cycle.id, location.name, location.address
        );

        match self.run_cycle(session, &location, &mut cycle).await {
            Ok(()) => {
                info!("Cycle {} completed for {}", cycle.id, location.name);
                self.notifier
                    .notify(Notification::success(ANALYSIS_COMPLETE_MESSAGE));
                Ok(())
            }
            Err(source) => {
                cycle.advance(CyclePhase::Failed);
                error!("Cycle {} failed for {}: {source}", cycle.id, location.name);

                session.fail();
                self.notifier
                    .notify(Notification::error(ANALYSIS_FAILED_MESSAGE));

                Err(OrchestratorError::CycleFailed {
                    message: format!("Failed to analyze '{}'", location.name),
                    location: ErrorLocation::from(PanicLocation::caller()),
                    source,
                })
            }
        }
    }

    async fn run_cycle(
        &self,
        session: &mut Session,
        location: &Location,
        cycle: &mut Cycle,
    ) -> Result<(), AnalysisClientError> {
        cycle.advance(CyclePhase::FetchingImages);
        let images = self.fetch_images(&location.address).await;
        if images.is_empty() {
            self.notifier.notify(Notification::warning(NO_IMAGES_MESSAGE));
        }
        session.set_images(images);

        cycle.advance(CyclePhase::Waiting);
        session.set_stage(AnalysisStage::Processing);
        pace(self.pacing.processing_delay).await;

        cycle.advance(CyclePhase::FetchingAnalysis);
        session.set_stage(AnalysisStage::Analyzing);
        let analysis = self
            .client
            .fetch_analysis(&location.address, &location.name)
            .await?;

        session.set_stage(AnalysisStage::GeneratingReport);
        pace(self.pacing.report_delay).await;

        session.complete(analysis);
        cycle.advance(CyclePhase::Done);
        Ok(())
    }

    /// Imagery is optional: every failure here degrades to an empty bundle.
    async fn fetch_images(&self, address: &str) -> ImageBundle {
        match self.client.fetch_images(address).await {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!("Continuing without imagery: {e}");
                ImageBundle::empty()
            }
        }
    }
}

async fn pace(delay: Duration) {
    if !delay.is_zero() {
        TokioSleep(delay).await;
    }
}
