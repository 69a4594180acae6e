use crate::error::Access360Error;
use crate::notifications::ToastNotifier;

use access_core::config::AppConfig;
use access_core::error::OrchestratorError;
use access_core::orchestrator::{Notification, Orchestrator};
use access_core::session::{Session, ViewSnapshot};

use common::ErrorLocation;
use models::Location;

use std::panic::Location as PanicLocation;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use uuid::Uuid;

const COMMAND_CHANNEL_CAPACITY: usize = 16;

pub type SubmitReply = oneshot::Sender<Result<(), OrchestratorError>>;

/// Commands that mutate the session.
///
/// All session mutations go through the state actor via these commands, so
/// cycles run one after another and `return_to_search` never races a cycle.
#[derive(Debug)]
pub enum StateCommand {
    /// Run a full analysis cycle; the outcome is sent back on `reply`
    Submit {
        location: Location,
        reply: SubmitReply,
    },

    /// Reset to the search view
    ReturnToSearch,
}

/// What the actor owns once it is running.
struct ActorParts {
    session: Session,
    orchestrator: Orchestrator,
}

/// Application state manager.
///
/// The session and orchestrator are moved into an actor task on first use.
/// Reads never touch the actor: the current view comes from the session's
/// watch channel and notifications from the shared toast queue.
#[derive(Clone)]
pub struct AppState {
    id: Uuid,

    /// Channel to the actor, created lazily from an async context
    command_tx: Arc<Mutex<Option<mpsc::Sender<StateCommand>>>>,

    /// Parked until the actor is spawned
    parts: Arc<Mutex<Option<ActorParts>>>,

    view: watch::Receiver<ViewSnapshot>,
    notifier: Arc<ToastNotifier>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, notifier: Arc<ToastNotifier>) -> Self {
        let session = Session::new();
        let view = session.subscribe();

        Self {
            id: Uuid::new_v4(),
            command_tx: Arc::new(Mutex::new(None)),
            parts: Arc::new(Mutex::new(Some(ActorParts {
                session,
                orchestrator,
            }))),
            view,
            notifier,
        }
    }

    /// Build the state, its orchestrator and toast queue from config.
    pub fn from_config(config: &AppConfig) -> Result<Self, Access360Error> {
        let notifier = Arc::new(ToastNotifier::new());
        let orchestrator =
            Orchestrator::from_config(config, notifier.clone()).map_err(|e| {
                Access360Error::Core {
                    message: e.to_string(),
                    location: ErrorLocation::from(PanicLocation::caller()),
                }
            })?;

        Ok(Self::new(orchestrator, notifier))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Send a state update command.
    ///
    /// Returns an error if the state actor has died (should never happen).
    pub async fn update(&self, cmd: StateCommand) -> Result<(), Access360Error> {
        let tx = self.ensure_actor().await?;

        tx.send(cmd).await.map_err(|e| Access360Error::App {
            message: format!("State actor died: {e}"),
            location: ErrorLocation::from(PanicLocation::caller()),
        })
    }

    /// Latest published view. Never blocks on a running cycle.
    pub fn current_view(&self) -> ViewSnapshot {
        self.view.borrow().clone()
    }

    /// Follow view transitions as the actor publishes them.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.view.clone()
    }

    /// Take the toasts queued since the last call.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.notifier.drain()
    }

    /// Spawn the actor on first use and hand out its sender.
    async fn ensure_actor(&self) -> Result<mpsc::Sender<StateCommand>, Access360Error> {
        let mut tx_guard = self.command_tx.lock().await;
        if let Some(tx) = tx_guard.as_ref() {
            return Ok(tx.clone());
        }

        let parts = self
            .parts
            .lock()
            .await
            .take()
            .ok_or_else(|| Access360Error::App {
                message: "State actor already consumed its session".to_string(),
                location: ErrorLocation::from(PanicLocation::caller()),
            })?;

        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        *tx_guard = Some(tx.clone());

        tokio::spawn(state_actor(self.id, rx, parts));
        info!("State actor {} spawned", self.id);

        Ok(tx)
    }
}

/// The state actor task.
///
/// Owns the session and processes commands sequentially. A submit holds the
/// actor for the whole cycle, so commands sent meanwhile wait their turn.
async fn state_actor(id: Uuid, mut command_rx: mpsc::Receiver<StateCommand>, mut parts: ActorParts) {
    info!("State actor {id} started");

    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            StateCommand::Submit { location, reply } => {
                debug!("State actor {id}: submit {}", location.name);

                let result = parts
                    .orchestrator
                    .submit(&mut parts.session, location)
                    .await;

                if let Err(ref e) = result {
                    warn!("State actor {id}: submit rejected or failed: {e}");
                }
                if reply.send(result).is_err() {
                    warn!("State actor {id}: submit caller went away before the cycle ended");
                }
            }
            StateCommand::ReturnToSearch => {
                debug!("State actor {id}: return to search");
                parts.session.return_to_search();
            }
        }
    }

    warn!("State actor {id} stopped - this should not happen during normal operation");
}
