//! Shared fixtures for the backend-facing integration tests.
//!
//! Every test runs against its own `wiremock` server with a 1 ms base delay, so
//! a fully exhausted retry sequence costs ~15 ms of real time.

use access_core::analysis_client::AnalysisClient;
use access_core::orchestrator::{Notification, NotificationLevel, Notifier, Orchestrator, Pacing};
use access_core::retry::RetryPolicy;

use models::Location;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::MockServer;

pub const PANDA_NAME: &str = "Panda Express";
pub const PANDA_ADDRESS: &str = "123 Main St, North Milpitas, CA";

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(5, Duration::from_millis(1))
}

pub fn client_for(server: &MockServer) -> AnalysisClient {
    AnalysisClient::new(&server.uri(), fast_retry()).expect("Failed to build client")
}

pub fn panda_express() -> Location {
    Location {
        name: PANDA_NAME.to_string(),
        address: PANDA_ADDRESS.to_string(),
    }
}

pub fn orchestrator_for(server: &MockServer) -> (Orchestrator, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let orchestrator = Orchestrator::new(client_for(server), Pacing::none(), notifier.clone());
    (orchestrator, notifier)
}

pub fn images_payload() -> Value {
    json!({
        "images": ["raw/front.jpg"],
        "processed_images": ["https://img.example/front.jpg", "https://img.example/side.jpg"]
    })
}

pub fn analysis_payload(percentage: f64) -> Value {
    json!({
        "percentage": percentage,
        "observations": [
            {
                "observation_name": "Entrance step",
                "observation_sentiment": "NEGATIVE",
                "associated_disability": ["mobility"],
                "explanation": "A 4 inch step at the main door",
                "feedback": "Install a ramp"
            },
            {
                "observation_name": "Automatic door",
                "observation_sentiment": "POSITIVE",
                "associated_disability": ["mobility", "visual"],
                "explanation": "Door opens on approach",
                "feedback": ""
            }
        ]
    })
}

/// Collects notifications so tests can assert on what the user would see.
#[derive(Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().expect("notifier lock poisoned").clone()
    }

    pub fn levels(&self) -> Vec<NotificationLevel> {
        self.received().into_iter().map(|n| n.level).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .expect("notifier lock poisoned")
            .push(notification);
    }
}
