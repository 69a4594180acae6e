use serde::Serialize;

pub const NO_IMAGES_MESSAGE: &str =
    "No processed images found for this location. Proceeding with analysis.";
pub const ANALYSIS_COMPLETE_MESSAGE: &str = "Analysis completed successfully!";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze location. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Where the orchestrator sends user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
