//! Toast queue fed by the orchestrator.

use access_core::orchestrator::{Notification, NotificationLevel, Notifier};

use std::collections::VecDeque;
use std::sync::Mutex;

use log::{error, info, warn};

/// Upper bound on undrained toasts; the oldest are dropped first.
const MAX_PENDING_NOTIFICATIONS: usize = 32;

/// Logs every notification and keeps it until the front end drains the queue.
#[derive(Debug, Default)]
pub struct ToastNotifier {
    pending: Mutex<VecDeque<Notification>>,
}

impl ToastNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }

    pub fn pending_count(&self) -> usize {
        match self.pending.lock() {
            Ok(pending) => pending.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!("Toast: {}", notification.message),
            NotificationLevel::Warning => warn!("Toast: {}", notification.message),
            NotificationLevel::Error => error!("Toast: {}", notification.message),
        }

        let mut pending = match self.pending.lock() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        };
        if pending.len() == MAX_PENDING_NOTIFICATIONS {
            pending.pop_front();
        }
        pending.push_back(notification);
    }
}
