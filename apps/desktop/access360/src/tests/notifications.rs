use crate::notifications::ToastNotifier;

use access_core::orchestrator::{
    ANALYSIS_COMPLETE_MESSAGE, NO_IMAGES_MESSAGE, Notification, Notifier,
};

#[test]
fn given_notifications_when_drained_then_returned_oldest_first_and_cleared() {
    // GIVEN: A warning then a success
    let notifier = ToastNotifier::new();
    notifier.notify(Notification::warning(NO_IMAGES_MESSAGE));
    notifier.notify(Notification::success(ANALYSIS_COMPLETE_MESSAGE));

    // WHEN: Draining
    let drained = notifier.drain();

    // THEN: In order, and nothing left behind
    assert_eq!(
        drained,
        vec![
            Notification::warning(NO_IMAGES_MESSAGE),
            Notification::success(ANALYSIS_COMPLETE_MESSAGE),
        ]
    );
    assert_eq!(notifier.pending_count(), 0);
    assert!(notifier.drain().is_empty());
}

/// **BUG THIS CATCHES**: Would catch the queue growing without bound when the
/// front end never drains it.
#[test]
fn given_undrained_queue_when_overfilled_then_oldest_are_dropped() {
    let notifier = ToastNotifier::new();

    for i in 0..40 {
        notifier.notify(Notification::error(format!("failure {i}")));
    }

    let drained = notifier.drain();
    assert_eq!(drained.len(), 32);
    assert_eq!(drained[0].message, "failure 8");
    assert_eq!(drained[31].message, "failure 39");
}
