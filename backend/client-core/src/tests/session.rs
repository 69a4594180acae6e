// Unit tests for the session state machine, including the crate-private
// transitions the orchestrator drives.

use crate::error::SessionError;
use crate::session::{AnalysisStage, Session, ViewSnapshot, ViewState};

use models::{AnalysisResult, ImageBundle, Location};

fn panda_express() -> Location {
    Location {
        name: "Panda Express".to_string(),
        address: "123 Main St, North Milpitas, CA".to_string(),
    }
}

fn analysis(percentage: f64) -> AnalysisResult {
    AnalysisResult {
        percentage,
        observations: Vec::new(),
    }
}

fn bundle() -> ImageBundle {
    ImageBundle {
        images: vec!["raw.jpg".to_string()],
        processed_images: vec!["https://cdn.example/x".to_string()],
    }
}

fn session_showing_results() -> Session {
    let mut session = Session::new();
    session.begin(panda_express()).expect("search view accepts submit");
    session.set_images(bundle());
    session.set_stage(AnalysisStage::GeneratingReport);
    session.complete(analysis(87.4));
    session
}

#[test]
fn given_new_session_when_inspected_then_searching_with_nothing_selected() {
    let session = Session::new();

    assert_eq!(session.view_state(), ViewState::Searching);
    assert_eq!(session.stage(), AnalysisStage::FetchingImages);
    assert!(session.location().is_none());
    assert!(session.analysis().is_none());
    assert!(session.images().processed_images.is_empty());
    assert_eq!(session.snapshot(), ViewSnapshot::Searching);
}

#[test]
fn given_searching_session_when_begin_then_in_progress_at_stage_zero() {
    // GIVEN: A fresh session
    let mut session = Session::new();

    // WHEN: Submitting a location
    session.begin(panda_express()).expect("submit from search");

    // THEN: Progress view at the first stage with the location held
    assert_eq!(session.view_state(), ViewState::InProgress);
    assert_eq!(session.location(), Some(&panda_express()));
    match session.snapshot() {
        ViewSnapshot::InProgress {
            stage,
            label,
            progress_percent,
        } => {
            assert_eq!(stage, AnalysisStage::FetchingImages);
            assert_eq!(label, "Fetching restaurant images...");
            assert_eq!(progress_percent, 25.0);
        }
        other => panic!("Expected progress view, got {other:?}"),
    }
}

/// **VALUE**: Submitting is only possible from the search view, so at most one
/// cycle is ever in flight per session.
///
/// **BUG THIS CATCHES**: Would catch `begin` silently restarting a cycle and
/// discarding the location and stage of the one already running.
#[test]
fn given_in_progress_session_when_begin_again_then_invalid_transition_and_unchanged() {
    // GIVEN: A session mid-cycle
    let mut session = Session::new();
    session.begin(panda_express()).expect("first submit");
    session.set_stage(AnalysisStage::Analyzing);

    // WHEN: Submitting another location
    let other = Location {
        name: "Other".to_string(),
        address: "1 Elsewhere".to_string(),
    };
    let result = session.begin(other);

    // THEN: Rejected, and the running cycle is untouched
    match result {
        Err(SessionError::InvalidTransition { view, .. }) => {
            assert_eq!(view, ViewState::InProgress);
        }
        Ok(()) => panic!("Second submit should be rejected"),
    }
    assert_eq!(session.stage(), AnalysisStage::Analyzing);
    assert_eq!(session.location(), Some(&panda_express()));
}

#[test]
fn given_each_stage_when_reported_then_labels_and_progress_follow_the_formula() {
    let expected = [
        ("Fetching restaurant images...", 25.0),
        ("Processing accessibility features...", 50.0),
        ("Analyzing wheelchair accessibility...", 75.0),
        ("Generating detailed report...", 100.0),
    ];

    for (stage, (label, progress)) in AnalysisStage::ALL.iter().zip(expected) {
        assert_eq!(stage.label(), label);
        assert_eq!(stage.progress_percent(), progress);
        assert_eq!(
            stage.progress_percent(),
            (stage.index() + 1) as f64 / 4.0 * 100.0
        );
    }
}

#[test]
fn given_completed_cycle_when_inspected_then_results_snapshot_carries_everything() {
    let session = session_showing_results();

    assert_eq!(session.view_state(), ViewState::ShowingResults);
    match session.snapshot() {
        ViewSnapshot::ShowingResults {
            location,
            analysis,
            images,
        } => {
            assert_eq!(location, panda_express());
            assert_eq!(analysis.percentage, 87.4);
            assert_eq!(images, bundle());
        }
        other => panic!("Expected results view, got {other:?}"),
    }
}

/// **VALUE**: Return-to-search restores the initial state regardless of where
/// it is called from.
///
/// **BUG THIS CATCHES**: Would catch one of the four pieces of state (location,
/// analysis, imagery, stage) surviving the reset and leaking into the next
/// cycle, e.g. the previous restaurant's gallery appearing under a new result.
#[test]
fn given_any_session_state_when_return_to_search_then_everything_is_reset() {
    let mut mid_cycle = Session::new();
    mid_cycle.begin(panda_express()).expect("submit");
    mid_cycle.set_images(bundle());
    mid_cycle.set_stage(AnalysisStage::Analyzing);

    for mut session in [Session::new(), mid_cycle, session_showing_results()] {
        // WHEN: Returning to search
        session.return_to_search();

        // THEN: Initial values everywhere
        assert_eq!(session.view_state(), ViewState::Searching);
        assert_eq!(session.stage(), AnalysisStage::FetchingImages);
        assert!(session.location().is_none());
        assert!(session.analysis().is_none());
        assert_eq!(session.images(), &ImageBundle::empty());
        assert_eq!(session.snapshot(), ViewSnapshot::Searching);
    }
}

#[test]
fn given_failed_cycle_when_fail_then_partial_data_is_discarded() {
    let mut session = Session::new();
    session.begin(panda_express()).expect("submit");
    session.set_images(bundle());
    session.set_stage(AnalysisStage::Analyzing);

    session.fail();

    assert_eq!(session.view_state(), ViewState::Searching);
    assert!(session.location().is_none());
    assert!(session.images().processed_images.is_empty());
    assert!(session.begin(panda_express()).is_ok(), "search accepts a new submit");
}

/// **VALUE**: Observers see every published transition in order.
///
/// **BUG THIS CATCHES**: Would catch `watch::Sender::send` being used instead of
/// `send_replace`, which drops updates whenever nobody is subscribed yet.
#[tokio::test]
async fn given_subscriber_when_session_transitions_then_latest_snapshot_is_published() {
    // GIVEN: A subscriber on a fresh session
    let mut session = Session::new();
    let mut receiver = session.subscribe();
    assert_eq!(*receiver.borrow(), ViewSnapshot::Searching);

    // WHEN: Submitting
    session.begin(panda_express()).expect("submit");

    // THEN: The subscriber is told about the progress view
    receiver.changed().await.expect("publisher alive");
    assert_eq!(
        receiver.borrow_and_update().view_state(),
        ViewState::InProgress
    );

    // WHEN: The cycle finishes
    session.set_stage(AnalysisStage::GeneratingReport);
    session.complete(analysis(61.0));

    // THEN: The latest value is the results view
    receiver.changed().await.expect("publisher alive");
    assert_eq!(
        receiver.borrow_and_update().view_state(),
        ViewState::ShowingResults
    );
}
