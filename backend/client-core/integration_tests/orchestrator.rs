use crate::helpers::{
    PANDA_NAME, analysis_payload, images_payload, orchestrator_for, panda_express,
};

use access_core::error::{AnalysisClientError, OrchestratorError, SessionError};
use access_core::orchestrator::{
    ANALYSIS_COMPLETE_MESSAGE, ANALYSIS_FAILED_MESSAGE, NO_IMAGES_MESSAGE, Notification,
    NotificationLevel,
};
use access_core::report::AccessibilityReport;
use access_core::session::{AnalysisStage, Session, ViewSnapshot, ViewState};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_images(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_analysis(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/ai"))
        .respond_with(template)
        .mount(server)
        .await;
}

/// **VALUE**: The happy path end to end: search, progress, results.
///
/// **WHY THIS MATTERS**: This is the only flow most users ever see. It covers
/// the request bodies, normalisation, stage updates and the final snapshot in
/// one pass.
///
/// **BUG THIS CATCHES**: Would catch results being shown without the location,
/// the unrounded percentage leaking into the view, or a missing success toast.
#[tokio::test]
async fn given_healthy_backends_when_submitting_then_results_are_shown() {
    // GIVEN: Both backends healthy
    let server = MockServer::start().await;
    mount_images(
        &server,
        ResponseTemplate::new(200).set_body_json(images_payload()),
    )
    .await;
    mount_analysis(
        &server,
        ResponseTemplate::new(200).set_body_json(analysis_payload(87.36)),
    )
    .await;
    let (orchestrator, notifier) = orchestrator_for(&server);
    let mut session = Session::new();

    // WHEN: Submitting a location
    orchestrator
        .submit(&mut session, panda_express())
        .await
        .expect("cycle succeeds");

    // THEN: Results view with the normalised analysis
    assert_eq!(session.view_state(), ViewState::ShowingResults);
    assert_eq!(session.stage(), AnalysisStage::GeneratingReport);
    assert_eq!(session.location(), Some(&panda_express()));
    assert_eq!(session.images().processed_images.len(), 2);

    let report = AccessibilityReport::from_snapshot(&session.snapshot()).expect("results view");
    assert_eq!(report.restaurant_name, PANDA_NAME);
    assert_eq!(report.percentage, 87.4);
    assert_eq!(report.percentage_text, "87.4%");
    assert_eq!(report.improvements, vec!["Entrance step: Install a ramp"]);
    assert_eq!(report.gallery.len(), 2);

    // THEN: A single success notification
    assert_eq!(
        notifier.received(),
        vec![Notification::success(ANALYSIS_COMPLETE_MESSAGE)]
    );
}

/// **VALUE**: Missing imagery degrades the results instead of failing them.
///
/// **BUG THIS CATCHES**: Would catch an images failure aborting the cycle, or the
/// "no images" warning being skipped when the bundle comes back empty.
#[tokio::test]
async fn given_images_backend_down_when_submitting_then_results_with_empty_gallery() {
    // GIVEN: Images always 500, analysis healthy
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&server)
        .await;
    mount_analysis(
        &server,
        ResponseTemplate::new(200).set_body_json(analysis_payload(61.0)),
    )
    .await;
    let (orchestrator, notifier) = orchestrator_for(&server);
    let mut session = Session::new();

    // WHEN: Submitting
    orchestrator
        .submit(&mut session, panda_express())
        .await
        .expect("cycle succeeds without imagery");

    // THEN: Results, no gallery, warning then success
    assert_eq!(session.view_state(), ViewState::ShowingResults);
    assert!(session.images().is_empty());
    assert_eq!(
        notifier.received(),
        vec![
            Notification::warning(NO_IMAGES_MESSAGE),
            Notification::success(ANALYSIS_COMPLETE_MESSAGE),
        ]
    );
}

#[tokio::test]
async fn given_only_blank_processed_images_when_submitting_then_no_images_warning() {
    let server = MockServer::start().await;
    mount_images(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "processed_images": ["", "  "] })),
    )
    .await;
    mount_analysis(
        &server,
        ResponseTemplate::new(200).set_body_json(analysis_payload(50.0)),
    )
    .await;
    let (orchestrator, notifier) = orchestrator_for(&server);
    let mut session = Session::new();

    orchestrator
        .submit(&mut session, panda_express())
        .await
        .expect("cycle succeeds");

    assert_eq!(
        notifier.levels(),
        vec![NotificationLevel::Warning, NotificationLevel::Success]
    );
}

/// **VALUE**: An analysis that never arrives sends the user back to search with
/// an error toast and no leftover state.
///
/// **BUG THIS CATCHES**: Would catch the session being left stuck on the
/// progress view, or imagery from the failed cycle surviving into the next one.
#[tokio::test]
async fn given_analysis_always_malformed_when_submitting_then_back_to_search_with_error() {
    // GIVEN: Healthy images, analysis always returns observations as an object
    let server = MockServer::start().await;
    mount_images(
        &server,
        ResponseTemplate::new(200).set_body_json(images_payload()),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/ai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "percentage": 70,
            "observations": {}
        })))
        .expect(5)
        .mount(&server)
        .await;
    let (orchestrator, notifier) = orchestrator_for(&server);
    let mut session = Session::new();
    let mut views = session.subscribe();

    // WHEN: Submitting
    let result = orchestrator.submit(&mut session, panda_express()).await;

    // THEN: Cycle failure carrying the last attempt's error
    match result {
        Err(OrchestratorError::CycleFailed { source, .. }) => {
            assert!(matches!(
                source,
                AnalysisClientError::MalformedResponse { .. }
            ));
        }
        other => panic!("Expected CycleFailed, got {other:?}"),
    }

    // THEN: Fully reset to search
    assert_eq!(session.view_state(), ViewState::Searching);
    assert!(session.location().is_none());
    assert!(session.analysis().is_none());
    assert!(session.images().processed_images.is_empty());
    assert_eq!(*views.borrow_and_update(), ViewSnapshot::Searching);

    // THEN: Error notification only
    assert_eq!(
        notifier.received(),
        vec![Notification::error(ANALYSIS_FAILED_MESSAGE)]
    );
}

#[tokio::test]
async fn given_session_in_progress_when_submitting_then_rejected_without_requests() {
    // GIVEN: A session whose cycle has already begun
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let (orchestrator, notifier) = orchestrator_for(&server);
    let mut session = Session::new();
    session.begin(panda_express()).expect("first submit");

    // WHEN: Submitting again
    let result = orchestrator.submit(&mut session, panda_express()).await;

    // THEN: Rejected by the session, nothing sent, nobody notified
    assert!(matches!(
        result,
        Err(OrchestratorError::Session(SessionError::InvalidTransition {
            view: ViewState::InProgress,
            ..
        }))
    ));
    assert_eq!(session.view_state(), ViewState::InProgress);
    assert!(notifier.received().is_empty());
}

#[tokio::test]
async fn given_results_when_returning_to_search_then_next_cycle_can_start() {
    let server = MockServer::start().await;
    mount_images(
        &server,
        ResponseTemplate::new(200).set_body_json(images_payload()),
    )
    .await;
    mount_analysis(
        &server,
        ResponseTemplate::new(200).set_body_json(analysis_payload(99.0)),
    )
    .await;
    let (orchestrator, _notifier) = orchestrator_for(&server);
    let mut session = Session::new();

    orchestrator
        .submit(&mut session, panda_express())
        .await
        .expect("first cycle");
    session.return_to_search();

    assert_eq!(session.snapshot(), ViewSnapshot::Searching);
    assert_eq!(session.stage(), AnalysisStage::FetchingImages);
    orchestrator
        .submit(&mut session, panda_express())
        .await
        .expect("second cycle");
    assert_eq!(session.view_state(), ViewState::ShowingResults);
}
