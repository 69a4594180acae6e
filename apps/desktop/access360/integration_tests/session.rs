use access360::commands::session::{
    current_report, current_view, drain_notifications, return_to_search, submit_location,
};
use access360::error::Access360Error;
use access360::state::AppState;

use access_core::config::AppConfig;
use access_core::orchestrator::NotificationLevel;
use access_core::session::{ViewSnapshot, ViewState};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Integration tests for AppState + access-core against a mock backend
// ============================================================================

fn fast_config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.backend.base_url = server.uri();
    config.retry.base_delay_ms = 1;
    config.pacing.processing_delay_ms = 0;
    config.pacing.report_delay_ms = 0;
    config
}

async fn healthy_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [],
            "processed_images": ["https://img.example/front.jpg"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "percentage": 72.449,
            "observations": [{
                "observation_name": "Narrow aisle",
                "observation_sentiment": "egregious",
                "associated_disability": ["mobility"],
                "explanation": "Under 30 inches between tables",
                "feedback": "Widen the main aisle to 36 inches"
            }]
        })))
        .mount(&server)
        .await;
    server
}

/// **VALUE**: The command layer runs a full cycle through the actor and hands
/// back a report.
///
/// **WHY THIS MATTERS**: This is the closest we get to end to end without a UI:
/// validation, actor, orchestrator, HTTP, normalisation and report building.
///
/// **BUG THIS CATCHES**: Would catch the actor never replying on the oneshot
/// (the test would hang), or the report being built before the session has
/// published the results view.
#[tokio::test]
async fn given_healthy_backend_when_submitting_location_then_report_is_returned() {
    // GIVEN: App state against a healthy backend
    let server = healthy_backend().await;
    let state = AppState::from_config(&fast_config(&server)).expect("state");

    // WHEN: Submitting the search form
    let report = submit_location(&state, "  Panda Express ", "123 Main St, North Milpitas, CA")
        .await
        .expect("report");

    // THEN: Trimmed name, rounded score, derived sections
    assert_eq!(report.restaurant_name, "Panda Express");
    assert_eq!(report.percentage_text, "72.4%");
    assert_eq!(report.score_label, "Moderate accessibility");
    assert_eq!(
        report.improvements,
        vec!["Narrow aisle: Widen the main aisle to 36 inches"]
    );
    assert_eq!(current_view(&state).view_state(), ViewState::ShowingResults);

    // THEN: The success toast is queued
    let levels: Vec<_> = drain_notifications(&state)
        .into_iter()
        .map(|n| n.level)
        .collect();
    assert_eq!(levels, vec![NotificationLevel::Success]);
}

#[tokio::test]
async fn given_results_when_returning_to_search_then_view_resets() {
    let server = healthy_backend().await;
    let state = AppState::from_config(&fast_config(&server)).expect("state");
    submit_location(&state, "Panda Express", "123 Main St")
        .await
        .expect("report");
    let mut views = state.subscribe();

    return_to_search(&state).await.expect("command accepted");

    views
        .wait_for(|view| *view == ViewSnapshot::Searching)
        .await
        .expect("actor alive");
    assert!(matches!(
        current_report(&state),
        Err(Access360Error::NoResults { .. })
    ));
}

#[tokio::test]
async fn given_blank_address_when_submitting_then_invalid_location_without_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let state = AppState::from_config(&fast_config(&server)).expect("state");

    let result = submit_location(&state, "Panda Express", "   ").await;

    match result {
        Err(Access360Error::InvalidLocation { message, .. }) => {
            assert!(message.contains("Address cannot be empty"), "{message}");
        }
        other => panic!("Expected InvalidLocation, got {other:?}"),
    }
    assert_eq!(current_view(&state), ViewSnapshot::Searching);
}

/// **VALUE**: A cycle that fails leaves the app ready for the next search and
/// tells the user.
///
/// **BUG THIS CATCHES**: Would catch the actor swallowing the cycle error and
/// replying Ok, which would surface as a confusing "no results" error instead.
#[tokio::test]
async fn given_analysis_backend_down_when_submitting_then_core_error_and_search_view() {
    // GIVEN: Images fine, analysis always 500
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "processed_images": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ai"))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&server)
        .await;
    let state = AppState::from_config(&fast_config(&server)).expect("state");

    // WHEN: Submitting
    let result = submit_location(&state, "Panda Express", "123 Main St").await;

    // THEN: Core error, back on search, warning then error toasts
    assert!(
        matches!(result, Err(Access360Error::Core { .. })),
        "Expected Core error, got {result:?}"
    );
    assert_eq!(current_view(&state), ViewSnapshot::Searching);
    let levels: Vec<_> = drain_notifications(&state)
        .into_iter()
        .map(|n| n.level)
        .collect();
    assert_eq!(
        levels,
        vec![NotificationLevel::Warning, NotificationLevel::Error]
    );
}
