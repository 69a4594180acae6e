use access_core::error::{AnalysisClientError, CoreError, NormalizeError, SessionError};
use access_core::session::ViewState;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Errors name where they were raised.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being dropped from the
/// constructor helpers, which makes every error point into the error module.
#[test]
fn given_server_error_when_formatted_then_includes_status_body_and_location() {
    // GIVEN: A server error built through the helper
    let err = AnalysisClientError::server(502, "bad gateway");

    // WHEN: Formatting
    let text = err.to_string();

    // THEN: Status, body and this file
    assert!(text.contains("Server Error"));
    assert!(text.contains("502"));
    assert!(text.contains("bad gateway"));
    assert!(text.contains("error.rs"), "location missing from: {text}");
}

#[test]
fn given_normalize_error_when_converted_then_location_is_preserved() {
    let normalize = NormalizeError::malformed("missing percentage");
    let NormalizeError::MalformedResponse { location, .. } = &normalize;
    let expected_line = location.line;

    let client: AnalysisClientError = normalize.into();

    match client {
        AnalysisClientError::MalformedResponse { message, location } => {
            assert_eq!(message, "missing percentage");
            assert_eq!(location.line, expected_line);
            assert!(location.file.ends_with("error.rs"));
        }
        other => panic!("Expected MalformedResponse, got {other:?}"),
    }
}

#[test]
fn given_session_error_when_wrapped_in_core_error_then_display_is_transparent() {
    let err = SessionError::InvalidTransition {
        action: "submit a location",
        view: ViewState::ShowingResults,
        location: ErrorLocation::from(Location::caller()),
    };
    let expected = err.to_string();

    let core: CoreError = err.into();

    assert_eq!(core.to_string(), expected);
    assert!(expected.contains("showing results"));
}
