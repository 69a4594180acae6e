use crate::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Every error in the workspace renders its origin as `[file:line:column]`.
///
/// **BUG THIS CATCHES**: Would catch a change to the Display format that drops the
/// brackets or one of the three coordinates, which would make log lines from the
/// retry loop impossible to trace back to a call site.
#[test]
fn given_error_location_when_displayed_then_renders_file_line_and_column() {
    // GIVEN: A location captured in this file
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Rendering it
    let rendered = location.to_string();

    // THEN: It is bracketed and carries all three coordinates
    assert!(rendered.starts_with('[') && rendered.ends_with(']'));
    assert!(rendered.contains("error_location.rs"));
    assert!(rendered.contains(&format!(":{}:", location.line)));
    assert_eq!(rendered.matches(':').count(), 2);
}

/// **VALUE**: `ErrorLocation::here()` must report the caller, not its own body.
///
/// **BUG THIS CATCHES**: Would catch removal of `#[track_caller]` from `here()`,
/// after which every error would point into `error_location.rs` in the common crate.
#[test]
fn given_two_call_sites_when_using_here_then_each_reports_its_own_line() {
    // GIVEN/WHEN: Capturing from two consecutive lines
    let first = ErrorLocation::here();
    let second = ErrorLocation::here();

    // THEN: Same file, consecutive lines
    assert_eq!(first.file, second.file);
    assert_eq!(first.line + 1, second.line);
    assert!(first.file.contains("tests"));
}
