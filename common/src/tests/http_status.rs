use crate::HttpStatusCode;

#[test]
fn given_status_codes_when_categorised_then_ranges_are_disjoint() {
    // GIVEN: One code from each interesting range
    let ok = HttpStatusCode::from(204);
    let not_found = HttpStatusCode::from(404);
    let unavailable = HttpStatusCode::from(503);

    // THEN: Each falls into exactly one category
    assert!(ok.is_success() && !ok.is_client_error() && !ok.is_server_error());
    assert!(not_found.is_client_error() && !not_found.is_success());
    assert!(unavailable.is_server_error() && !unavailable.is_client_error());
    assert_eq!(unavailable.to_string(), "503");
}
