use crate::{LocationBuilder, ModelError};

/// **VALUE**: A location without an address can never enter an analysis cycle.
///
/// **WHY THIS MATTERS**: The address is the only key the images and analysis
/// backends understand. An empty one would burn five retries against a backend
/// that can never answer.
///
/// **BUG THIS CATCHES**: Would catch the empty check being dropped, or trimming
/// happening after the check so that `"   "` slips through.
#[test]
fn given_blank_address_when_building_location_then_returns_validation_error() {
    // GIVEN: A builder with a whitespace-only address
    let builder = LocationBuilder::default()
        .with_name("Panda Express")
        .with_address("   ");

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation fails and names the field
    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert!(message.contains("Address"), "unexpected message: {message}");
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn given_missing_name_when_building_location_then_returns_validation_error() {
    // GIVEN: A builder that never received a name
    let builder = LocationBuilder::default().with_address("123 Main St");

    // WHEN/THEN: Building fails
    let err = builder.build().unwrap_err();
    assert!(err.to_string().contains("Restaurant name is required"));
}

#[test]
fn given_padded_fields_when_building_location_then_values_are_trimmed() {
    // GIVEN: Values as typed into a search box
    let location = LocationBuilder::default()
        .with_name("  Panda Express ")
        .with_address(" 123 Main St, North Milpitas, CA\n")
        .build()
        .expect("valid location");

    // THEN: Surrounding whitespace is gone
    assert_eq!(location.name, "Panda Express");
    assert_eq!(location.address, "123 Main St, North Milpitas, CA");
}
