use crate::helpers::{
    PANDA_ADDRESS, PANDA_NAME, analysis_payload, client_for, images_payload,
};

use access_core::IMAGE_CDN_FETCH_BASE;
use access_core::error::AnalysisClientError;
use access_core::normalizer::encode_image_url;

use models::{ImageBundle, Sentiment};

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ----------------------------------------------------------------------------
// fetch_images()
// ----------------------------------------------------------------------------

/// **VALUE**: A blank address is rejected before anything goes over the wire.
///
/// **BUG THIS CATCHES**: Would catch the address check moving inside the retry
/// loop, which would burn five requests and ~15 s of backoff on input that can
/// never succeed.
#[tokio::test]
async fn given_blank_address_when_fetching_images_then_invalid_input_without_requests() {
    // GIVEN: A backend that must not be called
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(images_payload()))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Fetching with empty and whitespace-only addresses
    for address in ["", "   "] {
        let result = client.fetch_images(address).await;

        // THEN: Invalid input, categorised as such
        match result {
            Err(error @ AnalysisClientError::InvalidInput { .. }) => {
                assert_eq!(error.error_category(), "invalid_input");
                assert!(!error.is_transient());
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn given_healthy_backend_when_fetching_images_then_posts_address_and_rewrites_urls() {
    // GIVEN: A backend returning one absolute and one relative processed image
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({ "address": PANDA_ADDRESS })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": ["raw/front.jpg"],
            "processed_images": ["https://img.example/a.jpg", "processed/b.jpg"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Fetching images
    let bundle = client_for(&server)
        .fetch_images(PANDA_ADDRESS)
        .await
        .expect("images");

    // THEN: Raw images pass through, processed ones go through the CDN
    assert_eq!(bundle.images, vec!["raw/front.jpg"]);
    assert_eq!(
        bundle.processed_images[0],
        format!("{IMAGE_CDN_FETCH_BASE}https%3A%2F%2Fimg.example%2Fa.jpg")
    );
    let relative = format!("{}/processed/b.jpg", server.uri());
    assert_eq!(
        bundle.processed_images[1],
        format!("{IMAGE_CDN_FETCH_BASE}{}", encode_image_url(&relative))
    );
}

/// **VALUE**: Imagery is optional; a dead images service yields an empty bundle
/// after exactly five attempts.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one in the attempt count or the
/// images fetch surfacing an error that aborts the whole cycle.
#[tokio::test]
async fn given_images_backend_always_failing_when_fetching_then_empty_bundle_after_five_attempts() {
    // GIVEN: Every request fails with 500
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(5)
        .mount(&server)
        .await;

    // WHEN: Fetching images
    let bundle = client_for(&server)
        .fetch_images(PANDA_ADDRESS)
        .await
        .expect("failures are absorbed");

    // THEN: The empty bundle
    assert_eq!(bundle, ImageBundle::empty());
}

#[tokio::test]
async fn given_payload_without_processed_images_when_fetching_then_retried_until_valid() {
    // GIVEN: Two malformed responses, then a good one
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "images": [] })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(images_payload()))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Fetching images
    let bundle = client_for(&server)
        .fetch_images(PANDA_ADDRESS)
        .await
        .expect("images");

    // THEN: The third attempt's bundle
    assert_eq!(bundle.processed_images.len(), 2);
    assert!(!bundle.is_empty());
}

// ----------------------------------------------------------------------------
// fetch_analysis()
// ----------------------------------------------------------------------------

/// **VALUE**: The analysis posts both address and name and comes back
/// normalised.
///
/// **BUG THIS CATCHES**: Would catch the request body dropping `name`, or the
/// percentage reaching the caller unrounded.
#[tokio::test]
async fn given_healthy_backend_when_fetching_analysis_then_normalised_result() {
    // GIVEN: A backend that answers the exact request body
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai"))
        .and(body_json(json!({ "address": PANDA_ADDRESS, "name": PANDA_NAME })))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_payload(87.36)))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Fetching the analysis
    let analysis = client_for(&server)
        .fetch_analysis(PANDA_ADDRESS, PANDA_NAME)
        .await
        .expect("analysis");

    // THEN: Rounded percentage and typed observations
    assert_eq!(analysis.percentage, 87.4);
    assert_eq!(analysis.observations.len(), 2);
    assert_eq!(
        analysis.observations[0].observation_sentiment,
        Sentiment::Negative
    );
    assert!(
        analysis.observations[1]
            .associated_disability
            .contains("visual")
    );
}

#[tokio::test]
async fn given_four_failures_then_success_when_fetching_analysis_then_fifth_attempt_wins() {
    // GIVEN: Four server errors, then a valid analysis
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(4)
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_payload(42.0)))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Fetching the analysis
    let analysis = client_for(&server)
        .fetch_analysis(PANDA_ADDRESS, PANDA_NAME)
        .await
        .expect("fifth attempt succeeds");

    // THEN: The successful payload
    assert_eq!(analysis.percentage, 42.0);
}

/// **VALUE**: There is no fallback analysis; the last error is surfaced once
/// attempts run out.
///
/// **BUG THIS CATCHES**: Would catch `fetch_analysis` being wired with a default
/// value, which would show the user a fabricated score.
#[tokio::test]
async fn given_malformed_analysis_every_time_when_fetching_then_error_after_five_attempts() {
    // GIVEN: Observations arrive as an object on every attempt
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "percentage": 50,
            "observations": { "observation_name": "Ramp" }
        })))
        .expect(5)
        .mount(&server)
        .await;

    // WHEN: Fetching the analysis
    let result = client_for(&server)
        .fetch_analysis(PANDA_ADDRESS, PANDA_NAME)
        .await;

    // THEN: The shape error, classified as transient
    match result {
        Err(error @ AnalysisClientError::MalformedResponse { .. }) => {
            assert!(error.to_string().contains("observations must be an array"));
            assert_eq!(error.error_category(), "transient_service_failure");
        }
        other => panic!("Expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn given_server_error_every_time_when_fetching_analysis_then_status_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model offline"))
        .expect(5)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_analysis(PANDA_ADDRESS, PANDA_NAME)
        .await;

    match result {
        Err(error) => {
            assert_eq!(error.status_code(), Some(500));
            assert!(error.to_string().contains("model offline"));
        }
        Ok(analysis) => panic!("Expected an error, got {analysis:?}"),
    }
}

#[tokio::test]
async fn given_non_json_body_when_fetching_analysis_then_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .expect(5)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_analysis(PANDA_ADDRESS, PANDA_NAME)
        .await;

    assert!(
        matches!(result, Err(AnalysisClientError::Json { .. })),
        "Expected Json error, got {result:?}"
    );
}

// ----------------------------------------------------------------------------
// Construction
// ----------------------------------------------------------------------------

#[tokio::test]
async fn given_custom_endpoints_when_fetching_then_requests_follow_them() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_payload(10.0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server)
        .with_endpoints("api/v2/images", "api/v2/analyze")
        .expect("valid endpoints");

    let analysis = client
        .fetch_analysis(PANDA_ADDRESS, PANDA_NAME)
        .await
        .expect("analysis");
    assert_eq!(analysis.percentage, 10.0);
}

#[test]
fn given_unparseable_base_url_when_building_client_then_configuration_error() {
    let result = access_core::analysis_client::AnalysisClient::new(
        "not a url",
        crate::helpers::fast_retry(),
    );

    match result {
        Err(error) => assert_eq!(error.error_category(), "configuration"),
        Ok(_) => panic!("Expected a URL parse error"),
    }
}
