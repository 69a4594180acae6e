use crate::config::{AppConfig, BACKEND_URL_ENV, IMAGE_CDN_URL_ENV};
use crate::error::ConfigError;
use crate::{DEFAULT_BACKEND_BASE_URL, IMAGE_CDN_FETCH_BASE};

use std::fs;
use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) {
    fs::write(dir.path().join("config.json"), contents).expect("write config.json");
}

fn clear_env() {
    // SAFETY: tests touching the environment are serialised with #[serial].
    unsafe {
        std::env::remove_var(BACKEND_URL_ENV);
        std::env::remove_var(IMAGE_CDN_URL_ENV);
    }
}

#[test]
fn given_no_config_file_when_loading_then_defaults_are_used() {
    let dir = TempDir::new().expect("temp dir");

    let config = AppConfig::load(dir.path()).expect("defaults");

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.backend.base_url, DEFAULT_BACKEND_BASE_URL);
    assert_eq!(config.backend.image_cdn_fetch_base, IMAGE_CDN_FETCH_BASE);
    assert_eq!(config.retry_policy().max_attempts(), 5);
    assert_eq!(config.retry_policy().base_delay(), Duration::from_millis(1000));
    assert_eq!(config.pacing().processing_delay, Duration::from_millis(1000));
    assert_eq!(config.pacing().report_delay, Duration::from_millis(500));
}

/// **VALUE**: A partial config file only overrides what it names.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` turning every
/// omitted field into a parse error.
#[test]
fn given_partial_config_when_loading_then_missing_fields_default() {
    // GIVEN: Only the backend URL and the attempt count are set
    let dir = TempDir::new().expect("temp dir");
    write_config(
        &dir,
        r#"{ "backend": { "base_url": "http://localhost:5000/" }, "retry": { "max_attempts": 3 } }"#,
    );

    // WHEN: Loading
    let config = AppConfig::load(dir.path()).expect("valid config");

    // THEN: Named fields are taken, everything else defaults
    assert_eq!(config.backend.base_url, "http://localhost:5000/");
    assert_eq!(config.backend.images_endpoint, "images");
    assert_eq!(config.backend.analysis_endpoint, "ai");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.pacing, AppConfig::default().pacing);
}

#[test]
fn given_corrupted_json_when_loading_then_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    write_config(&dir, "{ not json");

    let result = AppConfig::load(dir.path());

    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Expected ParseError, got {result:?}"
    );
}

#[test]
fn given_invalid_values_when_loading_then_validation_error() {
    let cases = [
        r#"{ "version": 99 }"#,
        r#"{ "backend": { "base_url": "ftp://example.com/" } }"#,
        r#"{ "backend": { "image_cdn_fetch_base": "not a url" } }"#,
        r#"{ "backend": { "analysis_endpoint": "  " } }"#,
        r#"{ "retry": { "max_attempts": 0 } }"#,
    ];

    for contents in cases {
        let dir = TempDir::new().expect("temp dir");
        write_config(&dir, contents);

        let result = AppConfig::load(dir.path());

        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "Expected ValidationError for {contents}, got {result:?}"
        );
    }
}

#[test]
fn given_zero_pacing_when_loading_then_pacing_is_disabled() {
    let dir = TempDir::new().expect("temp dir");
    write_config(
        &dir,
        r#"{ "pacing": { "processing_delay_ms": 0, "report_delay_ms": 0 } }"#,
    );

    let config = AppConfig::load(dir.path()).expect("valid config");

    assert!(config.pacing().processing_delay.is_zero());
    assert!(config.pacing().report_delay.is_zero());
}

/// **VALUE**: Deployments can point the client at another backend without a
/// config file.
///
/// **BUG THIS CATCHES**: Would catch overrides being applied after validation,
/// letting a malformed URL from the environment through.
#[test]
#[serial]
fn given_env_overrides_when_loading_with_env_then_urls_are_replaced() {
    // GIVEN: Both URL overrides set
    clear_env();
    // SAFETY: serialised with #[serial].
    unsafe {
        std::env::set_var(BACKEND_URL_ENV, " http://127.0.0.1:8080/ ");
        std::env::set_var(IMAGE_CDN_URL_ENV, "https://cdn.example/fetch/");
    }
    let dir = TempDir::new().expect("temp dir");

    // WHEN: Loading with the environment applied
    let result = AppConfig::load_with_env(dir.path());
    clear_env();

    // THEN: Trimmed overrides win
    let config = result.expect("valid overrides");
    assert_eq!(config.backend.base_url, "http://127.0.0.1:8080/");
    assert_eq!(config.backend.image_cdn_fetch_base, "https://cdn.example/fetch/");
}

#[test]
#[serial]
fn given_malformed_env_override_when_loading_with_env_then_validation_error() {
    clear_env();
    // SAFETY: serialised with #[serial].
    unsafe {
        std::env::set_var(BACKEND_URL_ENV, "localhost:8080");
    }
    let dir = TempDir::new().expect("temp dir");

    let result = AppConfig::load_with_env(dir.path());
    clear_env();

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
#[serial]
fn given_blank_env_override_when_applied_then_config_is_unchanged() {
    clear_env();
    // SAFETY: serialised with #[serial].
    unsafe {
        std::env::set_var(BACKEND_URL_ENV, "   ");
    }

    let mut config = AppConfig::default();
    config.apply_env_overrides();
    clear_env();

    assert_eq!(config, AppConfig::default());
}
