use crate::error::config::ConfigError;
use crate::orchestrator::Pacing;
use crate::retry::RetryPolicy;
use crate::{
    ANALYSIS_ENDPOINT, DEFAULT_BACKEND_BASE_URL, DEFAULT_BASE_RETRY_DELAY, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_PROCESSING_DELAY, DEFAULT_REPORT_DELAY, IMAGE_CDN_FETCH_BASE, IMAGES_ENDPOINT,
};

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

pub const BACKEND_URL_ENV: &str = "ACCESS360_BACKEND_URL";
pub const IMAGE_CDN_URL_ENV: &str = "ACCESS360_IMAGE_CDN_URL";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_images_endpoint")]
    pub images_endpoint: String,
    #[serde(default = "default_analysis_endpoint")]
    pub analysis_endpoint: String,
    #[serde(default = "default_image_cdn_fetch_base")]
    pub image_cdn_fetch_base: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            images_endpoint: default_images_endpoint(),
            analysis_endpoint: default_analysis_endpoint(),
            image_cdn_fetch_base: default_image_cdn_fetch_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PacingConfig {
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,
    #[serde(default = "default_report_delay_ms")]
    pub report_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_processing_delay_ms(),
            report_delay_ms: default_report_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub pacing: PacingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            backend: BackendConfig::default(),
            retry: RetryConfig::default(),
            pacing: PacingConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    DEFAULT_BACKEND_BASE_URL.to_string()
}
fn default_images_endpoint() -> String {
    IMAGES_ENDPOINT.to_string()
}
fn default_analysis_endpoint() -> String {
    ANALYSIS_ENDPOINT.to_string()
}
fn default_image_cdn_fetch_base() -> String {
    IMAGE_CDN_FETCH_BASE.to_string()
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_RETRY_DELAY.as_millis() as u64
}
fn default_processing_delay_ms() -> u64 {
    DEFAULT_PROCESSING_DELAY.as_millis() as u64
}
fn default_report_delay_ms() -> u64 {
    DEFAULT_REPORT_DELAY.as_millis() as u64
}

// ============================================
// IMPLEMENTATION
// ============================================

impl AppConfig {
    /// Load config from {config_dir}/config.json.
    ///
    /// # Returns
    ///
    /// Returns `Ok(AppConfig)` if loaded successfully or defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable, corrupted or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: AppConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// [`AppConfig::load`] followed by environment overrides.
    ///
    /// A `.env` file in the working directory is honoured if present.
    pub fn load_with_env(config_dir: &Path) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from: {}", path.display()),
            Err(e) => debug!("No .env loaded: {e}"),
        }

        let mut config = Self::load(config_dir)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override the backend and CDN URLs from the process environment.
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = env_value(BACKEND_URL_ENV) {
            info!("Backend URL overridden by {BACKEND_URL_ENV}: {url}");
            self.backend.base_url = url;
        }

        if let Some(url) = env_value(IMAGE_CDN_URL_ENV) {
            info!("Image CDN overridden by {IMAGE_CDN_URL_ENV}: {url}");
            self.backend.image_cdn_fetch_base = url;
        }
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        validate_http_url("backend.base_url", &self.backend.base_url)?;
        validate_http_url(
            "backend.image_cdn_fetch_base",
            &self.backend.image_cdn_fetch_base,
        )?;

        for (field, endpoint) in [
            ("backend.images_endpoint", &self.backend.images_endpoint),
            ("backend.analysis_endpoint", &self.backend.analysis_endpoint),
        ] {
            if endpoint.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: format!("{field} cannot be empty"),
                });
            }
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "retry.max_attempts must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.base_delay_ms),
        )
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            processing_delay: Duration::from_millis(self.pacing.processing_delay_ms),
            report_delay: Duration::from_millis(self.pacing.report_delay_ms),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[track_caller]
fn validate_http_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid URL format for {field}: {url}"),
        });
    }
    Ok(())
}
