//! Remote analysis orchestration for Access 360.
//!
//! A cycle fetches street-level imagery for a restaurant, asks the AI backend
//! for an accessibility analysis and drives the three-view session (search,
//! progress, results) through the outcome.

pub mod analysis_client;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod orchestrator;
pub mod report;
pub mod retry;
pub mod session;

#[cfg(test)]
mod tests;

use std::time::Duration;

pub const BACKEND_HOST: &str = "44.246.144.147";
pub const DEFAULT_BACKEND_BASE_URL: &str = const_format::concatcp!("http://", BACKEND_HOST, "/");
pub const IMAGES_ENDPOINT: &str = "images";
pub const ANALYSIS_ENDPOINT: &str = "ai";

/// Base of the CDN "fetch" rewrite endpoint every processed image is routed through.
pub const IMAGE_CDN_FETCH_BASE: &str = "https://res.cloudinary.com/decnnqfzf/image/fetch/";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_RETRY_DELAY: Duration = Duration::from_millis(1000);

pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_REPORT_DELAY: Duration = Duration::from_millis(500);
