//! HTTP client for the images and AI analysis backends.

use crate::config::AppConfig;
use crate::error::AnalysisClientError;
use crate::normalizer::{normalize_analysis, normalize_images};
use crate::retry::{OnExhausted, RetryPolicy};
use crate::{ANALYSIS_ENDPOINT, IMAGE_CDN_FETCH_BASE, IMAGES_ENDPOINT};

use models::{AnalysisResult, ImageBundle};

use log::{debug, info};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json";
const FETCH_IMAGES_OPERATION: &str = "fetch_images";
const FETCH_ANALYSIS_OPERATION: &str = "fetch_analysis";

#[derive(Serialize)]
struct ImagesRequest<'a> {
    address: &'a str,
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    address: &'a str,
    name: &'a str,
}

/// Client for the analysis backend.
///
/// Requests carry no timeout of their own; every call is bounded by its
/// [`RetryPolicy`] instead.
#[derive(Clone)]
pub struct AnalysisClient {
    base_url: Url,
    images_url: Url,
    analysis_url: Url,
    image_cdn_fetch_base: String,
    client: Client,
    retry: RetryPolicy,
}

impl AnalysisClient {
    pub fn new(base_url_str: &str, retry: RetryPolicy) -> Result<Self, AnalysisClientError> {
        let base_url = parse_base_url(base_url_str)?;
        let images_url = base_url.join(IMAGES_ENDPOINT)?;
        let analysis_url = base_url.join(ANALYSIS_ENDPOINT)?;
        let client = Client::builder().build()?;

        Ok(Self {
            base_url,
            images_url,
            analysis_url,
            image_cdn_fetch_base: IMAGE_CDN_FETCH_BASE.to_string(),
            client,
            retry,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AnalysisClientError> {
        let backend = &config.backend;

        Self::new(&backend.base_url, config.retry_policy())?
            .with_endpoints(&backend.images_endpoint, &backend.analysis_endpoint)?
            .with_image_cdn_fetch_base(&backend.image_cdn_fetch_base)
    }

    pub fn with_endpoints(
        mut self,
        images_endpoint: &str,
        analysis_endpoint: &str,
    ) -> Result<Self, AnalysisClientError> {
        self.images_url = self.base_url.join(images_endpoint)?;
        self.analysis_url = self.base_url.join(analysis_endpoint)?;
        Ok(self)
    }

    pub fn with_image_cdn_fetch_base(
        mut self,
        cdn_fetch_base: &str,
    ) -> Result<Self, AnalysisClientError> {
        Url::parse(cdn_fetch_base)?;
        self.image_cdn_fetch_base = cdn_fetch_base.to_string();
        Ok(self)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetch street-level imagery for `address`.
    ///
    /// Failures are retried and, once attempts run out, absorbed into an empty
    /// bundle. Callers must read an empty bundle as "no imagery available".
    ///
    /// # Errors
    ///
    /// Only [`AnalysisClientError::InvalidInput`] for a blank address, before any
    /// request is made.
    pub async fn fetch_images(&self, address: &str) -> Result<ImageBundle, AnalysisClientError> {
        if address.trim().is_empty() {
            return Err(AnalysisClientError::invalid_input("Address is required"));
        }

        info!("Fetching images for address: {address}");

        self.retry
            .run_if(
                FETCH_IMAGES_OPERATION,
                OnExhausted::DefaultValue(ImageBundle::empty()),
                AnalysisClientError::is_transient,
                || self.request_images(address),
            )
            .await
    }

    /// Fetch the accessibility analysis for a restaurant.
    ///
    /// # Errors
    ///
    /// The last attempt's error once every attempt has failed. There is no
    /// fallback value: a fabricated analysis would be misleading.
    pub async fn fetch_analysis(
        &self,
        address: &str,
        name: &str,
    ) -> Result<AnalysisResult, AnalysisClientError> {
        info!("Fetching accessibility analysis for: {address}, {name}");

        self.retry
            .run_if(
                FETCH_ANALYSIS_OPERATION,
                OnExhausted::Rethrow,
                AnalysisClientError::is_transient,
                || self.request_analysis(address, name),
            )
            .await
    }

    async fn request_images(&self, address: &str) -> Result<ImageBundle, AnalysisClientError> {
        let payload = self
            .post_json(&self.images_url, &ImagesRequest { address })
            .await?;

        let bundle = normalize_images(&payload, self.base_url.as_str(), &self.image_cdn_fetch_base)?;

        debug!(
            "Received {} raw and {} processed images",
            bundle.images.len(),
            bundle.processed_images.len()
        );

        Ok(bundle)
    }

    async fn request_analysis(
        &self,
        address: &str,
        name: &str,
    ) -> Result<AnalysisResult, AnalysisClientError> {
        let payload = self
            .post_json(&self.analysis_url, &AnalysisRequest { address, name })
            .await?;

        let analysis = normalize_analysis(&payload)?;

        debug!(
            "Received analysis: {}% with {} observations",
            analysis.percentage,
            analysis.observations.len()
        );

        Ok(analysis)
    }

    async fn post_json<B: Serialize>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<Value, AnalysisClientError> {
        let response = self
            .client
            .post(url.clone())
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisClientError::server(status.as_u16(), body));
        }

        let text = response.text().await?;
        let payload: Value = serde_json::from_str(&text)?;

        Ok(payload)
    }
}

/// Parse the backend base URL so that endpoint joins append rather than replace.
fn parse_base_url(base_url_str: &str) -> Result<Url, AnalysisClientError> {
    let mut base_url = Url::parse(base_url_str)?;
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    Ok(base_url)
}
