//! Shape checks and reshaping of backend payloads. No I/O.

use crate::error::NormalizeError;

use models::{AnalysisResult, ImageBundle, Observation, Sentiment};

use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use url::Url;

const IMAGES_KEY: &str = "images";
const PROCESSED_IMAGES_KEY: &str = "processed_images";
const OBSERVATIONS_KEY: &str = "observations";
const PERCENTAGE_KEYS: [&str; 2] = ["percentage", "Percentage"];

/// Characters left as-is when an image URL is embedded in the CDN fetch path:
/// ASCII alphanumerics and `- _ . ! ~ * ' ( )`.
const IMAGE_URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Validate an images payload and route every processed image through the CDN.
///
/// `image_origin` is prefixed to relative image paths; `cdn_fetch_base` is the
/// fetch endpoint the absolute URL is appended to, percent-encoded.
pub fn normalize_images(
    payload: &Value,
    image_origin: &str,
    cdn_fetch_base: &str,
) -> Result<ImageBundle, NormalizeError> {
    let processed = match payload.get(PROCESSED_IMAGES_KEY) {
        None | Some(Value::Null) => {
            return Err(NormalizeError::malformed(
                "Invalid response from server: missing processed_images",
            ));
        }
        Some(value) => string_list(value, PROCESSED_IMAGES_KEY)?,
    };

    let images = match payload.get(IMAGES_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => string_list(value, IMAGES_KEY)?,
    };

    // Blank entries carry no image and are dropped.
    let processed_images: Vec<String> = processed
        .iter()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| rewrite_image_url(raw, image_origin, cdn_fetch_base))
        .collect();

    let dropped = processed.len() - processed_images.len();
    if dropped > 0 {
        debug!("Dropped {dropped} blank processed image entries");
    }

    Ok(ImageBundle {
        images,
        processed_images,
    })
}

/// Make `raw` absolute against `image_origin`, then wrap it in the CDN fetch URL.
pub fn rewrite_image_url(raw: &str, image_origin: &str, cdn_fetch_base: &str) -> String {
    let absolute = if is_absolute_http(raw) {
        raw.to_string()
    } else {
        let origin = image_origin.trim_end_matches('/');
        let separator = if raw.starts_with('/') { "" } else { "/" };
        format!("{origin}{separator}{raw}")
    };

    let separator = if cdn_fetch_base.ends_with('/') { "" } else { "/" };
    format!("{cdn_fetch_base}{separator}{}", encode_image_url(&absolute))
}

/// Percent-encode `url` for use as a single path segment of the CDN fetch URL.
pub fn encode_image_url(url: &str) -> String {
    utf8_percent_encode(url, IMAGE_URL_ENCODE_SET).to_string()
}

/// True for anything that parses as an `http`/`https` URL, however loosely
/// written (`http:/x` parses as `http://x/`).
fn is_absolute_http(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Validate an analysis payload and round its percentage.
pub fn normalize_analysis(payload: &Value) -> Result<AnalysisResult, NormalizeError> {
    let observations = match payload.get(OBSERVATIONS_KEY) {
        Some(value @ Value::Array(_)) => value.clone(),
        Some(other) => {
            return Err(NormalizeError::malformed(format!(
                "Invalid response format from server: observations must be an array, got {}",
                json_kind(other)
            )));
        }
        None => {
            return Err(NormalizeError::malformed(
                "Invalid response format from server: missing observations",
            ));
        }
    };

    let percentage = PERCENTAGE_KEYS
        .iter()
        .find_map(|key| payload.get(*key))
        .ok_or_else(|| {
            NormalizeError::malformed("Invalid response format from server: missing percentage")
        })?;

    let percentage = percentage.as_f64().ok_or_else(|| {
        NormalizeError::malformed(format!(
            "Invalid response format from server: percentage must be numeric, got {}",
            json_kind(percentage)
        ))
    })?;

    let observations: Vec<Observation> = serde_json::from_value(observations).map_err(|e| {
        NormalizeError::malformed(format!("Invalid observation in response: {e}"))
    })?;

    let unknown = observations
        .iter()
        .filter(|obs| obs.observation_sentiment == Sentiment::Unknown)
        .count();
    if unknown > 0 {
        warn!("{unknown} observation(s) with an unrecognised sentiment");
    }

    let percentage = round_percentage(percentage);
    if !(0.0..=100.0).contains(&percentage) {
        warn!("Analysis percentage {percentage} is outside 0-100");
    }

    Ok(AnalysisResult {
        percentage,
        observations,
    })
}

/// Round to at most one decimal place.
///
/// The exact decimal expansion of the double is rounded, so `0.35` (stored as
/// 0.34999...) becomes `0.3`. Exact ties, which for one decimal place can only be
/// `.25` and `.75`, round away from zero.
pub fn round_percentage(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let magnitude = value.abs();
    let is_exact_tie = (magnitude * 4.0).fract() == 0.0 && (magnitude * 2.0).fract() != 0.0;

    let rounded = if is_exact_tie {
        (magnitude * 10.0).ceil() / 10.0
    } else {
        magnitude
    };

    // Off-tie, formatting already rounds the exact binary value.
    let rounded: f64 = format!("{rounded:.1}").parse().unwrap_or(rounded);

    if value.is_sign_negative() && rounded != 0.0 {
        -rounded
    } else {
        rounded
    }
}

fn string_list(value: &Value, key: &str) -> Result<Vec<String>, NormalizeError> {
    let Value::Array(entries) = value else {
        return Err(NormalizeError::malformed(format!(
            "Invalid response from server: {key} must be an array, got {}",
            json_kind(value)
        )));
    };

    entries
        .iter()
        .map(|entry| {
            entry.as_str().map(str::to_string).ok_or_else(|| {
                NormalizeError::malformed(format!(
                    "Invalid response from server: {key} entries must be strings, got {}",
                    json_kind(entry)
                ))
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
