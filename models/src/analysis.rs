use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// How an observation reflects on the restaurant's accessibility.
///
/// Anything the backend sends outside the five known values, including a
/// missing or null sentiment, becomes `Unknown` rather than failing the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Sentiment {
    Fantastic,
    Positive,
    Neutral,
    Negative,
    Egregious,
    #[default]
    Unknown,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Fantastic => "FANTASTIC",
            Sentiment::Positive => "POSITIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Egregious => "EGREGIOUS",
            Sentiment::Unknown => "UNKNOWN",
        }
    }

    /// Observations an owner should act on.
    pub fn needs_improvement(&self) -> bool {
        matches!(self, Sentiment::Negative | Sentiment::Egregious)
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Sentiment::Fantastic | Sentiment::Positive)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FANTASTIC" => Ok(Sentiment::Fantastic),
            "POSITIVE" => Ok(Sentiment::Positive),
            "NEUTRAL" => Ok(Sentiment::Neutral),
            "NEGATIVE" => Ok(Sentiment::Negative),
            "EGREGIOUS" => Ok(Sentiment::Egregious),
            other => Err(format!("unknown observation sentiment '{other}'")),
        }
    }
}

impl From<String> for Sentiment {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Sentiment::Unknown)
    }
}

/// A single finding from the accessibility analysis.
///
/// Every field tolerates being absent or `null`; only a wrongly typed value
/// makes the observation invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub observation_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub observation_sentiment: Sentiment,
    #[serde(default, deserialize_with = "null_as_default")]
    pub associated_disability: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feedback: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Normalized analysis for one location.
///
/// `percentage` is always rounded to at most one decimal place before a value
/// of this type is constructed by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub percentage: f64,
    pub observations: Vec<Observation>,
}

impl AnalysisResult {
    pub fn improvements(&self) -> impl Iterator<Item = &Observation> {
        self.observations
            .iter()
            .filter(|obs| obs.observation_sentiment.needs_improvement())
    }

    pub fn positives(&self) -> impl Iterator<Item = &Observation> {
        self.observations
            .iter()
            .filter(|obs| obs.observation_sentiment.is_positive())
    }
}
