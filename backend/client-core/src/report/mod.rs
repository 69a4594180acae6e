//! Derived, display-ready view of a finished analysis.

use crate::session::ViewSnapshot;

use models::{AnalysisResult, ImageBundle, Location, Observation};

use serde::Serialize;

const OWNER_TARGET_PERCENTAGE: f64 = 95.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerSummary {
    /// Anything under the target score is flagged for improvement.
    pub needs_improvement: bool,
    pub summary: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityReport {
    pub restaurant_name: String,
    pub restaurant_address: String,
    pub percentage: f64,
    pub percentage_text: String,
    pub score_label: &'static str,
    pub observations: Vec<Observation>,
    pub gallery: Vec<String>,
    pub improvements: Vec<String>,
    pub positive_aspects: Vec<String>,
    pub owner: OwnerSummary,
}

impl AccessibilityReport {
    pub fn new(location: &Location, analysis: &AnalysisResult, images: &ImageBundle) -> Self {
        let percentage = analysis.percentage;

        Self {
            restaurant_name: location.name.clone(),
            restaurant_address: location.address.clone(),
            percentage,
            percentage_text: format!("{percentage:.1}%"),
            score_label: score_label(percentage),
            observations: analysis.observations.clone(),
            gallery: images.gallery().map(str::to_string).collect(),
            improvements: analysis
                .improvements()
                .map(|obs| format!("{}: {}", obs.observation_name, obs.feedback))
                .collect(),
            positive_aspects: analysis
                .positives()
                .map(|obs| format!("{}: {}", obs.observation_name, obs.explanation))
                .collect(),
            owner: OwnerSummary {
                needs_improvement: percentage < OWNER_TARGET_PERCENTAGE,
                summary: owner_summary(percentage),
            },
        }
    }

    /// Build a report if the snapshot is the results view.
    pub fn from_snapshot(snapshot: &ViewSnapshot) -> Option<Self> {
        match snapshot {
            ViewSnapshot::ShowingResults {
                location,
                analysis,
                images,
            } => Some(Self::new(location, analysis, images)),
            _ => None,
        }
    }
}

pub fn score_label(percentage: f64) -> &'static str {
    if percentage >= 80.0 {
        "Excellent accessibility"
    } else if percentage >= 50.0 {
        "Moderate accessibility"
    } else {
        "Poor accessibility"
    }
}

pub fn owner_summary(percentage: f64) -> &'static str {
    if percentage >= 95.0 {
        "Excellent! Your restaurant demonstrates outstanding accessibility."
    } else if percentage >= 80.0 {
        "Good job! Your restaurant is quite accessible, but there's room for improvement."
    } else if percentage >= 60.0 {
        "Your restaurant has some accessible features, but significant improvements are needed."
    } else {
        "Your restaurant needs substantial improvements in accessibility."
    }
}
