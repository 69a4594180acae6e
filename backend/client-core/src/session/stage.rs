use std::fmt;

use serde::Serialize;

/// Progress-display position within one analysis cycle.
///
/// Carries no correctness weight; it only selects the label and the progress
/// bar value shown while a cycle runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    #[default]
    FetchingImages,
    Processing,
    Analyzing,
    GeneratingReport,
}

impl AnalysisStage {
    pub const ALL: [AnalysisStage; 4] = [
        AnalysisStage::FetchingImages,
        AnalysisStage::Processing,
        AnalysisStage::Analyzing,
        AnalysisStage::GeneratingReport,
    ];

    pub fn index(&self) -> usize {
        match self {
            AnalysisStage::FetchingImages => 0,
            AnalysisStage::Processing => 1,
            AnalysisStage::Analyzing => 2,
            AnalysisStage::GeneratingReport => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStage::FetchingImages => "Fetching restaurant images...",
            AnalysisStage::Processing => "Processing accessibility features...",
            AnalysisStage::Analyzing => "Analyzing wheelchair accessibility...",
            AnalysisStage::GeneratingReport => "Generating detailed report...",
        }
    }

    /// `(stage + 1) / 4 * 100`.
    pub fn progress_percent(&self) -> f64 {
        (self.index() + 1) as f64 / Self::ALL.len() as f64 * 100.0
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {} ({})", self.index(), self.label())
    }
}
