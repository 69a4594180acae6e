use crate::report::{AccessibilityReport, owner_summary, score_label};
use crate::session::ViewSnapshot;

use models::{AnalysisResult, ImageBundle, Location, Observation, Sentiment};

fn observation(name: &str, sentiment: Sentiment, explanation: &str, feedback: &str) -> Observation {
    Observation {
        observation_name: name.to_string(),
        observation_sentiment: sentiment,
        associated_disability: ["mobility".to_string()].into_iter().collect(),
        explanation: explanation.to_string(),
        feedback: feedback.to_string(),
    }
}

/// **VALUE**: The results view gets everything it renders from one place.
///
/// **BUG THIS CATCHES**: Would catch improvements being built from `explanation`
/// instead of `feedback`, or NEUTRAL observations leaking into either list.
#[test]
fn given_results_snapshot_when_building_report_then_sections_are_derived() {
    // GIVEN: A results snapshot with one observation per category
    let snapshot = ViewSnapshot::ShowingResults {
        location: Location {
            name: "Panda Express".to_string(),
            address: "123 Main St, North Milpitas, CA".to_string(),
        },
        analysis: AnalysisResult {
            percentage: 87.4,
            observations: vec![
                observation("Wide doors", Sentiment::Positive, "36in clearance", "Keep it"),
                observation("Lighting", Sentiment::Neutral, "Dim", "Brighter bulbs"),
                observation("Counter", Sentiment::Negative, "Too high", "Lower a section"),
            ],
        },
        images: ImageBundle {
            images: Vec::new(),
            processed_images: vec!["https://cdn.example/1".to_string(), " ".to_string()],
        },
    };

    // WHEN: Building the report
    let report = AccessibilityReport::from_snapshot(&snapshot).expect("results view");

    // THEN: Display fields and derived lists
    assert_eq!(report.restaurant_name, "Panda Express");
    assert_eq!(report.percentage_text, "87.4%");
    assert_eq!(report.score_label, "Excellent accessibility");
    assert_eq!(report.gallery, vec!["https://cdn.example/1"]);
    assert_eq!(report.improvements, vec!["Counter: Lower a section"]);
    assert_eq!(report.positive_aspects, vec!["Wide doors: 36in clearance"]);
    assert!(report.owner.needs_improvement);
    assert_eq!(report.observations.len(), 3);
}

#[test]
fn given_non_results_snapshot_when_building_report_then_none() {
    assert!(AccessibilityReport::from_snapshot(&ViewSnapshot::Searching).is_none());
}

#[test]
fn given_score_boundaries_when_labelling_then_tiers_switch_at_thresholds() {
    assert_eq!(score_label(80.0), "Excellent accessibility");
    assert_eq!(score_label(79.9), "Moderate accessibility");
    assert_eq!(score_label(50.0), "Moderate accessibility");
    assert_eq!(score_label(49.9), "Poor accessibility");

    assert!(owner_summary(95.0).starts_with("Excellent!"));
    assert!(owner_summary(94.9).starts_with("Good job!"));
    assert!(owner_summary(60.0).contains("significant improvements"));
    assert!(owner_summary(59.9).contains("substantial improvements"));
}
