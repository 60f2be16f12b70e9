//! Simulated waste analysis behind a swappable provider interface.
//!
//! The provider contract is the seam where a real classifier would plug in:
//! presentation code only ever sees [`AnalysisProvider::analyze`]. The
//! shipped implementation picks uniformly from a small canned catalogue;
//! [`FixedAnalysis`] is the deterministic double used by tests.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::capture::CaptureRef;

/// Result of analyzing one captured image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Recognized item, e.g. "Plastic bottle".
    pub item: String,
    /// Waste category the item sorts into.
    pub category: String,
    /// Ordered disposal steps.
    pub instructions: Vec<String>,
    /// Confidence as an integer percentage, 0..=100.
    pub confidence: u8,
    /// One extra hint shown below the instructions.
    pub tips: String,
}

/// Failure modes of the analysis boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("no analysis provider available")]
    NoProvider,
    #[error("analysis failed: {0}")]
    Failed(String),
}

pub type AnalysisOutcome = Result<AnalysisResult, AnalysisError>;

/// The seam between presentation and classification.
///
/// Implementations must be cheap to call from the UI schedule; simulated
/// latency belongs to the calling screen, not the provider.
pub trait AnalysisProvider: Send + Sync {
    fn analyze(&self, image: &CaptureRef) -> AnalysisOutcome;
}

/// The canned outcome catalogue.
pub fn canned_results() -> Vec<AnalysisResult> {
    vec![
        AnalysisResult {
            item: "Plastic bottle".into(),
            category: "Plastic".into(),
            instructions: vec![
                "Remove the label".into(),
                "Empty and rinse the bottle".into(),
                "Crush it and put it in the plastics bin".into(),
            ],
            confidence: 95,
            tips: "Remove the cap and sort it separately!".into(),
        },
        AnalysisResult {
            item: "Cardboard box".into(),
            category: "Paper".into(),
            instructions: vec![
                "Remove any tape and labels".into(),
                "Flatten the box".into(),
                "Put it out on paper collection day".into(),
            ],
            confidence: 88,
            tips: "Wet cardboard cannot be recycled, keep it dry.".into(),
        },
    ]
}

/// Uniform-random pick from the canned catalogue.
pub struct CannedAnalysis;

impl AnalysisProvider for CannedAnalysis {
    fn analyze(&self, _image: &CaptureRef) -> AnalysisOutcome {
        let mut results = canned_results();
        let i = rand::thread_rng().gen_range(0..results.len());
        Ok(results.swap_remove(i))
    }
}

/// Deterministic provider returning a fixed catalogue entry.
pub struct FixedAnalysis(pub usize);

impl AnalysisProvider for FixedAnalysis {
    fn analyze(&self, _image: &CaptureRef) -> AnalysisOutcome {
        let mut results = canned_results();
        let i = self.0 % results.len();
        Ok(results.swap_remove(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureSource;

    fn image() -> CaptureRef {
        CaptureRef::new("/tmp/test.jpg", CaptureSource::Camera)
    }

    #[test]
    fn catalogue_has_exactly_two_outcomes() {
        let all = canned_results();
        assert_eq!(all.len(), 2);

        let confidences: Vec<u8> = all.iter().map(|r| r.confidence).collect();
        assert!(confidences.contains(&95));
        assert!(confidences.contains(&88));

        for result in &all {
            assert_eq!(result.instructions.len(), 3);
            assert!(result.instructions.iter().all(|step| !step.is_empty()));
            assert!(!result.tips.is_empty());
        }
    }

    #[test]
    fn canned_provider_picks_from_catalogue() {
        let provider = CannedAnalysis;
        let all = canned_results();

        for _ in 0..20 {
            let result = provider.analyze(&image()).unwrap();
            assert!(all.contains(&result));
        }
    }

    #[test]
    fn fixed_provider_is_deterministic() {
        let first = FixedAnalysis(0);
        let second = FixedAnalysis(1);

        assert_eq!(first.analyze(&image()).unwrap().confidence, 95);
        assert_eq!(second.analyze(&image()).unwrap().confidence, 88);
        // Index wraps instead of panicking.
        assert_eq!(
            FixedAnalysis(2).analyze(&image()).unwrap().confidence,
            95
        );
    }
}
