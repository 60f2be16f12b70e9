//! Reward policy and the event bundle shown by the reward modal.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

/// Confidence at or above which a disposal counts as correct.
pub const CORRECT_CONFIDENCE: u8 = 80;
/// Confidence at or above which the bonus rate applies.
pub const BONUS_CONFIDENCE: u8 = 90;

pub const BASE_POINTS: u32 = 10;
pub const BONUS_POINTS: u32 = 20;
/// Flat award for a confirmed disposal verification.
pub const VERIFIED_POINTS: u32 = 15;

pub fn points_for_confidence(confidence: u8) -> u32 {
    if confidence >= BONUS_CONFIDENCE {
        BONUS_POINTS
    } else {
        BASE_POINTS
    }
}

pub fn is_correct(confidence: u8) -> bool {
    confidence >= CORRECT_CONFIDENCE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

/// Everything the reward modal needs for one celebration.
///
/// Constructed by the caller immediately before display and owned by the
/// modal until it closes. `new_level` and `achievement` stay `None` in the
/// simulated flows; the modal renders them when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub points_earned: u32,
    pub waste_label: String,
    pub correct: bool,
    pub new_level: Option<u32>,
    pub achievement: Option<Achievement>,
}

impl RewardEvent {
    /// Reward for completing a disposal from an analysis result.
    pub fn for_analysis(result: &AnalysisResult) -> Self {
        Self {
            points_earned: points_for_confidence(result.confidence),
            waste_label: result.item.clone(),
            correct: is_correct(result.confidence),
            new_level: None,
            achievement: None,
        }
    }

    /// Reward for a confirmed disposal verification.
    pub fn for_verification() -> Self {
        Self {
            points_earned: VERIFIED_POINTS,
            waste_label: "Verified disposal".into(),
            correct: true,
            new_level: None,
            achievement: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::canned_results;

    #[test]
    fn bonus_rate_applies_from_ninety() {
        assert_eq!(points_for_confidence(95), BONUS_POINTS);
        assert_eq!(points_for_confidence(90), BONUS_POINTS);
        assert_eq!(points_for_confidence(89), BASE_POINTS);
        assert_eq!(points_for_confidence(88), BASE_POINTS);
    }

    #[test]
    fn correctness_floor_is_eighty() {
        assert!(is_correct(80));
        assert!(is_correct(88));
        assert!(!is_correct(79));
    }

    #[test]
    fn analysis_rewards_follow_the_catalogue() {
        let all = canned_results();

        let bottle = RewardEvent::for_analysis(&all[0]);
        assert_eq!(bottle.points_earned, 20);
        assert!(bottle.correct);
        assert_eq!(bottle.waste_label, "Plastic bottle");

        let cardboard = RewardEvent::for_analysis(&all[1]);
        assert_eq!(cardboard.points_earned, 10);
        assert!(cardboard.correct);
    }

    #[test]
    fn verification_reward_is_flat() {
        let event = RewardEvent::for_verification();
        assert_eq!(event.points_earned, VERIFIED_POINTS);
        assert!(event.correct);
        assert!(event.new_level.is_none());
        assert!(event.achievement.is_none());
    }
}
