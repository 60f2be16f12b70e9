//! Canned account and activity data shown on the home and profile screens.
//!
//! Nothing here is persisted; the presets stand in for a future account
//! service and are loaded fresh on every screen entry.

use crate::reward::Achievement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStats {
    pub total_points: u32,
    pub level: u32,
    pub disposal_count: u32,
    pub correct_count: u32,
    pub streak_days: u32,
}

impl ProfileStats {
    pub const fn preset() -> Self {
        Self {
            total_points: 1250,
            level: 5,
            disposal_count: 156,
            correct_count: 147,
            streak_days: 12,
        }
    }

    /// Accuracy as a rounded integer percentage; 0 with no disposals.
    pub fn accuracy_percent(&self) -> u32 {
        if self.disposal_count == 0 {
            return 0;
        }
        (self.correct_count * 100 + self.disposal_count / 2) / self.disposal_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserProfile {
    pub name: &'static str,
    pub email: &'static str,
    pub stats: ProfileStats,
}

impl UserProfile {
    pub const fn preset() -> Self {
        Self {
            name: "Eco Guardian",
            email: "eco@example.com",
            stats: ProfileStats::preset(),
        }
    }
}

pub fn recent_achievement() -> Achievement {
    Achievement {
        title: "Sorting Master".into(),
        description: "Completed 100+ accurate disposals".into(),
    }
}

/// One stat card on the home screen's activity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityStat {
    pub value: &'static str,
    pub label: &'static str,
    pub delta: &'static str,
}

pub const fn activity_summary() -> [ActivityStat; 3] {
    [
        ActivityStat {
            value: "156",
            label: "Analyses",
            delta: "+12%",
        },
        ActivityStat {
            value: "85%",
            label: "Eco score",
            delta: "+5%",
        },
        ActivityStat {
            value: "#12",
            label: "Local rank",
            delta: "+3",
        },
    ]
}

/// Weekly sorting goal shown on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyGoal {
    pub done: u32,
    pub target: u32,
}

impl WeeklyGoal {
    pub const fn preset() -> Self {
        Self {
            done: 12,
            target: 15,
        }
    }

    pub fn ratio(&self) -> f32 {
        if self.target == 0 {
            return 0.0;
        }
        (self.done as f32 / self.target as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_accuracy_rounds_to_ninety_four() {
        let stats = ProfileStats::preset();
        assert_eq!(stats.accuracy_percent(), 94);
    }

    #[test]
    fn accuracy_handles_empty_history() {
        let stats = ProfileStats {
            disposal_count: 0,
            correct_count: 0,
            ..ProfileStats::preset()
        };
        assert_eq!(stats.accuracy_percent(), 0);
    }

    #[test]
    fn weekly_goal_ratio_is_clamped() {
        assert!((WeeklyGoal::preset().ratio() - 0.8).abs() < f32::EPSILON);
        assert_eq!(WeeklyGoal { done: 20, target: 15 }.ratio(), 1.0);
        assert_eq!(WeeklyGoal { done: 1, target: 0 }.ratio(), 0.0);
    }
}
