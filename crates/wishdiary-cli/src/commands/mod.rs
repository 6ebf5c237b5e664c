//! CLI command implementations.

pub mod auth;
pub mod config;
pub mod data;
pub mod profile;
pub mod remind;
pub mod review;
pub mod stats;
pub mod wish;

use wishdiary_core::{AchievementStatus, EmotionalState, Priority, WishCategory, WishStatus};

/// Parse a wish category argument.
pub fn parse_category(s: &str) -> Result<WishCategory, String> {
    match s {
        "personal_growth" => Ok(WishCategory::PersonalGrowth),
        "career" => Ok(WishCategory::Career),
        "health" => Ok(WishCategory::Health),
        "relationships" => Ok(WishCategory::Relationships),
        "learning" => Ok(WishCategory::Learning),
        "creativity" => Ok(WishCategory::Creativity),
        _ => Err(format!("unknown category: {s}")),
    }
}

/// Parse a priority argument.
pub fn parse_priority(s: &str) -> Result<Priority, String> {
    match s {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        _ => Err(format!("unknown priority: {s}")),
    }
}

/// Parse a wish status argument.
pub fn parse_status(s: &str) -> Result<WishStatus, String> {
    match s {
        "pending" => Ok(WishStatus::Pending),
        "achieved" => Ok(WishStatus::Achieved),
        "partially_achieved" => Ok(WishStatus::PartiallyAchieved),
        "not_achieved" => Ok(WishStatus::NotAchieved),
        _ => Err(format!("unknown status: {s}")),
    }
}

/// Parse an achievement status argument.
pub fn parse_achievement_status(s: &str) -> Result<AchievementStatus, String> {
    match s {
        "fully_achieved" => Ok(AchievementStatus::FullyAchieved),
        "partially_achieved" => Ok(AchievementStatus::PartiallyAchieved),
        "in_progress" => Ok(AchievementStatus::InProgress),
        "not_achieved" => Ok(AchievementStatus::NotAchieved),
        _ => Err(format!("unknown achievement status: {s}")),
    }
}

/// Parse an emotional state argument.
pub fn parse_emotional_state(s: &str) -> Result<EmotionalState, String> {
    match s {
        "proud" => Ok(EmotionalState::Proud),
        "satisfied" => Ok(EmotionalState::Satisfied),
        "motivated" => Ok(EmotionalState::Motivated),
        "disappointed" => Ok(EmotionalState::Disappointed),
        "determined" => Ok(EmotionalState::Determined),
        _ => Err(format!("unknown emotional state: {s}")),
    }
}

/// Split a comma-separated argument into trimmed entries.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',').map(|part| part.trim().to_string()).collect()
}
