//! Achievement review entity and the status mappings.
//!
//! A review is a one-time assessment of a wish. Its achievement
//! percentage is derived from the achievement status -- never settable on
//! its own -- and the wish status after submission follows a second fixed
//! mapping. Both mappings are total over the four statuses.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wish::{WishEntry, WishStatus};

/// Filler used when the user leaves the reflection blank.
pub const DEFAULT_REFLECTION: &str = "No reflection yet.";
/// Filler used when the user leaves the celebration moment blank.
pub const DEFAULT_CELEBRATION: &str = "Completed this goal!";

/// Outcome of a review, as selected by the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementStatus {
    FullyAchieved,
    PartiallyAchieved,
    InProgress,
    NotAchieved,
}

impl AchievementStatus {
    /// Derived achievement percentage.
    pub fn percentage(self) -> u8 {
        match self {
            AchievementStatus::FullyAchieved => 100,
            AchievementStatus::PartiallyAchieved => 70,
            AchievementStatus::InProgress => 30,
            AchievementStatus::NotAchieved => 0,
        }
    }

    /// Wish status after a review with this outcome.
    ///
    /// `InProgress` intentionally does not close the wish: it stays
    /// `Pending` rather than reaching a terminal status.
    pub fn wish_status(self) -> WishStatus {
        match self {
            AchievementStatus::FullyAchieved => WishStatus::Achieved,
            AchievementStatus::PartiallyAchieved => WishStatus::PartiallyAchieved,
            AchievementStatus::NotAchieved => WishStatus::NotAchieved,
            AchievementStatus::InProgress => WishStatus::Pending,
        }
    }

    /// Whether this outcome counts toward the aggregate success rate.
    pub fn is_successful(self) -> bool {
        matches!(
            self,
            AchievementStatus::FullyAchieved | AchievementStatus::PartiallyAchieved
        )
    }

    /// Feedback line shown after selecting this outcome.
    pub fn motivational_message(self) -> &'static str {
        match self {
            AchievementStatus::FullyAchieved => {
                "Wonderful! You fully achieved this wish -- keep that momentum!"
            }
            AchievementStatus::PartiallyAchieved => {
                "Well done! Partial progress is still real progress."
            }
            AchievementStatus::InProgress => {
                "Keep going! You are moving toward the goal -- persistence wins."
            }
            AchievementStatus::NotAchieved => {
                "That's okay. Every attempt is growth -- adjust and set out again."
            }
        }
    }
}

impl fmt::Display for AchievementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AchievementStatus::FullyAchieved => "Fully achieved",
            AchievementStatus::PartiallyAchieved => "Partially achieved",
            AchievementStatus::InProgress => "In progress",
            AchievementStatus::NotAchieved => "Not achieved",
        };
        write!(f, "{name}")
    }
}

/// How the user feels right after the review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalState {
    Proud,
    Satisfied,
    Motivated,
    Disappointed,
    Determined,
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmotionalState::Proud => "Proud",
            EmotionalState::Satisfied => "Satisfied",
            EmotionalState::Motivated => "Motivated",
            EmotionalState::Disappointed => "Disappointed",
            EmotionalState::Determined => "Determined",
        };
        write!(f, "{name}")
    }
}

/// A submitted achievement review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievementReview {
    /// Unique identifier
    pub id: String,
    /// The reviewed wish; at most one review per wish
    pub wish_entry_id: String,
    /// Owner; equals the referenced wish's `user_id`
    pub user_id: String,
    pub achievement_status: AchievementStatus,
    /// Derived from `achievement_status`, see `AchievementStatus::percentage`
    pub achievement_percentage: u8,
    pub reflection: String,
    pub celebration_moment: String,
    #[serde(default)]
    pub lessons_learned: Vec<String>,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub next_goals: Vec<String>,
    #[serde(default)]
    pub gratitude_notes: Vec<String>,
    pub emotional_state_after: EmotionalState,
    /// Set once at submission
    pub created_at: DateTime<Utc>,
}

/// User-supplied fields for a review submission.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub achievement_status: AchievementStatus,
    pub emotional_state: EmotionalState,
    /// Blank falls back to [`DEFAULT_REFLECTION`]
    pub reflection: Option<String>,
    /// Blank falls back to [`DEFAULT_CELEBRATION`]
    pub celebration_moment: Option<String>,
}

impl ReviewOutcome {
    pub fn new(achievement_status: AchievementStatus, emotional_state: EmotionalState) -> Self {
        ReviewOutcome {
            achievement_status,
            emotional_state,
            reflection: None,
            celebration_moment: None,
        }
    }
}

/// Build the review for a wish and derive the updated wish.
///
/// Pure: no storage is touched. The returned wish carries the status from
/// the mapping table and a refreshed `updated_at`; everything else is
/// unchanged. Persisting the pair atomically is
/// `DiaryDb::submit_review_atomic`.
pub fn submit_review(wish: &WishEntry, outcome: ReviewOutcome) -> (AchievementReview, WishEntry) {
    submit_review_at(wish, outcome, Utc::now())
}

/// `submit_review` with an explicit submission instant.
pub fn submit_review_at(
    wish: &WishEntry,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
) -> (AchievementReview, WishEntry) {
    let review = AchievementReview {
        id: uuid::Uuid::new_v4().to_string(),
        wish_entry_id: wish.id.clone(),
        user_id: wish.user_id.clone(),
        achievement_status: outcome.achievement_status,
        achievement_percentage: outcome.achievement_status.percentage(),
        reflection: or_filler(outcome.reflection, DEFAULT_REFLECTION),
        celebration_moment: or_filler(outcome.celebration_moment, DEFAULT_CELEBRATION),
        lessons_learned: Vec::new(),
        improvement_areas: Vec::new(),
        next_goals: Vec::new(),
        gratitude_notes: Vec::new(),
        emotional_state_after: outcome.emotional_state,
        created_at: now,
    };

    let mut updated = wish.clone();
    updated.status = outcome.achievement_status.wish_status();
    updated.updated_at = now;

    (review, updated)
}

fn or_filler(value: Option<String>, filler: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => filler.to_string(),
    }
}

/// Encouragement lines for review reminders and completion messages.
const REVIEW_ENCOURAGEMENTS: &[&str] = &[
    "Time to look back -- how did your wish go?",
    "A week has passed. Celebrate what moved, learn from what didn't.",
    "Your wish is ready for review. Be honest and be kind to yourself.",
];

/// Pick a random review encouragement line.
pub fn random_review_encouragement() -> &'static str {
    REVIEW_ENCOURAGEMENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(REVIEW_ENCOURAGEMENTS[0])
}
