//! Wish entry entity and lifecycle.
//!
//! A wish is a short-term goal with a fixed one-week target date. It is
//! created `pending` and only leaves that status through a review
//! submission (see the `review` module):
//!
//! ```text
//!   PENDING ─────────> ACHIEVED            (review: fully_achieved)
//!      |    ─────────> PARTIALLY_ACHIEVED  (review: partially_achieved)
//!      |    ─────────> NOT_ACHIEVED        (review: not_achieved)
//!      +──── stays PENDING                 (review: in_progress)
//! ```
//!
//! The three non-pending statuses are terminal; there is no transition
//! back to `pending`.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum title length accepted by validation.
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum content length accepted by validation.
pub const MAX_CONTENT_LEN: usize = 1000;
/// Days between creation and the review target date.
pub const TARGET_DAYS: i64 = 7;

/// Lifecycle status of a wish.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WishStatus {
    /// Not yet reviewed, or reviewed as still in progress
    Pending,
    /// Reviewed as fully achieved (terminal)
    Achieved,
    /// Reviewed as partially achieved (terminal)
    PartiallyAchieved,
    /// Reviewed as not achieved (terminal)
    NotAchieved,
}

impl Default for WishStatus {
    fn default() -> Self {
        WishStatus::Pending
    }
}

impl fmt::Display for WishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WishStatus::Pending => "Pending",
            WishStatus::Achieved => "Achieved",
            WishStatus::PartiallyAchieved => "Partially achieved",
            WishStatus::NotAchieved => "Not achieved",
        };
        write!(f, "{name}")
    }
}

/// Category of a wish.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WishCategory {
    PersonalGrowth,
    Career,
    Health,
    Relationships,
    Learning,
    Creativity,
}

impl Default for WishCategory {
    fn default() -> Self {
        WishCategory::PersonalGrowth
    }
}

impl fmt::Display for WishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WishCategory::PersonalGrowth => "Personal growth",
            WishCategory::Career => "Career",
            WishCategory::Health => "Health",
            WishCategory::Relationships => "Relationships",
            WishCategory::Learning => "Learning",
            WishCategory::Creativity => "Creativity",
        };
        write!(f, "{name}")
    }
}

/// Priority of a wish. No validation beyond the closed set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        write!(f, "{name}")
    }
}

/// A recorded wish.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishEntry {
    /// Unique identifier, generated at creation
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Title, trimmed, at most 100 characters
    pub title: String,
    /// Body text, trimmed, at most 1000 characters
    pub content: String,
    /// Review date: `created_at + 7 days`, immutable after creation
    pub target_date: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
    /// Lifecycle status
    pub status: WishStatus,
    pub category: WishCategory,
    pub priority: Priority,
    /// Self-reported intensity, clamped to 1..=10 at creation
    pub motivation_level: u8,
    /// Self-like counter; stays consistent with `is_liked`.
    /// Records persisted before the like feature existed lack both
    /// fields, hence the serde defaults.
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub is_liked: bool,
    /// Non-empty trimmed strings, input order preserved
    #[serde(default)]
    pub tags: Vec<String>,
    /// Concrete steps the user plans to take
    #[serde(default)]
    pub specific_actions: Vec<String>,
    #[serde(default)]
    pub success_criteria: String,
    /// Seconds spent in the pre-recording concentration timer
    #[serde(default)]
    pub focus_time_secs: u32,
}

impl WishEntry {
    /// Whether the wish is still open (not closed by a review).
    pub fn is_open(&self) -> bool {
        self.status == WishStatus::Pending
    }

    /// Toggle the self-like flag.
    ///
    /// Incrementing only happens on the false-to-true flip and
    /// decrementing on true-to-false, floored at zero, so the count can
    /// never go negative even under double-invocation. Returns the new
    /// liked state.
    pub fn toggle_like(&mut self) -> bool {
        if self.is_liked {
            self.likes = self.likes.saturating_sub(1);
            self.is_liked = false;
        } else {
            self.likes = self.likes.saturating_add(1);
            self.is_liked = true;
        }
        self.updated_at = Utc::now();
        self.is_liked
    }

    /// Advisory validation of the current field values.
    ///
    /// Used after manual edits; same rules as `WishDraft::validate`.
    pub fn validation_errors(&self) -> Vec<String> {
        validate_fields(&self.title, &self.content, i32::from(self.motivation_level))
    }
}

/// Input for creating a wish. Carries every user-settable field with the
/// original defaults; `build` turns it into a `WishEntry`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishDraft {
    pub title: String,
    pub content: String,
    pub category: WishCategory,
    pub priority: Priority,
    /// Clamped to 1..=10 at build time
    pub motivation_level: i32,
    pub tags: Vec<String>,
    pub specific_actions: Vec<String>,
    pub success_criteria: String,
    /// Clamped to >= 0 at build time
    pub focus_time_secs: i64,
}

impl WishDraft {
    /// Create a draft with the default priority (medium) and motivation
    /// level (5).
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: WishCategory,
    ) -> Self {
        WishDraft {
            title: title.into(),
            content: content.into(),
            category,
            priority: Priority::default(),
            motivation_level: 5,
            tags: Vec::new(),
            specific_actions: Vec::new(),
            success_criteria: String::new(),
            focus_time_secs: 0,
        }
    }

    /// Advisory validation.
    ///
    /// Returns a list of human-readable messages; an empty list signals
    /// valid. Construction itself does not fail on invalid data -- the
    /// caller decides whether to block persistence.
    pub fn validate(&self) -> Vec<String> {
        validate_fields(&self.title, &self.content, self.motivation_level)
    }

    /// Build the wish entry, stamping `created_at = now` and
    /// `target_date = now + 7 days`.
    pub fn build(self, user_id: impl Into<String>) -> WishEntry {
        self.build_at(user_id, Utc::now())
    }

    /// Build with an explicit creation instant.
    pub fn build_at(self, user_id: impl Into<String>, now: DateTime<Utc>) -> WishEntry {
        WishEntry {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            target_date: now + Duration::days(TARGET_DAYS),
            created_at: now,
            updated_at: now,
            status: WishStatus::Pending,
            category: self.category,
            priority: self.priority,
            motivation_level: self.motivation_level.clamp(1, 10) as u8,
            likes: 0,
            is_liked: false,
            tags: filter_blank(self.tags),
            specific_actions: filter_blank(self.specific_actions),
            success_criteria: self.success_criteria.trim().to_string(),
            focus_time_secs: self.focus_time_secs.clamp(0, i64::from(u32::MAX)) as u32,
        }
    }
}

fn filter_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn validate_fields(title: &str, content: &str, motivation_level: i32) -> Vec<String> {
    let mut errors = Vec::new();

    if title.trim().is_empty() {
        errors.push("Title must not be empty".to_string());
    }
    if content.trim().is_empty() {
        errors.push("Content must not be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!("Title must not exceed {MAX_TITLE_LEN} characters"));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        errors.push(format!(
            "Content must not exceed {MAX_CONTENT_LEN} characters"
        ));
    }
    if !(1..=10).contains(&motivation_level) {
        errors.push("Motivation level must be between 1 and 10".to_string());
    }

    errors
}

/// Self-encouragement lines shown when the user likes their own wish.
const ENCOURAGEMENTS: &[&str] = &[
    "A like for yourself -- you deserve the cheer!",
    "Believe it: you can make this wish happen.",
    "Every like is a nod to your own effort.",
    "Your work deserves to be seen and celebrated.",
    "A little positive energy -- keep going!",
];

/// Pick a random self-encouragement line.
pub fn random_encouragement() -> &'static str {
    ENCOURAGEMENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(ENCOURAGEMENTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> WishDraft {
        WishDraft::new(
            "Learn Rust",
            "Work through the book and build a CLI",
            WishCategory::Learning,
        )
    }

    #[test]
    fn create_stamps_defaults() {
        let wish = draft().build("user-1");
        assert_eq!(wish.status, WishStatus::Pending);
        assert_eq!(wish.likes, 0);
        assert!(!wish.is_liked);
        assert_eq!(wish.motivation_level, 5);
        assert_eq!(wish.priority, Priority::Medium);
        assert_eq!(wish.updated_at, wish.created_at);
        assert_eq!(wish.target_date, wish.created_at + Duration::days(7));
    }

    #[test]
    fn create_trims_title_and_content() {
        let mut d = draft();
        d.title = "  Learn Rust  ".to_string();
        d.content = "\tread the book \n".to_string();
        let wish = d.build("user-1");
        assert_eq!(wish.title, "Learn Rust");
        assert_eq!(wish.content, "read the book");
    }

    #[test]
    fn create_clamps_motivation_and_focus_time() {
        let mut d = draft();
        d.motivation_level = 42;
        d.focus_time_secs = -300;
        let wish = d.build("user-1");
        assert_eq!(wish.motivation_level, 10);
        assert_eq!(wish.focus_time_secs, 0);

        let mut d = draft();
        d.motivation_level = -3;
        let wish = d.build("user-1");
        assert_eq!(wish.motivation_level, 1);
    }

    #[test]
    fn create_filters_blank_tags_and_actions() {
        let mut d = draft();
        d.tags = vec!["focus".into(), "  ".into(), "".into(), " habit ".into()];
        d.specific_actions = vec!["".into(), "read daily".into()];
        let wish = d.build("user-1");
        assert_eq!(wish.tags, vec!["focus", "habit"]);
        assert_eq!(wish.specific_actions, vec!["read daily"]);
    }

    #[test]
    fn target_date_crosses_month_boundary() {
        let created = "2024-01-28T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let wish = draft().build_at("user-1", created);
        assert_eq!(
            wish.target_date,
            "2024-02-04T12:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn target_date_one_week_later_exactly() {
        let created = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let wish = draft().build_at("user-1", created);
        assert_eq!(
            wish.target_date,
            "2024-01-08T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(wish.status, WishStatus::Pending);
    }

    #[test]
    fn validate_accepts_good_draft() {
        assert!(draft().validate().is_empty());
    }

    #[test]
    fn validate_rejects_empty_fields() {
        let mut d = draft();
        d.title = "   ".to_string();
        d.content = String::new();
        let errors = d.validate();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn validate_rejects_over_length_fields() {
        let mut d = draft();
        d.title = "x".repeat(101);
        d.content = "y".repeat(1001);
        let errors = d.validate();
        assert_eq!(errors.len(), 2);

        d.title = "x".repeat(100);
        d.content = "y".repeat(1000);
        assert!(d.validate().is_empty());
    }

    #[test]
    fn validate_rejects_out_of_range_motivation() {
        let mut d = draft();
        d.motivation_level = 0;
        assert_eq!(d.validate().len(), 1);
        d.motivation_level = 11;
        assert_eq!(d.validate().len(), 1);
        d.motivation_level = 10;
        assert!(d.validate().is_empty());
    }

    #[test]
    fn toggle_like_flips_and_counts() {
        let mut wish = draft().build("user-1");
        assert!(wish.toggle_like());
        assert_eq!(wish.likes, 1);
        assert!(wish.is_liked);

        assert!(!wish.toggle_like());
        assert_eq!(wish.likes, 0);
        assert!(!wish.is_liked);
    }

    #[test]
    fn unlike_floors_at_zero() {
        let mut wish = draft().build("user-1");
        // Corrupted starting point: liked but zero count.
        wish.is_liked = true;
        wish.likes = 0;
        wish.toggle_like();
        assert_eq!(wish.likes, 0);
        assert!(!wish.is_liked);
    }

    #[test]
    fn serde_round_trip_preserves_dates() {
        let wish = draft().build("user-1");
        let json = serde_json::to_string(&wish).unwrap();
        let decoded: WishEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, wish);
    }

    #[test]
    fn dates_serialize_as_iso8601() {
        let created = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let wish = draft().build_at("user-1", created);
        let json = serde_json::to_value(&wish).unwrap();
        assert_eq!(json["created_at"], "2024-01-01T00:00:00Z");
        assert_eq!(json["target_date"], "2024-01-08T00:00:00Z");
    }

    #[test]
    fn deserialize_defaults_missing_like_fields() {
        // Records persisted before the like feature.
        let json = r#"{
            "id": "w-1",
            "user_id": "user-1",
            "title": "Old wish",
            "content": "Stored before likes existed",
            "target_date": "2024-01-08T00:00:00Z",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "status": "pending",
            "category": "health",
            "priority": "low",
            "motivation_level": 7
        }"#;
        let wish: WishEntry = serde_json::from_str(json).unwrap();
        assert_eq!(wish.likes, 0);
        assert!(!wish.is_liked);
        assert!(wish.tags.is_empty());
        assert_eq!(wish.focus_time_secs, 0);
    }

    #[test]
    fn status_serde_names() {
        assert_eq!(
            serde_json::to_value(WishStatus::PartiallyAchieved).unwrap(),
            "partially_achieved"
        );
        assert_eq!(
            serde_json::to_value(WishCategory::PersonalGrowth).unwrap(),
            "personal_growth"
        );
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), "high");
    }

    #[test]
    fn is_open_only_for_pending() {
        let mut wish = draft().build("user-1");
        assert!(wish.is_open());
        wish.status = WishStatus::Achieved;
        assert!(!wish.is_open());
    }
}
