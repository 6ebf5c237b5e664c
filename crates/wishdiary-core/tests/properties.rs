//! Property tests for the entity model and the status mappings.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use wishdiary_core::dates::is_wish_reviewable;
use wishdiary_core::{
    AchievementReview, AchievementStatus, EmotionalState, ReviewOutcome, WishCategory, WishDraft,
    WishEntry, WishStatus,
};

fn achievement_status() -> impl Strategy<Value = AchievementStatus> {
    prop_oneof![
        Just(AchievementStatus::FullyAchieved),
        Just(AchievementStatus::PartiallyAchieved),
        Just(AchievementStatus::InProgress),
        Just(AchievementStatus::NotAchieved),
    ]
}

fn emotional_state() -> impl Strategy<Value = EmotionalState> {
    prop_oneof![
        Just(EmotionalState::Proud),
        Just(EmotionalState::Satisfied),
        Just(EmotionalState::Motivated),
        Just(EmotionalState::Disappointed),
        Just(EmotionalState::Determined),
    ]
}

proptest! {
    // Clamping holds for arbitrary out-of-range input.
    #[test]
    fn creation_clamps_motivation_and_focus(motivation in any::<i32>(), focus in any::<i64>()) {
        let mut draft = WishDraft::new("t", "c", WishCategory::Health);
        draft.motivation_level = motivation;
        draft.focus_time_secs = focus;
        let wish = draft.build("user-1");

        prop_assert!((1..=10).contains(&wish.motivation_level));
        if focus <= 0 {
            prop_assert_eq!(wish.focus_time_secs, 0);
        }
    }

    // The target date is exactly creation plus seven days for any instant.
    #[test]
    fn target_date_is_exactly_one_week_out(secs in 0i64..4_000_000_000i64) {
        let now = Utc.timestamp_opt(secs, 0).unwrap();
        let wish = WishDraft::new("t", "c", WishCategory::Career).build_at("user-1", now);
        prop_assert_eq!(wish.target_date - wish.created_at, Duration::days(7));
        prop_assert_eq!(wish.created_at, now);
    }

    // Eligibility agrees with the seven-day boundary for
    // arbitrary offsets around it.
    #[test]
    fn eligibility_matches_seven_day_boundary(offset_secs in -(30 * 86_400i64)..(30 * 86_400i64)) {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let created = now - Duration::seconds(offset_secs);
        prop_assert_eq!(
            is_wish_reviewable(created, now),
            offset_secs >= 7 * 86_400
        );
    }

    // Only the four fixed (percentage, status) pairs are producible.
    #[test]
    fn status_mapping_is_total_and_fixed(
        status in achievement_status(),
        emotion in emotional_state(),
    ) {
        let wish = WishDraft::new("t", "c", WishCategory::Learning).build("user-1");
        let (review, updated) =
            wishdiary_core::submit_review(&wish, ReviewOutcome::new(status, emotion));

        let expected = match status {
            AchievementStatus::FullyAchieved => (100, WishStatus::Achieved),
            AchievementStatus::PartiallyAchieved => (70, WishStatus::PartiallyAchieved),
            AchievementStatus::InProgress => (30, WishStatus::Pending),
            AchievementStatus::NotAchieved => (0, WishStatus::NotAchieved),
        };
        prop_assert_eq!((review.achievement_percentage, updated.status), expected);
        prop_assert_eq!(review.emotional_state_after, emotion);
    }

    // Any toggle sequence keeps the pair consistent and non-negative.
    #[test]
    fn like_toggles_stay_consistent(toggles in 0usize..64) {
        let mut wish = WishDraft::new("t", "c", WishCategory::Health).build("user-1");
        for _ in 0..toggles {
            wish.toggle_like();
        }
        prop_assert!(wish.likes <= 1);
        prop_assert_eq!(wish.likes == 1, wish.is_liked);
    }

    // Serde round-trip over arbitrary valid wishes.
    #[test]
    fn wish_serde_round_trip(
        title in "[a-zA-Z0-9 ]{1,40}",
        content in "[a-zA-Z0-9 .,]{1,200}",
        motivation in 1i32..=10,
        tags in proptest::collection::vec("[a-z]{1,8}", 0..5),
        secs in 0i64..4_000_000_000i64,
    ) {
        let mut draft = WishDraft::new(title, content, WishCategory::PersonalGrowth);
        draft.motivation_level = motivation;
        draft.tags = tags;
        let wish = draft.build_at("user-1", Utc.timestamp_opt(secs, 0).unwrap());

        let json = serde_json::to_string(&wish).unwrap();
        let decoded: WishEntry = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(decoded, wish);
    }

    // Serde round-trip for reviews.
    #[test]
    fn review_serde_round_trip(
        status in achievement_status(),
        emotion in emotional_state(),
        reflection in proptest::option::of("[a-zA-Z ]{0,60}"),
    ) {
        let wish = WishDraft::new("t", "c", WishCategory::Creativity).build("user-1");
        let mut outcome = ReviewOutcome::new(status, emotion);
        outcome.reflection = reflection;
        let (review, _) = wishdiary_core::submit_review(&wish, outcome);

        let json = serde_json::to_string(&review).unwrap();
        let decoded: AchievementReview = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(decoded, review);
    }
}
