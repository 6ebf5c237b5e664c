//! Review workflow controller.
//!
//! Collects the reviewable-but-unreviewed wishes into an in-memory queue
//! and walks a cursor over it:
//!
//! ```text
//! Reviewing(index) ── submit ──> Reviewing(index + 1)   while more remain
//!                  ── submit ──> Completed              on the last wish
//! ```
//!
//! The cursor is never persisted. Abandoning the queue loses nothing:
//! re-entering recomputes it from stored state, and both filters
//! (eligibility by date, already-reviewed exclusion) are derived purely
//! from what is persisted, so the recomputation is idempotent.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::is_wish_reviewable;
use crate::error::{CoreError, StorageError, WorkflowError};
use crate::events::Event;
use crate::review::{submit_review, AchievementReview, ReviewOutcome};
use crate::storage::DiaryDb;
use crate::wish::WishEntry;

/// Wishes eligible for review at `now`: created at least a week ago and
/// not yet referenced by any review. Stable filter -- input order is
/// preserved, nothing is sorted.
pub fn list_reviewable_wishes(
    wishes: &[WishEntry],
    reviews: &[AchievementReview],
    now: DateTime<Utc>,
) -> Vec<WishEntry> {
    let reviewed: HashSet<&str> = reviews.iter().map(|r| r.wish_entry_id.as_str()).collect();
    wishes
        .iter()
        .filter(|w| is_wish_reviewable(w.created_at, now) && !reviewed.contains(w.id.as_str()))
        .cloned()
        .collect()
}

/// Aggregate success rate over a set of reviews, rounded to whole
/// percent. Successful means fully or partially achieved. Zero when
/// there are no reviews.
pub fn success_rate_pct(reviews: &[AchievementReview]) -> u32 {
    if reviews.is_empty() {
        return 0;
    }
    let successful = reviews
        .iter()
        .filter(|r| r.achievement_status.is_successful())
        .count();
    (successful as f64 / reviews.len() as f64 * 100.0).round() as u32
}

/// Cursor state of the review queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum QueueState {
    Reviewing { index: usize },
    Completed,
}

/// In-memory queue of wishes awaiting review.
#[derive(Debug, Clone)]
pub struct ReviewQueue {
    wishes: Vec<WishEntry>,
    state: QueueState,
}

impl ReviewQueue {
    /// An empty queue starts out completed.
    pub fn new(wishes: Vec<WishEntry>) -> Self {
        let state = if wishes.is_empty() {
            QueueState::Completed
        } else {
            QueueState::Reviewing { index: 0 }
        };
        ReviewQueue { wishes, state }
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == QueueState::Completed
    }

    /// Total number of wishes in the queue.
    pub fn len(&self) -> usize {
        self.wishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wishes.is_empty()
    }

    /// The queued wishes, in review order.
    pub fn wishes(&self) -> &[WishEntry] {
        &self.wishes
    }

    /// The wish under the cursor, if any.
    pub fn current(&self) -> Option<&WishEntry> {
        match self.state {
            QueueState::Reviewing { index } => self.wishes.get(index),
            QueueState::Completed => None,
        }
    }

    /// Zero-based cursor position while reviewing.
    pub fn position(&self) -> Option<usize> {
        match self.state {
            QueueState::Reviewing { index } => Some(index),
            QueueState::Completed => None,
        }
    }

    /// Move the cursor past the current wish.
    fn advance(&mut self) {
        if let QueueState::Reviewing { index } = self.state {
            self.state = if index + 1 < self.wishes.len() {
                QueueState::Reviewing { index: index + 1 }
            } else {
                QueueState::Completed
            };
        }
    }
}

/// Summary produced when the queue reaches `Completed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueueSummary {
    /// Wishes reviewed in this pass
    pub reviewed: usize,
    /// Success rate over all persisted reviews
    pub success_rate_pct: u32,
}

/// Result of one queue submission.
#[derive(Debug, Clone)]
pub struct SubmitResult {
    pub review: AchievementReview,
    pub wish: WishEntry,
    /// Present when this submission completed the queue
    pub completed: Option<QueueSummary>,
    pub events: Vec<Event>,
}

/// Storage-backed driver for the review queue.
///
/// Loads the queue from the database, applies user-submitted outcomes,
/// and persists each (review, updated wish) pair in one transaction.
pub struct ReviewWorkflow<'a> {
    db: &'a DiaryDb,
    queue: ReviewQueue,
}

impl<'a> ReviewWorkflow<'a> {
    /// Build the queue from persisted state.
    pub fn begin(db: &'a DiaryDb, now: DateTime<Utc>) -> Result<Self, StorageError> {
        let wishes = db.list_wishes()?;
        let reviews = db.list_reviews()?;
        let queue = ReviewQueue::new(list_reviewable_wishes(&wishes, &reviews, now));
        Ok(ReviewWorkflow { db, queue })
    }

    pub fn queue(&self) -> &ReviewQueue {
        &self.queue
    }

    pub fn current(&self) -> Option<&WishEntry> {
        self.queue.current()
    }

    /// Apply the user's outcome to the wish under the cursor.
    ///
    /// Persists the review and the status-updated wish atomically, then
    /// advances the cursor. Completing the queue computes the aggregate
    /// success rate over every persisted review.
    pub fn submit(&mut self, outcome: ReviewOutcome) -> Result<SubmitResult, CoreError> {
        let wish = self
            .queue
            .current()
            .ok_or(WorkflowError::QueueCompleted)?
            .clone();

        let (review, updated) = submit_review(&wish, outcome);
        self.db.submit_review_atomic(&review, &updated)?;
        self.queue.advance();

        let mut events = vec![Event::ReviewSubmitted {
            review_id: review.id.clone(),
            wish_id: updated.id.clone(),
            achievement_status: review.achievement_status,
            wish_status: updated.status,
            at: Utc::now(),
        }];

        let completed = if self.queue.is_completed() {
            let summary = QueueSummary {
                reviewed: self.queue.len(),
                success_rate_pct: success_rate_pct(&self.db.list_reviews()?),
            };
            events.push(Event::QueueCompleted {
                reviewed: summary.reviewed,
                success_rate_pct: summary.success_rate_pct,
                at: Utc::now(),
            });
            Some(summary)
        } else {
            None
        };

        Ok(SubmitResult {
            review,
            wish: updated,
            completed,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{submit_review_at, AchievementStatus, EmotionalState};
    use crate::wish::{WishCategory, WishDraft};
    use chrono::Duration;

    fn wish_created_days_ago(title: &str, days: i64, now: DateTime<Utc>) -> WishEntry {
        WishDraft::new(title, "content", WishCategory::PersonalGrowth)
            .build_at("user-1", now - Duration::days(days))
    }

    fn review_for(wish: &WishEntry, status: AchievementStatus) -> AchievementReview {
        let (review, _) = submit_review_at(
            wish,
            ReviewOutcome::new(status, EmotionalState::Satisfied),
            wish.created_at + Duration::days(8),
        );
        review
    }

    #[test]
    fn reviewable_excludes_young_and_reviewed() {
        let now = Utc::now();
        let old = wish_created_days_ago("old", 10, now);
        let young = wish_created_days_ago("young", 3, now);
        let reviewed = wish_created_days_ago("reviewed", 10, now);
        let review = review_for(&reviewed, AchievementStatus::FullyAchieved);

        let wishes = vec![old.clone(), young, reviewed];
        let result = list_reviewable_wishes(&wishes, &[review], now);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, old.id);
    }

    #[test]
    fn reviewable_preserves_input_order() {
        let now = Utc::now();
        let a = wish_created_days_ago("a", 9, now);
        let b = wish_created_days_ago("b", 12, now);
        let c = wish_created_days_ago("c", 8, now);
        let result = list_reviewable_wishes(&[a.clone(), b.clone(), c.clone()], &[], now);
        let ids: Vec<_> = result.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec![a.id.as_str(), b.id.as_str(), c.id.as_str()]);
    }

    #[test]
    fn empty_queue_is_completed() {
        let queue = ReviewQueue::new(Vec::new());
        assert!(queue.is_completed());
        assert!(queue.current().is_none());
        assert_eq!(queue.position(), None);
    }

    #[test]
    fn queue_advances_to_completed() {
        let now = Utc::now();
        let wishes = vec![
            wish_created_days_ago("a", 9, now),
            wish_created_days_ago("b", 10, now),
        ];
        let mut queue = ReviewQueue::new(wishes);
        assert_eq!(queue.state(), QueueState::Reviewing { index: 0 });
        assert_eq!(queue.current().unwrap().title, "a");

        queue.advance();
        assert_eq!(queue.state(), QueueState::Reviewing { index: 1 });
        assert_eq!(queue.current().unwrap().title, "b");

        queue.advance();
        assert!(queue.is_completed());
        assert!(queue.current().is_none());

        // Advancing a completed queue is a no-op.
        queue.advance();
        assert!(queue.is_completed());
    }

    #[test]
    fn success_rate_counts_full_and_partial() {
        let now = Utc::now();
        let wishes: Vec<_> = (0..4)
            .map(|i| wish_created_days_ago(&format!("w{i}"), 10 + i, now))
            .collect();
        let reviews = vec![
            review_for(&wishes[0], AchievementStatus::FullyAchieved),
            review_for(&wishes[1], AchievementStatus::PartiallyAchieved),
            review_for(&wishes[2], AchievementStatus::NotAchieved),
            review_for(&wishes[3], AchievementStatus::InProgress),
        ];
        assert_eq!(success_rate_pct(&reviews), 50);
        assert_eq!(success_rate_pct(&reviews[..3]), 67);
        assert_eq!(success_rate_pct(&[]), 0);
    }
}
