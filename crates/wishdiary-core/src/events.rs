use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::review::AchievementStatus;
use crate::wish::{WishEntry, WishStatus};

/// Every state change in the diary produces an Event.
/// The CLI prints them; a GUI layer would poll or subscribe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    WishCreated {
        wish_id: String,
        target_date: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    WishUpdated {
        wish_id: String,
        at: DateTime<Utc>,
    },
    WishDeleted {
        wish_id: String,
        at: DateTime<Utc>,
    },
    WishLiked {
        wish_id: String,
        likes: u32,
        at: DateTime<Utc>,
    },
    WishUnliked {
        wish_id: String,
        likes: u32,
        at: DateTime<Utc>,
    },
    ReviewSubmitted {
        review_id: String,
        wish_id: String,
        achievement_status: AchievementStatus,
        wish_status: WishStatus,
        at: DateTime<Utc>,
    },
    /// The review queue reached its terminal state.
    QueueCompleted {
        reviewed: usize,
        success_rate_pct: u32,
        at: DateTime<Utc>,
    },
    ReminderScheduled {
        reminder_id: String,
        fire_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    ReminderCancelled {
        reminder_id: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn wish_created(wish: &WishEntry) -> Self {
        Event::WishCreated {
            wish_id: wish.id.clone(),
            target_date: wish.target_date,
            at: Utc::now(),
        }
    }

    pub fn wish_updated(wish: &WishEntry) -> Self {
        Event::WishUpdated {
            wish_id: wish.id.clone(),
            at: Utc::now(),
        }
    }

    pub fn wish_deleted(wish_id: &str) -> Self {
        Event::WishDeleted {
            wish_id: wish_id.to_string(),
            at: Utc::now(),
        }
    }

    pub fn like_toggled(wish: &WishEntry) -> Self {
        if wish.is_liked {
            Event::WishLiked {
                wish_id: wish.id.clone(),
                likes: wish.likes,
                at: Utc::now(),
            }
        } else {
            Event::WishUnliked {
                wish_id: wish.id.clone(),
                likes: wish.likes,
                at: Utc::now(),
            }
        }
    }
}
