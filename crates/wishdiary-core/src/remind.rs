//! Review and daily reminders.
//!
//! The core never delivers notifications -- that is the platform layer's
//! job. It keeps a durable ledger of what should fire and when: one
//! reminder per wish at its target date, plus an optional daily reminder.
//! Wish creation schedules, wish deletion cancels, and `due_reminders`
//! answers "what should have fired by now". Scheduling failures never
//! block the operation that triggered them.

use chrono::{DateTime, NaiveTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CoreError, StorageError};
use crate::review::random_review_encouragement;
use crate::storage::{DiaryDb, NotificationsConfig};

/// Reminder id prefix for per-wish review reminders.
pub const REVIEW_REMINDER_PREFIX: &str = "review_";
/// Fixed id of the daily reminder.
pub const DAILY_REMINDER_ID: &str = "daily";

/// What a reminder is for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Daily,
    Review,
}

/// A scheduled reminder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: String,
    pub kind: ReminderKind,
    /// Set for review reminders
    pub wish_id: Option<String>,
    pub fire_at: DateTime<Utc>,
    pub body: String,
    /// Set once the platform layer has delivered it
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

/// Scheduler contract consumed by wish creation and deletion.
///
/// The core calls `schedule_review_reminder` once per wish creation and
/// does not depend on its success; `cancel_review_reminder` runs on wish
/// deletion and is a no-op for unknown wishes.
pub trait ReminderScheduler {
    fn schedule_review_reminder(
        &self,
        wish_id: &str,
        target_date: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    fn cancel_review_reminder(&self, wish_id: &str) -> Result<(), StorageError>;
}

/// Scheduler backed by the diary database.
pub struct LocalReminderScheduler<'a> {
    db: &'a DiaryDb,
    config: NotificationsConfig,
}

impl<'a> LocalReminderScheduler<'a> {
    pub fn new(db: &'a DiaryDb, config: NotificationsConfig) -> Self {
        LocalReminderScheduler { db, config }
    }

    /// Schedule (or reschedule) the daily reminder at the configured
    /// wall-clock time: the next occurrence after `now`.
    pub fn schedule_daily_reminder(&self, now: DateTime<Utc>) -> Result<Reminder, CoreError> {
        let fire_at = next_daily_occurrence(now, &self.config.daily_reminder_time)?;
        let reminder = Reminder {
            id: DAILY_REMINDER_ID.to_string(),
            kind: ReminderKind::Daily,
            wish_id: None,
            fire_at,
            body: random_daily_message().to_string(),
            acknowledged: false,
            created_at: now,
        };
        self.db.save_reminder(&reminder)?;
        Ok(reminder)
    }

    /// Cancel the daily reminder. Returns whether one existed.
    pub fn cancel_daily_reminder(&self) -> Result<bool, StorageError> {
        self.db.delete_reminder(DAILY_REMINDER_ID)
    }

    /// Reminders that should have fired by `now` and are not yet
    /// acknowledged.
    pub fn due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, StorageError> {
        self.db.due_reminders(now)
    }

    /// Mark a reminder delivered.
    pub fn acknowledge(&self, id: &str) -> Result<bool, StorageError> {
        self.db.acknowledge_reminder(id)
    }

    /// Every scheduled reminder, soonest first.
    pub fn list(&self) -> Result<Vec<Reminder>, StorageError> {
        self.db.list_reminders()
    }

    fn review_reminder_id(wish_id: &str) -> String {
        format!("{REVIEW_REMINDER_PREFIX}{wish_id}")
    }
}

impl ReminderScheduler for LocalReminderScheduler<'_> {
    fn schedule_review_reminder(
        &self,
        wish_id: &str,
        target_date: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        if !self.config.enabled || !self.config.review_reminders_enabled {
            return Ok(());
        }
        let reminder = Reminder {
            id: Self::review_reminder_id(wish_id),
            kind: ReminderKind::Review,
            wish_id: Some(wish_id.to_string()),
            fire_at: target_date,
            body: random_review_encouragement().to_string(),
            acknowledged: false,
            created_at: Utc::now(),
        };
        self.db.save_reminder(&reminder)
    }

    fn cancel_review_reminder(&self, wish_id: &str) -> Result<(), StorageError> {
        self.db.delete_reminder(&Self::review_reminder_id(wish_id))?;
        Ok(())
    }
}

/// The next instant after `now` at the given "HH:MM" UTC wall-clock time.
fn next_daily_occurrence(now: DateTime<Utc>, time: &str) -> Result<DateTime<Utc>, ConfigError> {
    let parsed =
        NaiveTime::parse_from_str(&format!("{time}:00"), "%H:%M:%S").map_err(|_| {
            ConfigError::InvalidValue {
                key: "notifications.daily_reminder_time".to_string(),
                message: format!("'{time}' is not an HH:MM time"),
            }
        })?;

    let today = now.date_naive().and_time(parsed).and_utc();
    if today > now {
        Ok(today)
    } else {
        Ok(today + chrono::Duration::days(1))
    }
}

const DAILY_MESSAGES: &[&str] = &[
    "What small wish would make this week better?",
    "Take a minute: write down one goal for the next seven days.",
    "Your diary is waiting -- record today's wish.",
];

fn random_daily_message() -> &'static str {
    DAILY_MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(DAILY_MESSAGES[0])
}
