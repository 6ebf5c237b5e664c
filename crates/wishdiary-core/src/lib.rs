//! # Wish Diary Core Library
//!
//! This library provides the core business logic for Wish Diary: record a
//! short-term goal, wait one week, then review whether it was achieved.
//! It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any GUI being a thin layer
//! over the same core library.
//!
//! ## Architecture
//!
//! - **Wish lifecycle**: entity model with creation-time clamping and
//!   advisory validation; `pending` is the only non-terminal status
//! - **Review workflow**: a cursor state machine over the
//!   reviewable-but-unreviewed queue; each submission persists the review
//!   and the status-updated wish in one transaction
//! - **Storage**: SQLite with one row per entity and TOML-based
//!   configuration
//! - **Reminders**: a durable ledger of review/daily reminders; platform
//!   delivery is out of scope
//! - **Auth**: local mock provider with a subscription interface for
//!   state changes
//!
//! ## Key Components
//!
//! - [`WishEntry`] / [`WishDraft`]: the wish entity and its builder
//! - [`AchievementReview`]: the one-time review attached to a wish
//! - [`ReviewWorkflow`]: storage-backed review queue driver
//! - [`DiaryDb`]: entity persistence and statistics
//! - [`Config`]: application configuration management

pub mod auth;
pub mod dates;
pub mod error;
pub mod events;
pub mod profile;
pub mod remind;
pub mod review;
pub mod storage;
pub mod wish;
pub mod workflow;

pub use auth::{AuthService, AuthUser, Subscription};
pub use error::{AuthError, ConfigError, CoreError, StorageError, ValidationError, WorkflowError};
pub use events::Event;
pub use profile::{Language, Theme, UserPreferences, UserProfile};
pub use remind::{LocalReminderScheduler, Reminder, ReminderKind, ReminderScheduler};
pub use review::{
    submit_review, AchievementReview, AchievementStatus, EmotionalState, ReviewOutcome,
};
pub use storage::{Config, DiaryDb, DiaryStats};
pub use wish::{Priority, WishCategory, WishDraft, WishEntry, WishStatus};
pub use workflow::{
    list_reviewable_wishes, success_rate_pct, QueueState, QueueSummary, ReviewQueue,
    ReviewWorkflow, SubmitResult,
};
