//! SQLite-based diary storage.
//!
//! One row per entity, keyed by id -- wishes, reviews, user profiles,
//! auth accounts, and reminders each get their own table, plus a
//! key-value table for application state. Review submission writes the
//! review and the status-updated wish in a single transaction, and a
//! UNIQUE constraint on `reviews.wish_entry_id` enforces at most one
//! review per wish at the data layer.
//!
//! A JSON import/export pair speaks the mobile app's legacy storage
//! shape: `{"wishes": [...], "reviews": [...]}` with ISO-8601 date
//! strings.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::auth::AuthAccount;
use crate::error::{CoreError, StorageError};
use crate::profile::{UserPreferences, UserProfile};
use crate::remind::{Reminder, ReminderKind};
use crate::review::{AchievementReview, AchievementStatus, EmotionalState};
use crate::wish::{Priority, WishCategory, WishEntry, WishStatus};

// === Helper functions ===

/// Parse a wish status from its stored string.
fn parse_wish_status(s: &str) -> WishStatus {
    match s {
        "achieved" => WishStatus::Achieved,
        "partially_achieved" => WishStatus::PartiallyAchieved,
        "not_achieved" => WishStatus::NotAchieved,
        _ => WishStatus::Pending,
    }
}

/// Format a wish status for storage.
fn format_wish_status(status: WishStatus) -> &'static str {
    match status {
        WishStatus::Pending => "pending",
        WishStatus::Achieved => "achieved",
        WishStatus::PartiallyAchieved => "partially_achieved",
        WishStatus::NotAchieved => "not_achieved",
    }
}

/// Parse a wish category from its stored string.
fn parse_category(s: &str) -> WishCategory {
    match s {
        "career" => WishCategory::Career,
        "health" => WishCategory::Health,
        "relationships" => WishCategory::Relationships,
        "learning" => WishCategory::Learning,
        "creativity" => WishCategory::Creativity,
        _ => WishCategory::PersonalGrowth,
    }
}

/// Format a wish category for storage.
fn format_category(category: WishCategory) -> &'static str {
    match category {
        WishCategory::PersonalGrowth => "personal_growth",
        WishCategory::Career => "career",
        WishCategory::Health => "health",
        WishCategory::Relationships => "relationships",
        WishCategory::Learning => "learning",
        WishCategory::Creativity => "creativity",
    }
}

/// Parse a priority from its stored string.
fn parse_priority(s: &str) -> Priority {
    match s {
        "low" => Priority::Low,
        "high" => Priority::High,
        _ => Priority::Medium,
    }
}

/// Format a priority for storage.
fn format_priority(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

/// Parse an achievement status from its stored string.
fn parse_achievement_status(s: &str) -> AchievementStatus {
    match s {
        "fully_achieved" => AchievementStatus::FullyAchieved,
        "partially_achieved" => AchievementStatus::PartiallyAchieved,
        "not_achieved" => AchievementStatus::NotAchieved,
        _ => AchievementStatus::InProgress,
    }
}

/// Format an achievement status for storage.
fn format_achievement_status(status: AchievementStatus) -> &'static str {
    match status {
        AchievementStatus::FullyAchieved => "fully_achieved",
        AchievementStatus::PartiallyAchieved => "partially_achieved",
        AchievementStatus::InProgress => "in_progress",
        AchievementStatus::NotAchieved => "not_achieved",
    }
}

/// Parse an emotional state from its stored string.
fn parse_emotional_state(s: &str) -> EmotionalState {
    match s {
        "proud" => EmotionalState::Proud,
        "motivated" => EmotionalState::Motivated,
        "disappointed" => EmotionalState::Disappointed,
        "determined" => EmotionalState::Determined,
        _ => EmotionalState::Satisfied,
    }
}

/// Format an emotional state for storage.
fn format_emotional_state(state: EmotionalState) -> &'static str {
    match state {
        EmotionalState::Proud => "proud",
        EmotionalState::Satisfied => "satisfied",
        EmotionalState::Motivated => "motivated",
        EmotionalState::Disappointed => "disappointed",
        EmotionalState::Determined => "determined",
    }
}

/// Parse a reminder kind from its stored string.
fn parse_reminder_kind(s: &str) -> ReminderKind {
    match s {
        "review" => ReminderKind::Review,
        _ => ReminderKind::Daily,
    }
}

/// Format a reminder kind for storage.
fn format_reminder_kind(kind: ReminderKind) -> &'static str {
    match kind {
        ReminderKind::Daily => "daily",
        ReminderKind::Review => "review",
    }
}

/// Parse an RFC 3339 timestamp with fallback to the current time.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a JSON string-list column with fallback to empty.
fn parse_string_list(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

fn format_string_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Build a WishEntry from a database row.
fn row_to_wish(row: &rusqlite::Row) -> Result<WishEntry, rusqlite::Error> {
    let status: String = row.get(7)?;
    let category: String = row.get(8)?;
    let priority: String = row.get(9)?;
    let tags: String = row.get(13)?;
    let specific_actions: String = row.get(14)?;

    Ok(WishEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        target_date: parse_datetime_fallback(&row.get::<_, String>(4)?),
        created_at: parse_datetime_fallback(&row.get::<_, String>(5)?),
        updated_at: parse_datetime_fallback(&row.get::<_, String>(6)?),
        status: parse_wish_status(&status),
        category: parse_category(&category),
        priority: parse_priority(&priority),
        motivation_level: row.get(10)?,
        likes: row.get(11)?,
        is_liked: row.get(12)?,
        tags: parse_string_list(&tags),
        specific_actions: parse_string_list(&specific_actions),
        success_criteria: row.get(15)?,
        focus_time_secs: row.get(16)?,
    })
}

const WISH_COLUMNS: &str = "id, user_id, title, content, target_date, created_at, updated_at, \
     status, category, priority, motivation_level, likes, is_liked, tags, \
     specific_actions, success_criteria, focus_time_secs";

/// Build an AchievementReview from a database row.
fn row_to_review(row: &rusqlite::Row) -> Result<AchievementReview, rusqlite::Error> {
    let status: String = row.get(3)?;
    let emotional: String = row.get(11)?;

    Ok(AchievementReview {
        id: row.get(0)?,
        wish_entry_id: row.get(1)?,
        user_id: row.get(2)?,
        achievement_status: parse_achievement_status(&status),
        achievement_percentage: row.get(4)?,
        reflection: row.get(5)?,
        celebration_moment: row.get(6)?,
        lessons_learned: parse_string_list(&row.get::<_, String>(7)?),
        improvement_areas: parse_string_list(&row.get::<_, String>(8)?),
        next_goals: parse_string_list(&row.get::<_, String>(9)?),
        gratitude_notes: parse_string_list(&row.get::<_, String>(10)?),
        emotional_state_after: parse_emotional_state(&emotional),
        created_at: parse_datetime_fallback(&row.get::<_, String>(12)?),
    })
}

const REVIEW_COLUMNS: &str = "id, wish_entry_id, user_id, achievement_status, \
     achievement_percentage, reflection, celebration_moment, lessons_learned, \
     improvement_areas, next_goals, gratitude_notes, emotional_state_after, created_at";

/// Build a Reminder from a database row.
fn row_to_reminder(row: &rusqlite::Row) -> Result<Reminder, rusqlite::Error> {
    let kind: String = row.get(1)?;
    Ok(Reminder {
        id: row.get(0)?,
        kind: parse_reminder_kind(&kind),
        wish_id: row.get(2)?,
        fire_at: parse_datetime_fallback(&row.get::<_, String>(3)?),
        body: row.get(4)?,
        acknowledged: row.get(5)?,
        created_at: parse_datetime_fallback(&row.get::<_, String>(6)?),
    })
}

const REMINDER_COLUMNS: &str = "id, kind, wish_id, fire_at, body, acknowledged, created_at";

/// Aggregate statistics over the diary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiaryStats {
    pub total_wishes: u64,
    pub pending: u64,
    pub achieved: u64,
    pub partially_achieved: u64,
    pub not_achieved: u64,
    pub total_likes: u64,
    pub total_reviews: u64,
    /// Success rate over all reviews, rounded to whole percent
    pub success_rate_pct: u32,
}

/// Result of a legacy JSON import.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportSummary {
    pub wishes: usize,
    pub reviews: usize,
    /// Reviews skipped because their wish already had one
    pub skipped_reviews: usize,
}

/// The legacy storage shape: one JSON document per collection key.
#[derive(Debug, Serialize, Deserialize, Default)]
struct DiarySnapshot {
    #[serde(default)]
    wishes: Vec<WishEntry>,
    #[serde(default)]
    reviews: Vec<AchievementReview>,
}

/// SQLite database for the wish diary.
pub struct DiaryDb {
    conn: Connection,
}

impl DiaryDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/wishdiary/wishdiary.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("wishdiary.db");
        let conn = Connection::open(&path)
            .map_err(|source| StorageError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS wishes (
                    id               TEXT PRIMARY KEY,
                    user_id          TEXT NOT NULL,
                    title            TEXT NOT NULL,
                    content          TEXT NOT NULL,
                    target_date      TEXT NOT NULL,
                    created_at       TEXT NOT NULL,
                    updated_at       TEXT NOT NULL,
                    status           TEXT NOT NULL DEFAULT 'pending',
                    category         TEXT NOT NULL DEFAULT 'personal_growth',
                    priority         TEXT NOT NULL DEFAULT 'medium',
                    motivation_level INTEGER NOT NULL DEFAULT 5,
                    likes            INTEGER NOT NULL DEFAULT 0,
                    is_liked         INTEGER NOT NULL DEFAULT 0,
                    tags             TEXT NOT NULL DEFAULT '[]',
                    specific_actions TEXT NOT NULL DEFAULT '[]',
                    success_criteria TEXT NOT NULL DEFAULT '',
                    focus_time_secs  INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS reviews (
                    id                     TEXT PRIMARY KEY,
                    wish_entry_id          TEXT NOT NULL UNIQUE,
                    user_id                TEXT NOT NULL,
                    achievement_status     TEXT NOT NULL,
                    achievement_percentage INTEGER NOT NULL,
                    reflection             TEXT NOT NULL DEFAULT '',
                    celebration_moment     TEXT NOT NULL DEFAULT '',
                    lessons_learned        TEXT NOT NULL DEFAULT '[]',
                    improvement_areas      TEXT NOT NULL DEFAULT '[]',
                    next_goals             TEXT NOT NULL DEFAULT '[]',
                    gratitude_notes        TEXT NOT NULL DEFAULT '[]',
                    emotional_state_after  TEXT NOT NULL,
                    created_at             TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS users (
                    id            TEXT PRIMARY KEY,
                    nickname      TEXT NOT NULL,
                    description   TEXT NOT NULL DEFAULT '',
                    preferences   TEXT NOT NULL DEFAULT '{}',
                    created_at    TEXT NOT NULL,
                    last_login_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS auth_users (
                    uid             TEXT PRIMARY KEY,
                    email           TEXT NOT NULL UNIQUE,
                    password_digest TEXT NOT NULL,
                    display_name    TEXT NOT NULL,
                    created_at      TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS reminders (
                    id           TEXT PRIMARY KEY,
                    kind         TEXT NOT NULL,
                    wish_id      TEXT,
                    fire_at      TEXT NOT NULL,
                    body         TEXT NOT NULL DEFAULT '',
                    acknowledged INTEGER NOT NULL DEFAULT 0,
                    created_at   TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                -- Indexes for common query patterns
                CREATE INDEX IF NOT EXISTS idx_wishes_user ON wishes(user_id);
                CREATE INDEX IF NOT EXISTS idx_wishes_created_at ON wishes(created_at);
                CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews(user_id);
                CREATE INDEX IF NOT EXISTS idx_reminders_fire_at ON reminders(fire_at);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    // === Wishes ===

    /// Insert or replace a wish row.
    pub fn save_wish(&self, wish: &WishEntry) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO wishes (id, user_id, title, content, target_date,
                created_at, updated_at, status, category, priority, motivation_level,
                likes, is_liked, tags, specific_actions, success_criteria, focus_time_secs)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                wish.id,
                wish.user_id,
                wish.title,
                wish.content,
                wish.target_date.to_rfc3339(),
                wish.created_at.to_rfc3339(),
                wish.updated_at.to_rfc3339(),
                format_wish_status(wish.status),
                format_category(wish.category),
                format_priority(wish.priority),
                wish.motivation_level,
                wish.likes,
                wish.is_liked,
                format_string_list(&wish.tags),
                format_string_list(&wish.specific_actions),
                wish.success_criteria,
                wish.focus_time_secs,
            ],
        )?;
        Ok(())
    }

    /// Update an existing wish row.
    ///
    /// # Errors
    /// Returns `WishNotFound` if no row has the wish's id.
    pub fn update_wish(&self, wish: &WishEntry) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE wishes SET user_id = ?2, title = ?3, content = ?4, target_date = ?5,
                created_at = ?6, updated_at = ?7, status = ?8, category = ?9, priority = ?10,
                motivation_level = ?11, likes = ?12, is_liked = ?13, tags = ?14,
                specific_actions = ?15, success_criteria = ?16, focus_time_secs = ?17
             WHERE id = ?1",
            params![
                wish.id,
                wish.user_id,
                wish.title,
                wish.content,
                wish.target_date.to_rfc3339(),
                wish.created_at.to_rfc3339(),
                wish.updated_at.to_rfc3339(),
                format_wish_status(wish.status),
                format_category(wish.category),
                format_priority(wish.priority),
                wish.motivation_level,
                wish.likes,
                wish.is_liked,
                format_string_list(&wish.tags),
                format_string_list(&wish.specific_actions),
                wish.success_criteria,
                wish.focus_time_secs,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::WishNotFound {
                id: wish.id.clone(),
            });
        }
        Ok(())
    }

    /// Look up a wish by id. Absent ids are `Ok(None)`.
    pub fn get_wish(&self, id: &str) -> Result<Option<WishEntry>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {WISH_COLUMNS} FROM wishes WHERE id = ?1"))?;
        Ok(stmt.query_row(params![id], row_to_wish).optional()?)
    }

    /// All wishes in creation order.
    pub fn list_wishes(&self) -> Result<Vec<WishEntry>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WISH_COLUMNS} FROM wishes ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map([], row_to_wish)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// All wishes owned by `user_id`, in creation order.
    pub fn list_wishes_for_user(&self, user_id: &str) -> Result<Vec<WishEntry>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WISH_COLUMNS} FROM wishes WHERE user_id = ?1 ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map(params![user_id], row_to_wish)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete a wish row. Returns whether a row was removed.
    pub fn delete_wish(&self, id: &str) -> Result<bool, StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM wishes WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // === Reviews ===

    /// Insert a review row.
    ///
    /// # Errors
    /// Returns `ReviewAlreadyExists` if the wish already has a review.
    pub fn save_review(&self, review: &AchievementReview) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT INTO reviews (id, wish_entry_id, user_id, achievement_status,
                    achievement_percentage, reflection, celebration_moment, lessons_learned,
                    improvement_areas, next_goals, gratitude_notes, emotional_state_after,
                    created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    review.id,
                    review.wish_entry_id,
                    review.user_id,
                    format_achievement_status(review.achievement_status),
                    review.achievement_percentage,
                    review.reflection,
                    review.celebration_moment,
                    format_string_list(&review.lessons_learned),
                    format_string_list(&review.improvement_areas),
                    format_string_list(&review.next_goals),
                    format_string_list(&review.gratitude_notes),
                    format_emotional_state(review.emotional_state_after),
                    review.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| map_review_conflict(e, &review.wish_entry_id))?;
        Ok(())
    }

    /// Look up a review by id.
    pub fn get_review(&self, id: &str) -> Result<Option<AchievementReview>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?1"
        ))?;
        Ok(stmt.query_row(params![id], row_to_review).optional()?)
    }

    /// The review attached to a wish, if any.
    pub fn review_for_wish(
        &self,
        wish_id: &str,
    ) -> Result<Option<AchievementReview>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE wish_entry_id = ?1"
        ))?;
        Ok(stmt.query_row(params![wish_id], row_to_review).optional()?)
    }

    /// All reviews in submission order.
    pub fn list_reviews(&self) -> Result<Vec<AchievementReview>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map([], row_to_review)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// All reviews submitted by `user_id`.
    pub fn list_reviews_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<AchievementReview>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE user_id = ?1 ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map(params![user_id], row_to_review)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Persist a review and the status-updated wish in one transaction.
    ///
    /// Either both writes land or neither does. The wish row must exist.
    ///
    /// # Errors
    /// `ReviewAlreadyExists` if the wish already has a review,
    /// `WishNotFound` if the wish row is missing; both leave the store
    /// untouched.
    pub fn submit_review_atomic(
        &self,
        review: &AchievementReview,
        wish: &WishEntry,
    ) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO reviews (id, wish_entry_id, user_id, achievement_status,
                achievement_percentage, reflection, celebration_moment, lessons_learned,
                improvement_areas, next_goals, gratitude_notes, emotional_state_after,
                created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                review.id,
                review.wish_entry_id,
                review.user_id,
                format_achievement_status(review.achievement_status),
                review.achievement_percentage,
                review.reflection,
                review.celebration_moment,
                format_string_list(&review.lessons_learned),
                format_string_list(&review.improvement_areas),
                format_string_list(&review.next_goals),
                format_string_list(&review.gratitude_notes),
                format_emotional_state(review.emotional_state_after),
                review.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| map_review_conflict(e, &review.wish_entry_id))?;

        let changed = tx.execute(
            "UPDATE wishes SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![
                wish.id,
                format_wish_status(wish.status),
                wish.updated_at.to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            // Dropping the transaction rolls back the review insert.
            return Err(StorageError::WishNotFound {
                id: wish.id.clone(),
            });
        }

        tx.commit()?;
        Ok(())
    }

    // === User profiles ===

    /// Insert or replace a user profile row.
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let preferences = serde_json::to_string(&profile.preferences)
            .map_err(|e| StorageError::DecodeFailed(e.to_string()))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO users (id, nickname, description, preferences,
                created_at, last_login_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                profile.id,
                profile.nickname,
                profile.description,
                preferences,
                profile.created_at.to_rfc3339(),
                profile.last_login_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up a profile by user id.
    pub fn get_profile(&self, id: &str) -> Result<Option<UserProfile>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, nickname, description, preferences, created_at, last_login_at
             FROM users WHERE id = ?1",
        )?;
        let row = stmt
            .query_row(params![id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .optional()?;

        Ok(row.map(
            |(id, nickname, description, preferences, created_at, last_login_at)| {
                let preferences: UserPreferences =
                    serde_json::from_str(&preferences).unwrap_or_default();
                UserProfile {
                    id,
                    nickname,
                    description,
                    preferences,
                    created_at: parse_datetime_fallback(&created_at),
                    last_login_at: parse_datetime_fallback(&last_login_at),
                }
            },
        ))
    }

    /// Fetch the profile for a user, creating a default one if absent.
    pub fn get_or_create_profile(
        &self,
        id: &str,
        nickname: &str,
    ) -> Result<UserProfile, StorageError> {
        if let Some(profile) = self.get_profile(id)? {
            return Ok(profile);
        }
        let profile = UserProfile::new(id, nickname);
        self.save_profile(&profile)?;
        Ok(profile)
    }

    // === Auth accounts ===

    /// Insert an auth account row.
    pub fn save_auth_account(&self, account: &AuthAccount) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO auth_users (uid, email, password_digest, display_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                account.uid,
                account.email,
                account.password_digest,
                account.display_name,
                account.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up an auth account by email.
    pub fn auth_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AuthAccount>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT uid, email, password_digest, display_name, created_at
             FROM auth_users WHERE email = ?1",
        )?;
        Ok(stmt
            .query_row(params![email], |row| {
                Ok(AuthAccount {
                    uid: row.get(0)?,
                    email: row.get(1)?,
                    password_digest: row.get(2)?,
                    display_name: row.get(3)?,
                    created_at: parse_datetime_fallback(&row.get::<_, String>(4)?),
                })
            })
            .optional()?)
    }

    // === Reminders ===

    /// Insert or replace a reminder row.
    pub fn save_reminder(&self, reminder: &Reminder) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO reminders (id, kind, wish_id, fire_at, body,
                acknowledged, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                reminder.id,
                format_reminder_kind(reminder.kind),
                reminder.wish_id,
                reminder.fire_at.to_rfc3339(),
                reminder.body,
                reminder.acknowledged,
                reminder.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up a reminder by id.
    pub fn get_reminder(&self, id: &str) -> Result<Option<Reminder>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?1"
        ))?;
        Ok(stmt.query_row(params![id], row_to_reminder).optional()?)
    }

    /// All reminders, soonest first.
    pub fn list_reminders(&self) -> Result<Vec<Reminder>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders ORDER BY fire_at, id"
        ))?;
        let rows = stmt.query_map([], row_to_reminder)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Unacknowledged reminders whose fire time has passed.
    pub fn due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders
             WHERE acknowledged = 0 AND fire_at <= ?1 ORDER BY fire_at, id"
        ))?;
        let rows = stmt.query_map(params![now.to_rfc3339()], row_to_reminder)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Mark a reminder delivered. Returns whether a row changed.
    pub fn acknowledge_reminder(&self, id: &str) -> Result<bool, StorageError> {
        let changed = self.conn.execute(
            "UPDATE reminders SET acknowledged = 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a reminder row. Missing ids are a no-op.
    pub fn delete_reminder(&self, id: &str) -> Result<bool, StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM reminders WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // === Key-value store ===

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        Ok(stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    // === Statistics ===

    /// Aggregate counts and the overall success rate.
    pub fn stats(&self) -> Result<DiaryStats, StorageError> {
        let mut stats = DiaryStats::default();

        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*), COALESCE(SUM(likes), 0) FROM wishes GROUP BY status",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;
        for row in rows {
            let (status, count, likes) = row?;
            stats.total_wishes += count;
            stats.total_likes += likes;
            match status.as_str() {
                "achieved" => stats.achieved += count,
                "partially_achieved" => stats.partially_achieved += count,
                "not_achieved" => stats.not_achieved += count,
                _ => stats.pending += count,
            }
        }

        let (total, successful) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(achievement_status IN ('fully_achieved', 'partially_achieved')), 0)
             FROM reviews",
            [],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        stats.total_reviews = total;
        if total > 0 {
            stats.success_rate_pct = (successful as f64 / total as f64 * 100.0).round() as u32;
        }

        Ok(stats)
    }

    // === Legacy JSON interchange ===

    /// Export every wish and review in the mobile app's storage shape.
    pub fn export_json(&self) -> Result<String, CoreError> {
        let snapshot = DiarySnapshot {
            wishes: self.list_wishes()?,
            reviews: self.list_reviews()?,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Import a legacy JSON document.
    ///
    /// Wishes are upserted by id. Reviews whose wish already has a
    /// different review are skipped and counted rather than aborting the
    /// import halfway.
    pub fn import_json(&self, json: &str) -> Result<ImportSummary, CoreError> {
        let snapshot: DiarySnapshot = serde_json::from_str(json)?;
        let mut summary = ImportSummary::default();

        for wish in &snapshot.wishes {
            self.save_wish(wish)?;
            summary.wishes += 1;
        }
        for review in &snapshot.reviews {
            match self.review_for_wish(&review.wish_entry_id)? {
                Some(existing) if existing.id != review.id => summary.skipped_reviews += 1,
                Some(_) => {
                    // Same id: refresh in place.
                    self.conn.execute(
                        "DELETE FROM reviews WHERE id = ?1",
                        params![review.id],
                    ).map_err(StorageError::from)?;
                    self.save_review(review)?;
                    summary.reviews += 1;
                }
                None => {
                    self.save_review(review)?;
                    summary.reviews += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Map a UNIQUE violation on `reviews.wish_entry_id` to the typed error.
fn map_review_conflict(err: rusqlite::Error, wish_id: &str) -> StorageError {
    match StorageError::from(err) {
        StorageError::ConstraintViolated(msg) if msg.contains("wish_entry_id") => {
            StorageError::ReviewAlreadyExists {
                wish_id: wish_id.to_string(),
            }
        }
        other => other,
    }
}
