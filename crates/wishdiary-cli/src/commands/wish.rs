//! Wish management commands for CLI.

use clap::Subcommand;
use wishdiary_core::dates::{days_until_target, format_relative_time};
use wishdiary_core::storage::{Config, DiaryDb};
use wishdiary_core::wish::random_encouragement;
use wishdiary_core::{
    AuthService, Event, LocalReminderScheduler, ReminderScheduler, ValidationError, WishDraft,
};

use super::{parse_category, parse_list, parse_priority, parse_status};

#[derive(Subcommand)]
pub enum WishAction {
    /// Record a new wish (target date is one week out)
    Create {
        /// Wish title
        title: String,
        /// Wish content
        content: String,
        /// Category: personal_growth, career, health, relationships, learning, creativity
        #[arg(long, default_value = "personal_growth")]
        category: String,
        /// Priority: low, medium, high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Motivation level, 1-10
        #[arg(long, default_value = "5")]
        motivation: i32,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Comma-separated planned actions
        #[arg(long)]
        actions: Option<String>,
        /// What success looks like
        #[arg(long)]
        success_criteria: Option<String>,
        /// Seconds spent in the pre-recording focus timer
        #[arg(long, default_value = "0")]
        focus_time: i64,
    },
    /// List wishes
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Include every user's wishes, not just the signed-in user's
        #[arg(long)]
        all_users: bool,
    },
    /// Get wish details
    Get {
        /// Wish ID
        id: String,
    },
    /// Update a wish
    Update {
        /// Wish ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New content
        #[arg(long)]
        content: Option<String>,
        /// New success criteria
        #[arg(long)]
        success_criteria: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a wish
    Delete {
        /// Wish ID
        id: String,
    },
    /// Toggle the self-like on a wish
    Like {
        /// Wish ID
        id: String,
    },
}

pub fn run(action: WishAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = DiaryDb::open()?;

    match action {
        WishAction::Create {
            title,
            content,
            category,
            priority,
            motivation,
            tags,
            actions,
            success_criteria,
            focus_time,
        } => {
            let auth = AuthService::initialize(&db)?;
            let user = auth.require_user()?;

            let mut draft = WishDraft::new(title, content, parse_category(&category)?);
            draft.priority = parse_priority(&priority)?;
            draft.motivation_level = motivation;
            draft.tags = tags.as_deref().map(parse_list).unwrap_or_default();
            draft.specific_actions = actions.as_deref().map(parse_list).unwrap_or_default();
            draft.success_criteria = success_criteria.unwrap_or_default();
            draft.focus_time_secs = focus_time;

            let errors = draft.validate();
            if !errors.is_empty() {
                return Err(ValidationError { errors }.into());
            }

            let wish = draft.build(&user.uid);
            db.save_wish(&wish)?;

            // The wish is saved either way; a reminder failure is only a warning.
            let config = Config::load_or_default();
            let scheduler = LocalReminderScheduler::new(&db, config.notifications);
            if let Err(e) = scheduler.schedule_review_reminder(&wish.id, wish.target_date) {
                eprintln!("warning: could not schedule review reminder: {e}");
            }

            println!("Wish created: {}", wish.id);
            println!("{}", serde_json::to_string_pretty(&wish)?);
        }
        WishAction::List {
            status,
            category,
            all_users,
        } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let category = category.as_deref().map(parse_category).transpose()?;

            let all_wishes = if all_users {
                db.list_wishes()?
            } else {
                let auth = AuthService::initialize(&db)?;
                let user = auth.require_user()?;
                db.list_wishes_for_user(&user.uid)?
            };

            let filtered: Vec<_> = all_wishes
                .into_iter()
                .filter(|wish| {
                    if let Some(s) = status {
                        if wish.status != s {
                            return false;
                        }
                    }
                    if let Some(c) = category {
                        if wish.category != c {
                            return false;
                        }
                    }
                    true
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        WishAction::Get { id } => match db.get_wish(&id)? {
            Some(wish) => {
                println!("{}", serde_json::to_string_pretty(&wish)?);
                let now = chrono::Utc::now();
                println!("Recorded {}", format_relative_time(wish.created_at, now));
                let days = days_until_target(wish.target_date, now);
                if days < 0 {
                    println!("Review was due {} day(s) ago", -days);
                } else if days == 0 {
                    println!("Review is due today");
                } else {
                    println!("{days} day(s) until review");
                }
            }
            None => println!("Wish not found: {id}"),
        },
        WishAction::Update {
            id,
            title,
            content,
            success_criteria,
            priority,
            category,
            tags,
        } => {
            let mut wish = db.get_wish(&id)?.ok_or(format!("Wish not found: {id}"))?;

            if let Some(t) = title {
                wish.title = t.trim().to_string();
            }
            if let Some(c) = content {
                wish.content = c.trim().to_string();
            }
            if let Some(s) = success_criteria {
                wish.success_criteria = s.trim().to_string();
            }
            if let Some(p) = priority {
                wish.priority = parse_priority(&p)?;
            }
            if let Some(c) = category {
                wish.category = parse_category(&c)?;
            }
            if let Some(t) = tags {
                wish.tags = parse_list(&t).into_iter().filter(|s| !s.is_empty()).collect();
            }

            let errors = wish.validation_errors();
            if !errors.is_empty() {
                return Err(ValidationError { errors }.into());
            }

            wish.updated_at = chrono::Utc::now();
            db.update_wish(&wish)?;
            println!("Wish updated:");
            println!("{}", serde_json::to_string_pretty(&wish)?);
        }
        WishAction::Delete { id } => {
            if db.delete_wish(&id)? {
                let config = Config::load_or_default();
                let scheduler = LocalReminderScheduler::new(&db, config.notifications);
                scheduler.cancel_review_reminder(&id)?;
                println!("{}", serde_json::to_string_pretty(&Event::wish_deleted(&id))?);
            } else {
                println!("Wish not found: {id}");
            }
        }
        WishAction::Like { id } => {
            let mut wish = db.get_wish(&id)?.ok_or(format!("Wish not found: {id}"))?;
            let liked = wish.toggle_like();
            db.update_wish(&wish)?;

            if liked {
                println!("{}", random_encouragement());
            }
            println!("{}", serde_json::to_string_pretty(&Event::like_toggled(&wish))?);
        }
    }
    Ok(())
}
