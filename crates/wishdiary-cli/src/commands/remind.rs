//! Reminder commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use wishdiary_core::storage::{Config, DiaryDb};
use wishdiary_core::LocalReminderScheduler;

#[derive(Subcommand)]
pub enum RemindAction {
    /// List every scheduled reminder
    List,
    /// Show reminders that should have fired by now
    Due,
    /// Mark a reminder as delivered
    Ack {
        /// Reminder ID
        id: String,
    },
    /// Schedule the daily reminder at the configured time
    ScheduleDaily,
    /// Cancel the daily reminder
    CancelDaily,
}

pub fn run(action: RemindAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = DiaryDb::open()?;
    let config = Config::load_or_default();
    let scheduler = LocalReminderScheduler::new(&db, config.notifications);

    match action {
        RemindAction::List => {
            let reminders = scheduler.list()?;
            println!("{}", serde_json::to_string_pretty(&reminders)?);
        }
        RemindAction::Due => {
            let due = scheduler.due_reminders(Utc::now())?;
            if due.is_empty() {
                println!("Nothing is due.");
            } else {
                println!("{}", serde_json::to_string_pretty(&due)?);
            }
        }
        RemindAction::Ack { id } => {
            if scheduler.acknowledge(&id)? {
                println!("Reminder acknowledged: {id}");
            } else {
                println!("Reminder not found: {id}");
            }
        }
        RemindAction::ScheduleDaily => {
            let reminder = scheduler.schedule_daily_reminder(Utc::now())?;
            println!("Daily reminder scheduled for {}", reminder.fire_at);
            println!("{}", serde_json::to_string_pretty(&reminder)?);
        }
        RemindAction::CancelDaily => {
            if scheduler.cancel_daily_reminder()? {
                println!("Daily reminder cancelled");
            } else {
                println!("No daily reminder was scheduled");
            }
        }
    }
    Ok(())
}
