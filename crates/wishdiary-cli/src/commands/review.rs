//! Review workflow commands for CLI.
//!
//! The queue cursor lives in memory only. Each invocation rebuilds the
//! queue from stored state, which is idempotent: eligibility and the
//! already-reviewed exclusion are both derived from what is persisted,
//! so "submit" always addresses the current head of the queue.

use chrono::Utc;
use clap::Subcommand;
use wishdiary_core::dates::format_relative_time;
use wishdiary_core::storage::DiaryDb;
use wishdiary_core::{ReviewOutcome, ReviewWorkflow};

use super::{parse_achievement_status, parse_emotional_state};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// List wishes waiting for review
    Pending,
    /// Show the wish at the head of the review queue
    Next,
    /// Submit the review for the wish at the head of the queue
    Submit {
        /// Outcome: fully_achieved, partially_achieved, in_progress, not_achieved
        #[arg(long)]
        status: String,
        /// How you feel: proud, satisfied, motivated, disappointed, determined
        #[arg(long)]
        emotion: String,
        /// What you learned along the way
        #[arg(long)]
        reflection: Option<String>,
        /// A moment worth celebrating
        #[arg(long)]
        celebration: Option<String>,
    },
    /// List submitted reviews
    List,
}

pub fn run(action: ReviewAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = DiaryDb::open()?;

    match action {
        ReviewAction::Pending => {
            let workflow = ReviewWorkflow::begin(&db, Utc::now())?;
            let queue = workflow.queue();
            if queue.is_empty() {
                println!("No wishes are ready for review yet.");
                println!("A wish becomes reviewable one week after it was recorded.");
            } else {
                println!("{} wish(es) ready for review:", queue.len());
                println!("{}", serde_json::to_string_pretty(queue.wishes())?);
            }
        }
        ReviewAction::Next => {
            let now = Utc::now();
            let workflow = ReviewWorkflow::begin(&db, now)?;
            match workflow.current() {
                Some(wish) => {
                    if let Some(index) = workflow.queue().position() {
                        println!("{} / {}", index + 1, workflow.queue().len());
                    }
                    println!("Recorded {}", format_relative_time(wish.created_at, now));
                    println!("{}", serde_json::to_string_pretty(wish)?);
                }
                None => println!("No wishes are ready for review yet."),
            }
        }
        ReviewAction::Submit {
            status,
            emotion,
            reflection,
            celebration,
        } => {
            let achievement_status = parse_achievement_status(&status)?;
            let emotional_state = parse_emotional_state(&emotion)?;

            let mut workflow = ReviewWorkflow::begin(&db, Utc::now())?;
            let mut outcome = ReviewOutcome::new(achievement_status, emotional_state);
            outcome.reflection = reflection;
            outcome.celebration_moment = celebration;

            let result = workflow.submit(outcome)?;
            println!("{}", achievement_status.motivational_message());
            println!("{}", serde_json::to_string_pretty(&result.review)?);

            match result.completed {
                Some(summary) => {
                    println!(
                        "Review pass complete: {} wish(es) reviewed, overall success rate {}%",
                        summary.reviewed, summary.success_rate_pct
                    );
                }
                None => {
                    if let Some(next) = workflow.current() {
                        println!("Next up: {} ({})", next.title, next.id);
                    }
                }
            }
        }
        ReviewAction::List => {
            let reviews = db.list_reviews()?;
            println!("{}", serde_json::to_string_pretty(&reviews)?);
        }
    }
    Ok(())
}
