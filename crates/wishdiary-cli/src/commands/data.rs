//! Legacy JSON import/export commands for CLI.
//!
//! The interchange format is the mobile app's storage shape: a document
//! with "wishes" and "reviews" arrays and ISO-8601 date strings.

use clap::Subcommand;
use wishdiary_core::storage::DiaryDb;

#[derive(Subcommand)]
pub enum DataAction {
    /// Export every wish and review as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
    /// Import a legacy JSON document
    Import {
        /// Path of the JSON file
        path: String,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = DiaryDb::open()?;

    match action {
        DataAction::Export { output } => {
            let json = db.export_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &json)?;
                    println!("Exported to {path}");
                }
                None => println!("{json}"),
            }
        }
        DataAction::Import { path } => {
            let json = std::fs::read_to_string(&path)?;
            let summary = db.import_json(&json)?;
            println!(
                "Imported {} wish(es) and {} review(s); {} review(s) skipped",
                summary.wishes, summary.reviews, summary.skipped_reviews
            );
        }
    }
    Ok(())
}
