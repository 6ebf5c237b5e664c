//! Diary statistics command for CLI.

use wishdiary_core::storage::DiaryDb;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = DiaryDb::open()?;
    let stats = db.stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
