mod config;
pub mod database;

pub use config::{Config, NotificationsConfig, UiConfig};
pub use database::{DiaryDb, DiaryStats, ImportSummary};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/wishdiary[-dev]/` based on WISHDIARY_ENV.
///
/// Set WISHDIARY_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WISHDIARY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("wishdiary-dev")
    } else {
        base_dir.join("wishdiary")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
