pub mod sessions;
pub mod settings;
pub mod tasks;

pub use sessions::{SessionRecord, SessionStore};
pub use settings::{CycleSettings, Settings, SettingsStore};
pub use tasks::{Task, TaskStore};

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Returns `~/.config/focusflow[-dev]/` based on FOCUSFLOW_ENV.
///
/// Set FOCUSFLOW_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusflow-dev")
    } else {
        base_dir.join("focusflow")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDirUnavailable(e.to_string()))?;
    Ok(dir)
}
