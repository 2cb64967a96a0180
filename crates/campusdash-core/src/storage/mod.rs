mod config;
pub mod source;

pub use config::{AttendanceConfig, Config, DataConfig, PollingConfig, ScheduleConfig};
pub use source::{JsonFileSource, RecordSource};

use std::path::PathBuf;

/// Returns `~/.config/campusdash[-dev]/` based on CAMPUSDASH_ENV.
///
/// Set CAMPUSDASH_ENV=dev to use the development directory, and
/// CAMPUSDASH_HOME to replace `~/.config` entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = match std::env::var_os("CAMPUSDASH_HOME") {
        Some(home) => PathBuf::from(home),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config"),
    };

    let env = std::env::var("CAMPUSDASH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("campusdash-dev")
    } else {
        base_dir.join("campusdash")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
