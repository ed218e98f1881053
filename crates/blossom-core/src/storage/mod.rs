mod config;
pub mod database;
pub mod migrations;

pub use config::{ChatConfig, Config, CycleConfig, DashboardConfig, InsightConfig, LlmConfig, PatternConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the Blossom data directory, creating it if needed.
///
/// Resolution order:
/// - `BLOSSOM_HOME`, used verbatim when set;
/// - `~/.config/blossom-dev/` when `BLOSSOM_ENV=dev`;
/// - `~/.config/blossom/` otherwise.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("BLOSSOM_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("BLOSSOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("blossom-dev")
            } else {
                base_dir.join("blossom")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
