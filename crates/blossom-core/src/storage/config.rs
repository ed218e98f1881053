//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Cycle defaults and onboarding bounds
//! - Pattern analysis thresholds
//! - Insight cadence and dashboard unlock threshold
//! - Conversation backend settings
//!
//! Configuration is stored at `~/.config/blossom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Cycle defaults and accepted onboarding ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    #[serde(default = "default_cycle_length")]
    pub default_length: u32,
    #[serde(default = "default_min_cycle_length")]
    pub min_length: u32,
    #[serde(default = "default_max_cycle_length")]
    pub max_length: u32,
    #[serde(default = "default_min_age")]
    pub min_age: u32,
    #[serde(default = "default_max_age")]
    pub max_age: u32,
}

/// Pattern analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Entries required before any pattern is reported.
    #[serde(default = "default_pattern_min_entries")]
    pub min_entries: usize,
    /// Mean intensity a (phase, symptom) group must exceed.
    #[serde(default = "default_intensity_threshold")]
    pub intensity_threshold: f64,
}

/// Insight cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Offer an insight after every n-th logged symptom (0 disables).
    #[serde(default = "default_every_n_logs")]
    pub every_n_logs: usize,
    /// Fixed RNG seed (unset = random).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Trend dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_dashboard_min_entries")]
    pub min_entries: usize,
}

/// Conversation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// How many recent symptoms are summarized into the prompt.
    #[serde(default = "default_recent_symptoms")]
    pub recent_symptoms: usize,
    /// Fixed RNG seed for canned replies (unset = random).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Language model backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/blossom/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub patterns: PatternConfig,
    #[serde(default)]
    pub insights: InsightConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

// Default functions
fn default_cycle_length() -> u32 {
    crate::cycle::DEFAULT_CYCLE_LENGTH
}
fn default_min_cycle_length() -> u32 {
    21
}
fn default_max_cycle_length() -> u32 {
    40
}
fn default_min_age() -> u32 {
    18
}
fn default_max_age() -> u32 {
    65
}
fn default_pattern_min_entries() -> usize {
    3
}
fn default_intensity_threshold() -> f64 {
    3.0
}
fn default_every_n_logs() -> usize {
    3
}
fn default_dashboard_min_entries() -> usize {
    5
}
fn default_recent_symptoms() -> usize {
    3
}
fn default_true() -> bool {
    true
}
fn default_llm_base_url() -> String {
    "http://localhost:11434".into()
}
fn default_llm_model() -> String {
    "llama3".into()
}
fn default_llm_timeout_secs() -> u64 {
    60
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            default_length: default_cycle_length(),
            min_length: default_min_cycle_length(),
            max_length: default_max_cycle_length(),
            min_age: default_min_age(),
            max_age: default_max_age(),
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_entries: default_pattern_min_entries(),
            intensity_threshold: default_intensity_threshold(),
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            every_n_logs: default_every_n_logs(),
            seed: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            min_entries: default_dashboard_min_entries(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            recent_symptoms: default_recent_symptoms(),
            seed: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let clears = value.is_empty() || value == "none";
        let new_value = match existing {
            // "none" nulls an integer; only Option fields accept that on deserialize
            serde_json::Value::Number(n) if clears && !n.is_f64() => serde_json::Value::Null,
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(n) if n.is_f64() => value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(serde_json::Value::Number)
                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
            // Optional fields (seeds) serialize as null
            serde_json::Value::Null if clears => serde_json::Value::Null,
            serde_json::Value::Null => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot set a whole section".to_string()));
            }
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if it does not exist.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::info!(path = %path.display(), "wrote default configuration");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("falling back to default configuration: {e}");
            Self::default()
        })
    }
}
