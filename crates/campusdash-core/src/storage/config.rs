//! TOML-based application configuration.
//!
//! Stores:
//! - The attendance threshold
//! - Active and reminder window lengths for timetable matching
//! - Polling cadence for callers that watch the schedule
//! - Default locations of the records and timetable files
//!
//! Configuration is stored at `~/.config/campusdash/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::data_dir;
use crate::attendance::{AttendanceProjector, Threshold, DEFAULT_THRESHOLD};
use crate::dashboard::DashboardAggregator;
use crate::error::ConfigError;
use crate::timetable::ScheduleMatcher;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// Fraction between 0 and 1
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// How long after its start a slot counts as in session
    #[serde(default = "default_active_window")]
    pub active_window_minutes: u32,
    #[serde(default = "default_reminder_delay")]
    pub reminder_delay_minutes: u32,
    #[serde(default = "default_reminder_window")]
    pub reminder_window_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_active_check")]
    pub active_check_secs: u64,
    /// Must not exceed the reminder window or a window can be missed
    #[serde(default = "default_reminder_check")]
    pub reminder_check_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub records_path: Option<PathBuf>,
    #[serde(default)]
    pub timetable_path: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/campusdash/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub attendance: AttendanceConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub data: DataConfig,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}
fn default_active_window() -> u32 {
    60
}
fn default_reminder_delay() -> u32 {
    10
}
fn default_reminder_window() -> u32 {
    5
}
fn default_active_check() -> u64 {
    60
}
fn default_reminder_check() -> u64 {
    300
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            active_window_minutes: default_active_window(),
            reminder_delay_minutes: default_reminder_delay(),
            reminder_window_minutes: default_reminder_window(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            active_check_secs: default_active_check(),
            reminder_check_secs: default_reminder_check(),
        }
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::UnknownKey(key.to_string())
}

fn invalid_value(key: &str, message: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
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
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown_key(key));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(|| unknown_key(key))?;
                let existing = obj.get(part).ok_or_else(|| unknown_key(key))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid_value(key, e))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid_value(key, format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid_value(
                                key,
                                format!("cannot parse '{value}' as number"),
                            ));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown_key(key)),
                    _ if value.is_empty() => serde_json::Value::Null,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(|| unknown_key(key))?;
        }

        Err(unknown_key(key))
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Same as [`Config::load`] for an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, falling back to defaults (with a warning) on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            warn!(error = %err, "using default configuration");
            Self::default()
        })
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

    /// Update one value in memory. The result must still deserialize and
    /// carry a usable threshold, otherwise `self` is left untouched.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid_value(key, e))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid_value(key, e))?;
        updated.threshold()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn threshold(&self) -> Result<Threshold, ConfigError> {
        Threshold::new(self.attendance.threshold)
            .map_err(|e| invalid_value("attendance.threshold", e))
    }

    pub fn projector(&self) -> Result<AttendanceProjector, ConfigError> {
        Ok(AttendanceProjector::new(self.threshold()?))
    }

    pub fn matcher(&self) -> ScheduleMatcher {
        ScheduleMatcher::new()
            .with_active_window(self.schedule.active_window_minutes)
            .with_reminder_window(
                self.schedule.reminder_delay_minutes,
                self.schedule.reminder_window_minutes,
            )
    }

    pub fn aggregator(&self) -> Result<DashboardAggregator, ConfigError> {
        Ok(DashboardAggregator::new(self.projector()?, self.matcher()))
    }
}
