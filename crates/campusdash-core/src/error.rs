//! Core error types for campusdash-core.
//!
//! Each concern gets its own thiserror enum; [`CoreError`] aggregates them
//! for callers that do not care which layer failed.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for campusdash-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Attendance arithmetic received counts or a threshold it cannot use
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// A timetable slot string could not be parsed
    #[error("Timetable error: {0}")]
    TimeSlot(#[from] TimeSlotError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Record source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Invalid inputs to the attendance projector.
///
/// The projector fails fast instead of clamping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// More classes attended than were held
    #[error("Invalid attendance counts: attended ({attended}) exceeds total ({total})")]
    InvalidInput { attended: u32, total: u32 },

    /// Threshold outside the open interval (0, 1)
    #[error("Invalid threshold {value}: must be strictly between 0 and 1")]
    InvalidThreshold { value: f64 },
}

/// A timetable entry's slot string is not `H:MM-H:MM`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeSlotError {
    #[error("Malformed time slot '{slot}': {reason}")]
    Malformed { slot: String, reason: String },
}

impl TimeSlotError {
    pub(crate) fn malformed(slot: &str, reason: impl Into<String>) -> Self {
        TimeSlotError::Malformed {
            slot: slot.to_string(),
            reason: reason.into(),
        }
    }
}

/// A day name outside Monday..Saturday.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown day '{0}': expected Monday through Saturday")]
pub struct UnknownDayError(pub String);

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be resolved or created
    #[error("Configuration directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Errors reading attendance records or timetables from an external source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No path configured for the requested collection
    #[error("No {0} source configured")]
    NotConfigured(&'static str),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
