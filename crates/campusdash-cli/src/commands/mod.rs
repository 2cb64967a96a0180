pub mod attendance;
pub mod config;
pub mod dashboard;
pub mod schedule;
pub mod watch;

use campusdash_core::{Config, JsonFileSource};
use chrono::{Local, NaiveDateTime};
use clap::Args;
use std::path::PathBuf;

/// Data file locations; fall back to `[data]` in the config.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Attendance records JSON file
    #[arg(long)]
    pub records: Option<PathBuf>,
    /// Timetable JSON file
    #[arg(long)]
    pub timetable: Option<PathBuf>,
}

impl SourceArgs {
    pub fn source(&self, config: &Config) -> JsonFileSource {
        JsonFileSource::from_config(&config.data, self.records.clone(), self.timetable.clone())
    }
}

/// Point in time to evaluate against.
#[derive(Args, Debug, Clone, Default)]
pub struct AtArgs {
    /// Local date and time, e.g. 2026-10-12T09:30 (defaults to now)
    #[arg(long, value_parser = parse_at)]
    pub at: Option<NaiveDateTime>,
}

impl AtArgs {
    /// Wall clock unless `--at` was given.
    pub fn now(&self) -> NaiveDateTime {
        self.at.unwrap_or_else(|| Local::now().naive_local())
    }
}

const AT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_at(raw: &str) -> Result<NaiveDateTime, String> {
    AT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM[:SS], got '{raw}'"))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parse_at_accepts_minutes_and_seconds() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 12)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_at("2026-10-12T09:30").unwrap(), expected);
        assert_eq!(parse_at("2026-10-12T09:30:00").unwrap(), expected);
        assert_eq!(parse_at("2026-10-12 09:30").unwrap(), expected);
        assert!(parse_at("09:30").is_err());
    }
}
