//! Parsing of `H:MM-H:MM` slot strings.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TimeSlotError;

/// Parsed start/end of a weekly slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Seconds from midnight to the declared start.
    pub fn start_secs(&self) -> i64 {
        i64::from(self.start.num_seconds_from_midnight())
    }

    /// Seconds from midnight to the declared end.
    pub fn end_secs(&self) -> i64 {
        i64::from(self.end.num_seconds_from_midnight())
    }

    /// Declared length in minutes. Negative if the end precedes the start.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_secs() - self.start_secs()) / 60
    }
}

fn parse_number(raw: &str, part: &str, label: &str) -> Result<u32, TimeSlotError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeSlotError::malformed(
            raw,
            format!("{label} '{part}' is not a number"),
        ));
    }
    part.parse()
        .map_err(|_| TimeSlotError::malformed(raw, format!("{label} '{part}' is out of range")))
}

fn parse_clock(raw: &str, clock: &str) -> Result<NaiveTime, TimeSlotError> {
    let parts: Vec<&str> = clock.trim().split(':').collect();
    if parts.len() != 2 {
        return Err(TimeSlotError::malformed(
            raw,
            format!("'{}' is not H:MM", clock.trim()),
        ));
    }

    let hour = parse_number(raw, parts[0], "hour")?;
    let minute = parse_number(raw, parts[1], "minute")?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        TimeSlotError::malformed(raw, format!("{hour}:{minute:02} is not a time of day"))
    })
}

impl FromStr for TimeSlot {
    type Err = TimeSlotError;

    /// Accepts both `9:00-10:00` and `09:00-10:00`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.split('-').collect();
        if parts.len() != 2 {
            return Err(TimeSlotError::malformed(
                raw,
                "expected exactly one '-' between start and end",
            ));
        }

        let start = parse_clock(raw, parts[0])?;
        let end = parse_clock(raw, parts[1])?;
        Ok(Self { start, end })
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
