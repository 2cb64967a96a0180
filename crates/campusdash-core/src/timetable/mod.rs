//! Weekly timetable types.
//!
//! A timetable is a fixed template for one class group: each entry pins a
//! subject to a day of the week and a slot string. It carries no dates.

mod matcher;
mod slot;

pub use matcher::ScheduleMatcher;
pub use slot::TimeSlot;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TimeSlotError, UnknownDayError};

/// Teaching day. Sunday has no classes and therefore no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// `None` for Sunday.
    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(Day::Monday),
            Weekday::Tue => Some(Day::Tuesday),
            Weekday::Wed => Some(Day::Wednesday),
            Weekday::Thu => Some(Day::Thursday),
            Weekday::Fri => Some(Day::Friday),
            Weekday::Sat => Some(Day::Saturday),
            Weekday::Sun => None,
        }
    }

    pub fn of(date: NaiveDate) -> Option<Self> {
        Self::from_weekday(date.weekday())
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = UnknownDayError;

    /// Exact full-name match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|day| day.name() == s)
            .ok_or_else(|| UnknownDayError(s.to_string()))
    }
}

/// Class group a timetable belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub branch: String,
    pub year: u8,
    pub semester: u8,
    pub section: String,
}

/// One weekly slot. `time_slot` is kept as written; parse it with
/// [`TimetableEntry::slot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub day_of_week: Day,
    pub time_slot: String,
    pub subject: String,
}

impl TimetableEntry {
    pub fn new(day_of_week: Day, time_slot: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            day_of_week,
            time_slot: time_slot.into(),
            subject: subject.into(),
        }
    }

    pub fn slot(&self) -> Result<TimeSlot, TimeSlotError> {
        self.time_slot.parse()
    }
}

/// Timetable for one class group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    #[serde(default)]
    pub group: Option<ClassGroup>,
    #[serde(default)]
    pub entries: Vec<TimetableEntry>,
}

impl Timetable {
    pub fn new(entries: Vec<TimetableEntry>) -> Self {
        Self {
            group: None,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sunday_has_no_teaching_day() {
        assert_eq!(Day::from_weekday(Weekday::Sun), None);
        assert_eq!(Day::from_weekday(Weekday::Sat), Some(Day::Saturday));
        // 2026-10-18 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(Day::of(sunday), None);
    }

    #[test]
    fn day_names_match_exactly() {
        assert_eq!("Wednesday".parse::<Day>().unwrap(), Day::Wednesday);
        assert!("wednesday".parse::<Day>().is_err());
        assert!("Wed".parse::<Day>().is_err());
        assert!("Sunday".parse::<Day>().is_err());
    }

    #[test]
    fn entry_serialization_uses_full_day_names() {
        let entry = TimetableEntry::new(Day::Friday, "9:00-10:00", "Physics");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["day_of_week"], "Friday");
        let back: TimetableEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
