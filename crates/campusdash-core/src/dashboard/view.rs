//! Plain-data views handed to the UI layer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::attendance::{AttendanceRecord, SubjectAttendanceSummary, Threshold};
use crate::timetable::{Day, TimeSlot, TimetableEntry};

/// Flat attendance across every subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAttendance {
    pub attended_classes: u32,
    pub total_classes: u32,
    /// Whole percent
    pub percentage: f64,
}

/// Today's marking state for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkStatus {
    Present,
    Absent,
    Unmarked,
}

impl MarkStatus {
    /// Looks up `subject` among records dated `date`. If the store ever
    /// returns more than one, the last one wins, as an upsert would.
    pub fn lookup(records: &[AttendanceRecord], subject: &str, date: NaiveDate) -> Self {
        records
            .iter()
            .rev()
            .find(|r| r.date == date && r.subject == subject)
            .map(|r| {
                if r.is_present {
                    MarkStatus::Present
                } else {
                    MarkStatus::Absent
                }
            })
            .unwrap_or(MarkStatus::Unmarked)
    }
}

/// A timetable entry placed on today's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledClass {
    pub subject: String,
    pub day_of_week: Day,
    /// Slot as written in the timetable
    pub time_slot: String,
    pub slot: TimeSlot,
    pub mark: MarkStatus,
    /// Unmarked and inside the reminder window. Independent of which list
    /// the class sits in: a short slot can still be active while its
    /// reminder fires.
    pub reminder_due: bool,
}

/// Entry dropped from the view because its slot could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub entry: TimetableEntry,
    pub reason: String,
}

/// Today's schedule split by where `now` falls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayView {
    pub date: NaiveDate,
    /// `None` on Sunday
    pub day: Option<Day>,
    pub active: Vec<ScheduledClass>,
    pub upcoming: Vec<ScheduledClass>,
    pub done: Vec<ScheduledClass>,
    /// Every class with `reminder_due` set, whichever list it is in
    pub reminders: Vec<ScheduledClass>,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortfallEntry {
    pub subject: String,
    pub percentage: f64,
    pub classes_needed: u32,
}

/// Subjects below threshold, for low-attendance alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortfallReport {
    pub threshold: Threshold,
    pub subjects: Vec<ShortfallEntry>,
    pub total_classes_needed: u32,
}

/// Everything the student dashboard shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: NaiveDateTime,
    pub overall: OverallAttendance,
    pub subjects: Vec<SubjectAttendanceSummary>,
    pub shortfall: ShortfallReport,
    pub today: TodayView,
}
