//! Attendance records and the per-subject values derived from them.
//!
//! Records are the only source of truth. Summaries are recomputed from them
//! on every read and never stored, so a displayed percentage cannot drift
//! from the counts it was derived from.

mod projector;

pub use projector::{
    classes_needed_for_threshold, max_absences_for_threshold, percentage, round_percent,
    AttendanceProjector, SubjectProjection, Threshold, DEFAULT_THRESHOLD,
};

pub(crate) use projector::raw_percentage;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One marked class for one student.
///
/// The backing store keeps at most one record per (student, date, subject).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub subject: String,
    pub date: NaiveDate,
    pub is_present: bool,
}

impl AttendanceRecord {
    pub fn new(subject: impl Into<String>, date: NaiveDate, is_present: bool) -> Self {
        Self {
            subject: subject.into(),
            date,
            is_present,
        }
    }

    pub fn present(subject: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(subject, date, true)
    }

    pub fn absent(subject: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(subject, date, false)
    }
}

/// Records that fall on `date`.
pub fn records_on(records: &[AttendanceRecord], date: NaiveDate) -> Vec<&AttendanceRecord> {
    records.iter().filter(|r| r.date == date).collect()
}

/// Attended/total counter. Only grows through [`Tally::record`], which keeps
/// `attended <= total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    attended: u32,
    total: u32,
}

impl Tally {
    pub fn record(&mut self, is_present: bool) {
        self.total = self.total.saturating_add(1);
        if is_present {
            self.attended = self.attended.saturating_add(1);
        }
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        let mut tally = Self::default();
        for record in records {
            tally.record(record.is_present);
        }
        tally
    }

    pub fn attended(&self) -> u32 {
        self.attended
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

/// Whether a student is at/above threshold, and the projection that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttendanceStanding {
    /// At or above threshold; `can_miss` more classes keeps it there
    Safe { can_miss: u32 },
    /// Below threshold; `must_attend` consecutive classes restore it
    Short { must_attend: u32 },
}

impl AttendanceStanding {
    pub fn is_short(&self) -> bool {
        matches!(self, AttendanceStanding::Short { .. })
    }
}

/// Derived attendance row for one subject. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAttendanceSummary {
    pub subject: String,
    pub attended: u32,
    pub total: u32,
    /// Whole percent, `round(100 * attended / total)`
    pub percentage: f64,
    pub classes_needed: u32,
    pub max_absences: u32,
    pub standing: AttendanceStanding,
}
