//! Dashboard aggregation.
//!
//! Combines per-subject projections and today's schedule into the values the
//! student dashboard renders. Overall attendance is always re-derived from
//! raw counts across all subjects, never averaged from per-subject
//! percentages: averaging would give a subject with one class the same
//! weight as one with forty.

mod view;

pub use view::{
    DashboardSnapshot, MarkStatus, OverallAttendance, ScheduledClass,
    ShortfallEntry, ShortfallReport, SkippedEntry, TodayView,
};

use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::attendance::{
    raw_percentage, round_percent, AttendanceProjector, AttendanceRecord,
    SubjectAttendanceSummary, Tally,
};
use crate::timetable::{Day, ScheduleMatcher, TimetableEntry};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardAggregator {
    projector: AttendanceProjector,
    matcher: ScheduleMatcher,
}

impl DashboardAggregator {
    pub fn new(projector: AttendanceProjector, matcher: ScheduleMatcher) -> Self {
        Self { projector, matcher }
    }

    pub fn projector(&self) -> &AttendanceProjector {
        &self.projector
    }

    pub fn matcher(&self) -> &ScheduleMatcher {
        &self.matcher
    }

    /// Flat count over every record regardless of subject.
    pub fn overall_attendance(&self, records: &[AttendanceRecord]) -> OverallAttendance {
        let tally = Tally::from_records(records);
        OverallAttendance {
            attended_classes: tally.attended(),
            total_classes: tally.total(),
            percentage: round_percent(raw_percentage(tally.attended(), tally.total()), 0),
        }
    }

    /// One summary per subject, ordered by subject name.
    pub fn subject_breakdown(&self, records: &[AttendanceRecord]) -> Vec<SubjectAttendanceSummary> {
        let mut by_subject: BTreeMap<&str, Tally> = BTreeMap::new();
        for record in records {
            by_subject
                .entry(record.subject.as_str())
                .or_default()
                .record(record.is_present);
        }

        by_subject
            .into_iter()
            .map(|(subject, tally)| self.projector.summarize(subject, tally))
            .collect()
    }

    /// Subjects currently below threshold and what it takes to recover.
    pub fn shortfall(&self, breakdown: &[SubjectAttendanceSummary]) -> ShortfallReport {
        let subjects: Vec<ShortfallEntry> = breakdown
            .iter()
            .filter(|s| s.standing.is_short())
            .map(|s| ShortfallEntry {
                subject: s.subject.clone(),
                percentage: s.percentage,
                classes_needed: s.classes_needed,
            })
            .collect();

        let total_classes_needed = subjects
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.classes_needed));

        ShortfallReport {
            threshold: self.projector.threshold(),
            subjects,
            total_classes_needed,
        }
    }

    /// Today's schedule relative to `now`.
    ///
    /// Each entry is parsed on its own; a malformed slot is logged and listed
    /// under `skipped` while the remaining entries still render.
    pub fn today_view(
        &self,
        timetable: &[TimetableEntry],
        records_today: &[AttendanceRecord],
        now: NaiveDateTime,
    ) -> TodayView {
        let date = now.date();
        let mut view = TodayView {
            date,
            day: Day::of(date),
            active: Vec::new(),
            upcoming: Vec::new(),
            done: Vec::new(),
            reminders: Vec::new(),
            skipped: Vec::new(),
        };

        for entry in self.matcher.todays_entries(timetable, now) {
            let slot = match entry.slot() {
                Ok(slot) => slot,
                Err(err) => {
                    warn!(subject = %entry.subject, error = %err, "skipping timetable entry");
                    view.skipped.push(SkippedEntry {
                        entry: entry.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let mark = MarkStatus::lookup(records_today, &entry.subject, date);
            let class = ScheduledClass {
                subject: entry.subject.clone(),
                day_of_week: entry.day_of_week,
                time_slot: entry.time_slot.clone(),
                slot,
                mark,
                reminder_due: mark == MarkStatus::Unmarked
                    && self.matcher.in_reminder_window(&slot, now),
            };

            if class.reminder_due {
                view.reminders.push(class.clone());
            }
            if self.matcher.slot_is_active(&slot, now) {
                view.active.push(class);
            } else if now.time() < slot.start {
                view.upcoming.push(class);
            } else {
                view.done.push(class);
            }
        }

        view.active.sort_by_key(|c| c.slot.start);
        view.upcoming.sort_by_key(|c| c.slot.start);
        view.done.sort_by_key(|c| c.slot.start);
        view.reminders.sort_by_key(|c| c.slot.start);

        debug!(
            date = %date,
            active = view.active.len(),
            upcoming = view.upcoming.len(),
            done = view.done.len(),
            reminders = view.reminders.len(),
            skipped = view.skipped.len(),
            "built today view"
        );
        view
    }

    /// Overall, per-subject, shortfall and today's schedule in one snapshot.
    pub fn student_dashboard(
        &self,
        timetable: &[TimetableEntry],
        records: &[AttendanceRecord],
        now: NaiveDateTime,
    ) -> DashboardSnapshot {
        let subjects = self.subject_breakdown(records);
        let shortfall = self.shortfall(&subjects);
        DashboardSnapshot {
            generated_at: now,
            overall: self.overall_attendance(records),
            subjects,
            shortfall,
            today: self.today_view(timetable, records, now),
        }
    }
}
