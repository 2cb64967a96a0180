//! Where attendance records and timetables come from.
//!
//! The hosted backend owns the data; the core only needs two reads. The
//! [`RecordSource`] trait is that seam, and [`JsonFileSource`] implements it
//! over exported JSON files.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use chrono::NaiveDateTime;

use super::DataConfig;
use crate::attendance::{records_on, AttendanceRecord};
use crate::dashboard::{DashboardAggregator, DashboardSnapshot};
use crate::error::SourceError;
use crate::timetable::{ScheduleMatcher, Timetable, TimetableEntry};

/// Read access to one student's records and their class group's timetable.
pub trait RecordSource {
    fn attendance_records(&self) -> Result<Vec<AttendanceRecord>, SourceError>;

    fn timetable(&self) -> Result<Timetable, SourceError>;

    /// Reads both collections and returns today's entries still waiting to
    /// be marked. Fails on an unreadable source or a malformed slot.
    fn due_reminders(
        &self,
        matcher: &ScheduleMatcher,
        now: NaiveDateTime,
    ) -> crate::Result<Vec<TimetableEntry>> {
        let timetable = self.timetable()?;
        let records = self.attendance_records()?;
        let records_today: Vec<AttendanceRecord> =
            records_on(&records, now.date()).into_iter().cloned().collect();
        let today = matcher.todays_entries(&timetable.entries, now);
        let due = matcher.due_reminders(today, now, &records_today)?;
        Ok(due.into_iter().cloned().collect())
    }

    /// Reads both collections and builds the full dashboard snapshot.
    fn student_dashboard(
        &self,
        aggregator: &DashboardAggregator,
        now: NaiveDateTime,
    ) -> crate::Result<DashboardSnapshot> {
        let records = self.attendance_records()?;
        let timetable = self.timetable()?;
        Ok(aggregator.student_dashboard(&timetable.entries, &records, now))
    }
}

/// A timetable file is either a bare list of entries or an object carrying
/// the class group as well.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimetableFile {
    Grouped(Timetable),
    Bare(Vec<TimetableEntry>),
}

impl From<TimetableFile> for Timetable {
    fn from(file: TimetableFile) -> Self {
        match file {
            TimetableFile::Grouped(timetable) => timetable,
            TimetableFile::Bare(entries) => Timetable::new(entries),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// JSON files exported from the backend.
///
/// Records: `[{"subject": "Maths", "date": "2026-10-12", "is_present": true}]`.
/// Timetable: a list of `{"day_of_week", "time_slot", "subject"}` objects, or
/// `{"group": {...}, "entries": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonFileSource {
    records_path: Option<PathBuf>,
    timetable_path: Option<PathBuf>,
}

impl JsonFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, path: impl Into<PathBuf>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    pub fn with_timetable(mut self, path: impl Into<PathBuf>) -> Self {
        self.timetable_path = Some(path.into());
        self
    }

    /// Paths from `[data]`; explicit paths win over configured ones.
    pub fn from_config(
        data: &DataConfig,
        records: Option<PathBuf>,
        timetable: Option<PathBuf>,
    ) -> Self {
        Self {
            records_path: records.or_else(|| data.records_path.clone()),
            timetable_path: timetable.or_else(|| data.timetable_path.clone()),
        }
    }
}

impl RecordSource for JsonFileSource {
    fn attendance_records(&self) -> Result<Vec<AttendanceRecord>, SourceError> {
        let path = self
            .records_path
            .as_deref()
            .ok_or(SourceError::NotConfigured("attendance records"))?;
        let records: Vec<AttendanceRecord> = read_json(path)?;
        debug!(path = %path.display(), count = records.len(), "loaded attendance records");
        Ok(records)
    }

    fn timetable(&self) -> Result<Timetable, SourceError> {
        let path = self
            .timetable_path
            .as_deref()
            .ok_or(SourceError::NotConfigured("timetable"))?;
        let timetable: Timetable = read_json::<TimetableFile>(path)?.into();
        debug!(path = %path.display(), entries = timetable.entries.len(), "loaded timetable");
        Ok(timetable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::timetable::Day;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_records() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "records.json",
            r#"[{"subject": "Maths", "date": "2026-10-12", "is_present": true}]"#,
        );
        let records = JsonFileSource::new().with_records(path).attendance_records().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_present);
    }

    #[test]
    fn reads_bare_and_grouped_timetables() {
        let dir = TempDir::new().unwrap();
        let bare = write(
            &dir,
            "bare.json",
            r#"[{"day_of_week": "Monday", "time_slot": "9:00-10:00", "subject": "Maths"}]"#,
        );
        let grouped = write(
            &dir,
            "grouped.json",
            r#"{
                "group": {"branch": "CSE", "year": 2, "semester": 3, "section": "A"},
                "entries": [{"day_of_week": "Tuesday", "time_slot": "10:00-11:00", "subject": "Physics"}]
            }"#,
        );

        let bare = JsonFileSource::new().with_timetable(bare).timetable().unwrap();
        assert_eq!(bare.group, None);
        assert_eq!(bare.entries[0].day_of_week, Day::Monday);

        let grouped = JsonFileSource::new().with_timetable(grouped).timetable().unwrap();
        assert_eq!(grouped.group.unwrap().branch, "CSE");
        assert_eq!(grouped.entries[0].subject, "Physics");
    }

    #[test]
    fn unknown_day_name_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "t.json",
            r#"[{"day_of_week": "Sunday", "time_slot": "9:00-10:00", "subject": "Maths"}]"#,
        );
        let err = JsonFileSource::new().with_timetable(path).timetable().unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn missing_file_and_missing_path_are_distinct() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        let err = JsonFileSource::new().with_records(missing).attendance_records().unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));

        let err = JsonFileSource::new().attendance_records().unwrap_err();
        assert!(matches!(err, SourceError::NotConfigured(_)));
    }

    #[test]
    fn explicit_paths_override_config() {
        let data = DataConfig {
            records_path: Some(PathBuf::from("configured.json")),
            timetable_path: Some(PathBuf::from("timetable.json")),
        };
        let source = JsonFileSource::from_config(&data, Some(PathBuf::from("flag.json")), None);
        assert_eq!(
            source,
            JsonFileSource::new()
                .with_records("flag.json")
                .with_timetable("timetable.json")
        );
    }

    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 10, 12)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn due_reminders_reads_through_the_source() {
        let dir = TempDir::new().unwrap();
        let timetable = write(
            &dir,
            "t.json",
            r#"[
                {"day_of_week": "Monday", "time_slot": "9:00-9:40", "subject": "Tutorial"},
                {"day_of_week": "Monday", "time_slot": "9:00-9:40", "subject": "Maths"}
            ]"#,
        );
        let records = write(
            &dir,
            "r.json",
            r#"[
                {"subject": "Tutorial", "date": "2026-10-05", "is_present": true},
                {"subject": "Maths", "date": "2026-10-12", "is_present": true}
            ]"#,
        );
        let source = JsonFileSource::new()
            .with_records(records)
            .with_timetable(timetable);

        let due = source
            .due_reminders(&ScheduleMatcher::new(), monday_at(9, 52))
            .unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].subject, "Tutorial");
    }

    #[test]
    fn combined_reads_report_which_layer_failed() {
        let dir = TempDir::new().unwrap();
        let timetable = write(
            &dir,
            "t.json",
            r#"[{"day_of_week": "Monday", "time_slot": "nine-ten", "subject": "Maths"}]"#,
        );
        let records = write(&dir, "r.json", "[]");
        let matcher = ScheduleMatcher::new();

        let source = JsonFileSource::new()
            .with_records(records)
            .with_timetable(timetable.clone());
        let err = source.due_reminders(&matcher, monday_at(9, 52)).unwrap_err();
        assert!(matches!(err, CoreError::TimeSlot(_)));

        let unconfigured = JsonFileSource::new().with_timetable(timetable);
        let err = unconfigured
            .student_dashboard(&DashboardAggregator::default(), monday_at(9, 52))
            .unwrap_err();
        assert!(matches!(err, CoreError::Source(SourceError::NotConfigured(_))));
    }
}
