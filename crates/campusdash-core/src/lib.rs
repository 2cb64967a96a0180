//! # campusdash Core Library
//!
//! The computational core behind the campusdash student and admin
//! dashboards. Everything the UI shows about attendance and today's classes
//! is derived here from two raw inputs: attendance records and the weekly
//! timetable of a class group.
//!
//! ## Architecture
//!
//! - **Attendance**: pure projection arithmetic over attended/total counts
//!   against an injected threshold
//! - **Timetable**: slot parsing and matching of a weekly template against an
//!   injected wall-clock instant
//! - **Dashboard**: aggregation of both into serializable views
//! - **Storage**: TOML configuration and the read-only record source seam
//!
//! None of the computations read the clock or touch shared state; "now" is
//! always a parameter.
//!
//! ## Key Components
//!
//! - [`AttendanceProjector`]: percentage, classes needed, max absences
//! - [`ScheduleMatcher`]: today's entries, active entries, due reminders
//! - [`DashboardAggregator`]: overall attendance, subject breakdown, today view
//! - [`Config`]: application configuration management

pub mod attendance;
pub mod dashboard;
pub mod error;
pub mod storage;
pub mod timetable;

pub use attendance::{
    AttendanceProjector, AttendanceRecord, AttendanceStanding, SubjectAttendanceSummary,
    SubjectProjection, Tally, Threshold,
};
pub use dashboard::{
    DashboardAggregator, DashboardSnapshot, MarkStatus, OverallAttendance, ShortfallReport,
    TodayView,
};
pub use error::{ConfigError, CoreError, ProjectionError, Result, SourceError, TimeSlotError};
pub use storage::{Config, JsonFileSource, RecordSource};
pub use timetable::{ClassGroup, Day, ScheduleMatcher, TimeSlot, Timetable, TimetableEntry};
