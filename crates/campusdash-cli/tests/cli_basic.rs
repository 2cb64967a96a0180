//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory and
//! verify its JSON output.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const TIMETABLE: &str = r#"[
    {"day_of_week": "Monday", "time_slot": "09:00-10:00", "subject": "Maths"},
    {"day_of_week": "Monday", "time_slot": "9:00-9:40", "subject": "Tutorial"},
    {"day_of_week": "Monday", "time_slot": "10:00-11:00", "subject": "Physics"},
    {"day_of_week": "Tuesday", "time_slot": "09:00-10:00", "subject": "Chemistry"}
]"#;

const RECORDS: &str = r#"[
    {"subject": "A", "date": "2026-10-05", "is_present": true},
    {"subject": "B", "date": "2026-10-05", "is_present": true},
    {"subject": "B", "date": "2026-10-06", "is_present": false},
    {"subject": "B", "date": "2026-10-07", "is_present": false},
    {"subject": "B", "date": "2026-10-08", "is_present": false},
    {"subject": "B", "date": "2026-10-09", "is_present": false},
    {"subject": "B", "date": "2026-10-10", "is_present": false},
    {"subject": "B", "date": "2026-10-11", "is_present": false},
    {"subject": "B", "date": "2026-10-12", "is_present": false},
    {"subject": "B", "date": "2026-10-13", "is_present": false}
]"#;

struct Fixture {
    home: TempDir,
    timetable: PathBuf,
    records: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        let timetable = home.path().join("timetable.json");
        let records = home.path().join("records.json");
        std::fs::write(&timetable, TIMETABLE).unwrap();
        std::fs::write(&records, RECORDS).unwrap();
        Self {
            home,
            timetable,
            records,
        }
    }

    /// Run the CLI and return (exit code, stdout, stderr).
    fn run(&self, args: &[&str]) -> (i32, String, String) {
        let output = Command::new(env!("CARGO_BIN_EXE_campusdash"))
            .args(args)
            .env("CAMPUSDASH_HOME", self.home.path())
            .env_remove("CAMPUSDASH_ENV")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (output.status.code().unwrap_or(-1), stdout, stderr)
    }

    fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let (code, stdout, stderr) = self.run(args);
        assert_eq!(code, 0, "CLI failed for {args:?}: {stderr}");
        serde_json::from_str(&stdout).expect("Failed to parse JSON output")
    }
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_attendance_project() {
    let fx = Fixture::new();
    let json = fx.run_json(&["attendance", "project", "--attended", "20", "--total", "40"]);
    assert_eq!(json["percentage"], 50.0);
    assert_eq!(json["classes_needed"], 40);
    assert_eq!(json["standing"]["status"], "short");
}

#[test]
fn test_attendance_project_with_threshold_override() {
    let fx = Fixture::new();
    let json = fx.run_json(&[
        "attendance", "project", "--attended", "30", "--total", "40", "--threshold", "0.6",
    ]);
    assert_eq!(json["max_absences"], 10);
}

#[test]
fn test_attendance_project_rejects_invalid_counts() {
    let fx = Fixture::new();
    let (code, _, stderr) = fx.run(&["attendance", "project", "--attended", "5", "--total", "4"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "{stderr}");
}

#[test]
fn test_attendance_summary_uses_flat_counts() {
    let fx = Fixture::new();
    let json = fx.run_json(&["attendance", "summary", "--records", path(&fx.records)]);
    assert_eq!(json["overall"]["attended_classes"], 2);
    assert_eq!(json["overall"]["total_classes"], 10);
    assert_eq!(json["overall"]["percentage"], 20.0);
    assert_eq!(json["subjects"][0]["subject"], "A");
    assert_eq!(json["shortfall"]["subjects"][0]["subject"], "B");
}

#[test]
fn test_schedule_day() {
    let fx = Fixture::new();
    let json = fx.run_json(&["schedule", "day", "Tuesday", "--timetable", path(&fx.timetable)]);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["subject"], "Chemistry");
}

#[test]
fn test_schedule_day_rejects_sunday() {
    let fx = Fixture::new();
    let (code, _, _) = fx.run(&["schedule", "day", "Sunday", "--timetable", path(&fx.timetable)]);
    assert_ne!(code, 0);
}

#[test]
fn test_schedule_today_keeps_short_slot_active() {
    let fx = Fixture::new();
    let json = fx.run_json(&[
        "schedule", "today", "--timetable", path(&fx.timetable), "--at", "2026-10-12T09:50",
    ]);
    assert_eq!(json["day"], "Monday");
    assert_eq!(json["entries"].as_array().unwrap().len(), 3);
    let active: Vec<&str> = json["active"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["subject"].as_str().unwrap())
        .collect();
    assert_eq!(active, vec!["Maths", "Tutorial"]);
}

#[test]
fn test_schedule_reminders_window() {
    let fx = Fixture::new();
    let args = |at: &'static str| {
        vec![
            "schedule".to_string(),
            "reminders".to_string(),
            "--timetable".to_string(),
            path(&fx.timetable).to_string(),
            "--records".to_string(),
            path(&fx.records).to_string(),
            "--at".to_string(),
            at.to_string(),
        ]
    };

    let open = args("2026-10-12T10:12");
    let open: Vec<&str> = open.iter().map(String::as_str).collect();
    let json = fx.run_json(&open);
    let due: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["subject"].as_str().unwrap())
        .collect();
    assert_eq!(due, vec!["Maths"]);

    let closed = args("2026-10-12T10:20");
    let closed: Vec<&str> = closed.iter().map(String::as_str).collect();
    assert!(fx.run_json(&closed).as_array().unwrap().is_empty());
}

#[test]
fn test_watch_once_reminds_short_slot_while_active() {
    // Tutorial 09:00-09:40 is still in session at 09:52 under the one-hour
    // rule, but its reminder window is 09:50-09:55.
    let fx = Fixture::new();
    let (code, stdout, stderr) = fx.run(&[
        "watch",
        "--once",
        "--at",
        "2026-10-12T09:52",
        "--timetable",
        path(&fx.timetable),
        "--records",
        path(&fx.records),
    ]);
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("in session: Maths (09:00-10:00), Tutorial (09:00-09:40)"), "{stdout}");
    assert!(stdout.contains("reminder: mark attendance for Tutorial"), "{stdout}");

    let reminders = fx.run_json(&[
        "schedule",
        "reminders",
        "--timetable",
        path(&fx.timetable),
        "--records",
        path(&fx.records),
        "--at",
        "2026-10-12T09:52",
    ]);
    assert_eq!(reminders[0]["subject"], "Tutorial");
}

#[test]
fn test_watch_at_requires_once() {
    let fx = Fixture::new();
    let (code, _, _) = fx.run(&["watch", "--at", "2026-10-12T09:52"]);
    assert_ne!(code, 0);
}

#[test]
fn test_dashboard_snapshot() {
    let fx = Fixture::new();
    let json = fx.run_json(&[
        "dashboard",
        "--timetable",
        path(&fx.timetable),
        "--records",
        path(&fx.records),
        "--at",
        "2026-10-12T10:30",
    ]);
    assert_eq!(json["overall"]["percentage"], 20.0);
    assert_eq!(json["today"]["active"][0]["subject"], "Physics");
    assert_eq!(json["today"]["done"].as_array().unwrap().len(), 2);
}

#[test]
fn test_config_set_get_and_paths_from_config() {
    let fx = Fixture::new();
    let (code, stdout, _) = fx.run(&["config", "set", "attendance.threshold", "0.8"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("ok"));

    let (_, stdout, _) = fx.run(&["config", "get", "attendance.threshold"]);
    assert_eq!(stdout.trim(), "0.8");

    let (code, _, _) = fx.run(&["config", "set", "data.timetable_path", path(&fx.timetable)]);
    assert_eq!(code, 0);
    let json = fx.run_json(&["schedule", "day", "Monday"]);
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[test]
fn test_config_rejects_invalid_threshold() {
    let fx = Fixture::new();
    let (code, _, stderr) = fx.run(&["config", "set", "attendance.threshold", "1.2"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("attendance.threshold"), "{stderr}");
}
