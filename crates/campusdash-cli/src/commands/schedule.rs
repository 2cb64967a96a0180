use campusdash_core::{Config, Day, RecordSource};
use clap::Subcommand;
use serde_json::json;

use super::{print_json, AtArgs, SourceArgs};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// List the entries for one day of the week
    Day {
        /// Monday through Saturday
        day: Day,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Today's entries and the ones in session
    Today {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        at: AtArgs,
    },
    /// Finished classes still waiting for attendance to be marked
    Reminders {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        at: AtArgs,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let matcher = config.matcher();

    match action {
        ScheduleAction::Day { day, source } => {
            let timetable = source.source(&config).timetable()?;
            let entries = matcher.entries_for_day(&timetable.entries, day);
            print_json(&entries)?;
        }
        ScheduleAction::Today { source, at } => {
            let now = at.now();
            let timetable = source.source(&config).timetable()?;
            let today = matcher.todays_entries(&timetable.entries, now);
            let active = matcher.active_entries(today.iter().copied(), now)?;
            print_json(&json!({
                "now": now,
                "day": Day::of(now.date()),
                "entries": today,
                "active": active,
            }))?;
        }
        ScheduleAction::Reminders { source, at } => {
            let due = source.source(&config).due_reminders(&matcher, at.now())?;
            print_json(&due)?;
        }
    }
    Ok(())
}
