//! Polling loop for the "class in session" banner and attendance reminders.
//!
//! The core re-reports a reminder on every call inside its window, so this
//! loop remembers what it already printed.

use campusdash_core::{Config, DashboardAggregator, JsonFileSource, RecordSource, TodayView};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Args;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

use super::SourceArgs;

#[derive(Args)]
pub struct WatchArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Run each check once and exit
    #[arg(long)]
    once: bool,
    /// Evaluate the single run at this local time, e.g. 2026-10-12T09:50
    #[arg(long, value_parser = super::parse_at, requires = "once")]
    at: Option<NaiveDateTime>,
}

/// Reminders already shown, keyed by date, subject and slot.
#[derive(Debug, Default)]
pub struct ReminderLog {
    shown: HashSet<(NaiveDate, String, String)>,
}

impl ReminderLog {
    /// Returns true the first time a (date, subject, slot) is seen.
    pub fn first_sighting(&mut self, date: NaiveDate, subject: &str, slot: &str) -> bool {
        self.shown.retain(|(d, _, _)| *d == date);
        self.shown
            .insert((date, subject.to_string(), slot.to_string()))
    }
}

struct Watcher {
    aggregator: DashboardAggregator,
    source: JsonFileSource,
    reminders: ReminderLog,
    last_active: Vec<String>,
}

impl Watcher {
    fn view(&self, now: NaiveDateTime) -> Result<TodayView, Box<dyn std::error::Error>> {
        let timetable = self.source.timetable()?;
        let records = self.source.attendance_records()?;
        Ok(self.aggregator.today_view(&timetable.entries, &records, now))
    }

    fn check_active(&mut self, now: NaiveDateTime) -> Result<(), Box<dyn std::error::Error>> {
        let view = self.view(now)?;
        let active: Vec<String> = view
            .active
            .iter()
            .map(|c| format!("{} ({})", c.subject, c.slot))
            .collect();
        if active != self.last_active {
            if active.is_empty() {
                println!("{} no class in session", now.format("%H:%M"));
            } else {
                println!("{} in session: {}", now.format("%H:%M"), active.join(", "));
            }
            self.last_active = active;
        }
        Ok(())
    }

    fn check_reminders(&mut self, now: NaiveDateTime) -> Result<(), Box<dyn std::error::Error>> {
        let view = self.view(now)?;
        for class in &view.reminders {
            if self
                .reminders
                .first_sighting(view.date, &class.subject, &class.time_slot)
            {
                println!(
                    "{} reminder: mark attendance for {} ({})",
                    now.format("%H:%M"),
                    class.subject,
                    class.slot
                );
            }
        }
        Ok(())
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

async fn watch_loop(mut watcher: Watcher, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut active_tick =
        tokio::time::interval(Duration::from_secs(config.polling.active_check_secs.max(1)));
    let mut reminder_tick =
        tokio::time::interval(Duration::from_secs(config.polling.reminder_check_secs.max(1)));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        active_check_secs = config.polling.active_check_secs,
        reminder_check_secs = config.polling.reminder_check_secs,
        "watching timetable"
    );

    loop {
        tokio::select! {
            _ = active_tick.tick() => {
                if let Err(err) = watcher.check_active(now()) {
                    warn!(error = %err, "active class check failed");
                }
            }
            _ = reminder_tick.tick() => {
                if let Err(err) = watcher.check_reminders(now()) {
                    warn!(error = %err, "reminder check failed");
                }
            }
            _ = &mut shutdown => {
                info!("stopping watch");
                break;
            }
        }
    }
    Ok(())
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let reminder_window_secs = u64::from(config.schedule.reminder_window_minutes) * 60;
    if config.polling.reminder_check_secs > reminder_window_secs {
        warn!(
            reminder_check_secs = config.polling.reminder_check_secs,
            reminder_window_secs, "reminder polling is slower than the reminder window"
        );
    }

    let mut watcher = Watcher {
        aggregator: config.aggregator()?,
        source: args.source.source(&config),
        reminders: ReminderLog::default(),
        last_active: Vec::new(),
    };

    if args.once {
        let now = args.at.unwrap_or_else(now);
        watcher.check_active(now)?;
        watcher.check_reminders(now)?;
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch_loop(watcher, &config))
}
