//! Matching a weekly timetable against an injected wall-clock instant.
//!
//! Nothing here reads the system clock; `now` always comes from the caller.
//!
//! A slot counts as active for a fixed window measured from its *start*
//! (one hour by default), not until its declared end. A 40-minute slot
//! starting at 09:00 is therefore still active at 09:50.
//!
//! Windows are anchored to `now`'s date and never carry into the next day:
//! matching is per weekday, so after midnight only the new day's entries
//! are considered. A slot whose reminder window would open after 23:59:59
//! gets no reminder, and an active window running past midnight ends there.

use chrono::{Duration, NaiveDateTime};

use super::{Day, TimeSlot, TimetableEntry};
use crate::attendance::AttendanceRecord;
use crate::error::TimeSlotError;

/// Window lengths used to classify slots relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleMatcher {
    /// Measured from slot start
    active_window: Duration,
    /// Gap between slot end and the reminder window opening
    reminder_delay: Duration,
    reminder_window: Duration,
}

impl Default for ScheduleMatcher {
    fn default() -> Self {
        Self {
            active_window: Duration::minutes(60),
            reminder_delay: Duration::minutes(10),
            reminder_window: Duration::minutes(5),
        }
    }
}

impl ScheduleMatcher {
    /// Matcher with the default 60/10/5 minute windows.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active_window(mut self, minutes: u32) -> Self {
        self.active_window = Duration::minutes(i64::from(minutes));
        self
    }

    pub fn with_reminder_window(mut self, delay_minutes: u32, window_minutes: u32) -> Self {
        self.reminder_delay = Duration::minutes(i64::from(delay_minutes));
        self.reminder_window = Duration::minutes(i64::from(window_minutes));
        self
    }

    pub fn active_window(&self) -> Duration {
        self.active_window
    }

    /// Entries scheduled on `day`, in timetable order.
    pub fn entries_for_day<'a, I>(&self, timetable: I, day: Day) -> Vec<&'a TimetableEntry>
    where
        I: IntoIterator<Item = &'a TimetableEntry>,
    {
        timetable
            .into_iter()
            .filter(|entry| entry.day_of_week == day)
            .collect()
    }

    /// Entries for the weekday of `now`. Empty on Sundays.
    pub fn todays_entries<'a, I>(&self, timetable: I, now: NaiveDateTime) -> Vec<&'a TimetableEntry>
    where
        I: IntoIterator<Item = &'a TimetableEntry>,
    {
        match Day::of(now.date()) {
            Some(day) => self.entries_for_day(timetable, day),
            None => Vec::new(),
        }
    }

    /// `start <= now <= start + active_window`, inclusive at both ends.
    pub fn slot_is_active(&self, slot: &TimeSlot, now: NaiveDateTime) -> bool {
        let start = now.date().and_time(slot.start);
        now >= start && now <= start + self.active_window
    }

    /// `end + delay <= now <= end + delay + window`, inclusive at both ends.
    pub fn in_reminder_window(&self, slot: &TimeSlot, now: NaiveDateTime) -> bool {
        let opens = now.date().and_time(slot.end) + self.reminder_delay;
        let closes = opens + self.reminder_window;
        now >= opens && now <= closes
    }

    pub fn is_active(&self, entry: &TimetableEntry, now: NaiveDateTime) -> Result<bool, TimeSlotError> {
        Ok(self.slot_is_active(&entry.slot()?, now))
    }

    /// True when `now` is inside the reminder window and no record exists on
    /// `now`'s date for the entry's subject.
    pub fn is_reminder_due(
        &self,
        entry: &TimetableEntry,
        now: NaiveDateTime,
        records_today: &[AttendanceRecord],
    ) -> Result<bool, TimeSlotError> {
        let slot = entry.slot()?;
        if !self.in_reminder_window(&slot, now) {
            return Ok(false);
        }
        let today = now.date();
        let marked = records_today
            .iter()
            .any(|r| r.date == today && r.subject == entry.subject);
        Ok(!marked)
    }

    /// Entries in session at `now`. Fails on the first malformed slot.
    pub fn active_entries<'a, I>(
        &self,
        todays_entries: I,
        now: NaiveDateTime,
    ) -> Result<Vec<&'a TimetableEntry>, TimeSlotError>
    where
        I: IntoIterator<Item = &'a TimetableEntry>,
    {
        let mut active = Vec::new();
        for entry in todays_entries {
            if self.is_active(entry, now)? {
                active.push(entry);
            }
        }
        Ok(active)
    }

    /// Entries that ended recently and still have no attendance record.
    ///
    /// Stateless: calling this repeatedly inside one window reports the same
    /// entries every time. Fails on the first malformed slot.
    pub fn due_reminders<'a, I>(
        &self,
        todays_entries: I,
        now: NaiveDateTime,
        records_today: &[AttendanceRecord],
    ) -> Result<Vec<&'a TimetableEntry>, TimeSlotError>
    where
        I: IntoIterator<Item = &'a TimetableEntry>,
    {
        let mut due = Vec::new();
        for entry in todays_entries {
            if self.is_reminder_due(entry, now, records_today)? {
                due.push(entry);
            }
        }
        Ok(due)
    }
}
