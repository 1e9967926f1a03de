//! Read-side shaping of a reminder set for the reminders screen.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::reminder_date;
use crate::models::{Reminder, ReminderStatus};

/// Reminders split for display. `upcoming` is every reminder not dated
/// `reference_date`, past dates included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayGroups {
    pub today: Vec<Reminder>,
    pub upcoming: Vec<Reminder>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: u32,
    pub completed: u32,
    pub missed: u32,
}

/// Everything the reminders screen renders in one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderBoard {
    pub date: NaiveDate,
    pub groups: DayGroups,
    pub counts: StatusCounts,
}

pub fn group_by_day(reminders: &[Reminder], reference_date: NaiveDate) -> DayGroups {
    let (today, upcoming): (Vec<Reminder>, Vec<Reminder>) = reminders
        .iter()
        .cloned()
        .partition(|r| reminder_date(r) == reference_date);
    DayGroups { today, upcoming }
}

pub fn status_counts(reminders: &[Reminder]) -> StatusCounts {
    reminders
        .iter()
        .fold(StatusCounts::default(), |mut counts, r| {
            match r.status {
                ReminderStatus::Pending => counts.pending += 1,
                ReminderStatus::Completed => counts.completed += 1,
                ReminderStatus::Missed => counts.missed += 1,
            }
            counts
        })
}

pub fn build_board(reminders: &[Reminder], today: NaiveDate) -> ReminderBoard {
    ReminderBoard {
        date: today,
        groups: group_by_day(reminders, today),
        counts: status_counts(reminders),
    }
}

/// "Today", "Tomorrow", otherwise month/day without padding ("3/7").
pub fn day_label(scheduled: NaiveDateTime, today: NaiveDate) -> String {
    let date = scheduled.date();
    if date == today {
        "Today".into()
    } else if today.succ_opt() == Some(date) {
        "Tomorrow".into()
    } else {
        format!("{}/{}", date.month(), date.day())
    }
}

/// 12-hour clock label, e.g. "8:05 PM".
pub fn time_label(scheduled: NaiveDateTime) -> String {
    let (is_pm, hour) = scheduled.hour12();
    let period = if is_pm { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour, scheduled.minute(), period)
}
