//! Display helpers: deadline formatting and upcoming/past listing.

use chrono::{Duration, Local, NaiveDateTime};
use clap::ValueEnum;

use crate::assignment::{Assignment, Priority, DATE_FORMAT};
use crate::store::Assignments;

pub const LONG_FORMAT: &str = "%A, %B %d %Y at %H:%M";

/// A named assignment as shown in listings.
pub type Entry = (String, Assignment);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeFormat {
    Short,
    #[default]
    Long,
    Relative,
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn format_deadline(deadline: NaiveDateTime, style: TimeFormat) -> String {
    format_deadline_at(deadline, style, now())
}

/// Format against an explicit clock. `now` only matters for [`TimeFormat::Relative`].
pub fn format_deadline_at(deadline: NaiveDateTime, style: TimeFormat, now: NaiveDateTime) -> String {
    match style {
        TimeFormat::Short => deadline.format(DATE_FORMAT).to_string(),
        TimeFormat::Long => deadline.format(LONG_FORMAT).to_string(),
        TimeFormat::Relative => {
            // Thresholds are elapsed time, not calendar days.
            let delta = deadline.signed_duration_since(now);
            let days = floor_days(delta);
            if delta < Duration::zero() {
                format!("{} days ago", days.abs())
            } else if delta < Duration::days(1) {
                "Today".to_string()
            } else if delta < Duration::days(2) {
                "Tomorrow".to_string()
            } else {
                format!("In {} days", days)
            }
        }
    }
}

fn floor_days(delta: Duration) -> i64 {
    let days = delta.num_days();
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Split into `(upcoming, past)` around `now`, each sorted by deadline.
/// A deadline equal to `now` counts as upcoming.
pub fn partition_and_sort(assignments: &Assignments, now: NaiveDateTime) -> (Vec<Entry>, Vec<Entry>) {
    let (mut upcoming, mut past): (Vec<Entry>, Vec<Entry>) = assignments
        .iter()
        .map(|(name, assignment)| (name.clone(), assignment.clone()))
        .partition(|(_, assignment)| !assignment.is_past(now));

    upcoming.sort_by_key(|(_, assignment)| assignment.deadline);
    past.sort_by_key(|(_, assignment)| assignment.deadline);
    (upcoming, past)
}

/// Upcoming entries, then past ones when `include_past`, capped at `limit`.
/// A limit of zero or less yields nothing.
pub fn render_list<T>(upcoming: Vec<T>, past: Vec<T>, include_past: bool, limit: i64) -> Vec<T> {
    let limit = usize::try_from(limit).unwrap_or(0);
    let past = if include_past { past } else { Vec::new() };
    upcoming.into_iter().chain(past).take(limit).collect()
}

pub fn priority_stars(priority: Priority) -> String {
    "⭐".repeat(priority.get() as usize)
}

/// Multi-line summary used as the body of a listing entry.
pub fn format_assignment(name: &str, assignment: &Assignment, now: NaiveDateTime) -> String {
    let deadline = format_deadline_at(assignment.deadline, TimeFormat::Relative, now);
    let details = if assignment.details.is_empty() {
        "No details provided"
    } else {
        assignment.details.as_str()
    };
    format!("**{}**\n⏰ {}\n📝 {}\n", name, deadline, details)
}
