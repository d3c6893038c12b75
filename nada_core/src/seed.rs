//! Sample data for demos and manual testing.

use crate::calendar::start_of_day;
use crate::Entry;
use chrono::{Duration, NaiveDate, TimeZone};

const SAMPLE_NOTES: [&str; 5] = [
    "Perfectly did nothing today!",
    "Resisted the urge to be productive",
    "A masterclass in doing nothing",
    "Achievement unlocked: Zero tasks completed",
    "Pure relaxation day",
];

/// Length of the generated streak
pub const SEED_DAYS: i64 = 30;

/// One entry at local midnight for each of the last 30 days, today included
///
/// Every third and fourth day carries a note.
pub fn one_month_streak<Tz: TimeZone>(today: NaiveDate, tz: &Tz) -> Vec<Entry> {
    (0..SEED_DAYS)
        .map(|day| {
            let date = today - Duration::days(day);
            let note = (day % 3 == 0 || day % 4 == 0)
                .then(|| SAMPLE_NOTES[(day as usize) % SAMPLE_NOTES.len()].to_string());
            Entry::new(start_of_day(date, tz), note)
        })
        .collect()
}
