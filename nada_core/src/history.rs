//! History aggregation into weekly and monthly buckets.
//!
//! Buckets are keyed by the local calendar date their week or month starts
//! on and only exist when at least one entry falls inside them.

use crate::calendar::{bucket_date, start_of_day};
use crate::{Bucket, EntryLog, Granularity, HistorySummary};
use chrono::{DateTime, NaiveDate, TimeZone, Weekday};
use std::collections::BTreeMap;

/// Default number of weekly buckets kept for charts
pub const DEFAULT_WEEKLY_LIMIT: usize = 12;

/// Groups entries into calendar buckets
#[derive(Clone, Copy, Debug)]
pub struct HistoryAggregator {
    first_weekday: Weekday,
    weekly_limit: usize,
}

impl Default for HistoryAggregator {
    fn default() -> Self {
        Self {
            first_weekday: Weekday::Mon,
            weekly_limit: DEFAULT_WEEKLY_LIMIT,
        }
    }
}

impl HistoryAggregator {
    pub fn new(first_weekday: Weekday, weekly_limit: usize) -> Self {
        Self {
            first_weekday,
            weekly_limit,
        }
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    /// Bucket the log, oldest bucket first
    ///
    /// Weekly output keeps only the most recent `weekly_limit` buckets.
    pub fn aggregate<Tz: TimeZone>(
        &self,
        log: &EntryLog,
        granularity: Granularity,
        tz: &Tz,
    ) -> Vec<Bucket> {
        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for timestamp in log.timestamps() {
            let key = bucket_date(&timestamp, granularity, self.first_weekday, tz);
            *counts.entry(key).or_default() += 1;
        }

        let skip = match granularity {
            Granularity::Weekly => counts.len().saturating_sub(self.weekly_limit),
            Granularity::Monthly => 0,
        };

        let buckets: Vec<Bucket> = counts
            .into_iter()
            .skip(skip)
            .map(|(date, count)| Bucket {
                start: start_of_day(date, tz),
                count,
            })
            .collect();

        tracing::debug!(
            "Aggregated {} entries into {} {} buckets ({} dropped)",
            log.len(),
            buckets.len(),
            granularity,
            skip
        );

        buckets
    }

    /// Total entries and entries in the month containing `now`
    pub fn summary<Tz: TimeZone>(&self, log: &EntryLog, now: &DateTime<Tz>) -> HistorySummary {
        let tz = now.timezone();
        let this_month_key = bucket_date(
            &now.with_timezone(&chrono::Utc),
            Granularity::Monthly,
            self.first_weekday,
            &tz,
        );

        let this_month = log
            .timestamps()
            .filter(|ts| bucket_date(ts, Granularity::Monthly, self.first_weekday, &tz) == this_month_key)
            .count();

        HistorySummary {
            total_entries: log.len(),
            this_month,
        }
    }
}
