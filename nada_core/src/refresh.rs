//! Day-boundary recomputation.
//!
//! Derived numbers depend on "today", so they go stale at local midnight even
//! when no entry changes. Callers schedule a [`recompute`] at
//! [`next_refresh_at`]; each run pulls a fresh snapshot from an
//! [`EntrySource`] and feeds it to the stateless calculators.

use crate::calendar::next_day_boundary;
use crate::milestones::can_mark_today;
use crate::store::JsonlStore;
use crate::{EntryLog, HistoryAggregator, HistorySummary, Result, StreakCalculator, StreakResult};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Provides a consistent snapshot of all entries
pub trait EntrySource {
    fn snapshot(&self) -> Result<EntryLog>;
}

impl EntrySource for JsonlStore {
    fn snapshot(&self) -> Result<EntryLog> {
        self.load()
    }
}

impl EntrySource for EntryLog {
    fn snapshot(&self) -> Result<EntryLog> {
        Ok(self.clone())
    }
}

/// Everything the status view shows, computed at one instant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub computed_at: DateTime<Utc>,
    pub streaks: StreakResult,
    pub summary: HistorySummary,
    pub can_mark_today: bool,
}

/// Fetch a fresh log and derive all statistics from it
pub fn recompute<S, Tz>(
    source: &S,
    calculator: &StreakCalculator,
    aggregator: &HistoryAggregator,
    now: &DateTime<Tz>,
) -> Result<Snapshot>
where
    S: EntrySource + ?Sized,
    Tz: TimeZone,
{
    let log = source.snapshot()?;
    let snapshot = Snapshot {
        computed_at: now.with_timezone(&Utc),
        streaks: calculator.calculate(&log, now),
        summary: aggregator.summary(&log, now),
        can_mark_today: can_mark_today(&log, now),
    };

    tracing::info!(
        "Recomputed at {}: current={}, longest={}",
        snapshot.computed_at,
        snapshot.streaks.current,
        snapshot.streaks.longest
    );
    Ok(snapshot)
}

/// When derived statistics next go stale
pub fn next_refresh_at<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    next_day_boundary(now)
}

/// Time left until the next refresh
pub fn time_until_refresh<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    next_refresh_at(now) - now.with_timezone(&Utc)
}
