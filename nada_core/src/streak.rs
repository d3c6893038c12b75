//! Streak calculation over the entry log.
//!
//! A streak is a run of consecutive local calendar days with at least one
//! entry. Several entries on one day count once. Whether two adjacent days
//! actually continue a run is decided by a [`ContinuationPolicy`]:
//!
//! - **Grace window** (default): the days must be one calendar day apart AND
//!   the elapsed time between the marks must be under the window (26 hours).
//!   The same window decides whether a streak whose last mark was yesterday
//!   is still alive.
//! - **Calendar day**: one calendar day apart is enough.
//!
//! The calculator holds no state; every call recomputes from the log.

use crate::calendar::day_difference;
use crate::{EntryLog, StreakResult};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Default grace window in hours
pub const DEFAULT_GRACE_HOURS: i64 = 26;

/// Rule deciding whether two marks on adjacent days continue a streak
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContinuationPolicy {
    /// Adjacent days whose marks are less than the given duration apart
    GraceWindow(Duration),
    /// Any marks on adjacent calendar days
    CalendarDay,
}

impl Default for ContinuationPolicy {
    fn default() -> Self {
        ContinuationPolicy::GraceWindow(Duration::hours(DEFAULT_GRACE_HOURS))
    }
}

impl ContinuationPolicy {
    fn continues(&self, day_gap: i64, elapsed: Duration) -> bool {
        match self {
            ContinuationPolicy::GraceWindow(grace) => day_gap == 1 && elapsed < *grace,
            ContinuationPolicy::CalendarDay => day_gap == 1,
        }
    }

    fn keeps_alive(&self, elapsed: Duration) -> bool {
        match self {
            ContinuationPolicy::GraceWindow(grace) => elapsed < *grace,
            ContinuationPolicy::CalendarDay => true,
        }
    }
}

/// Relation between an entry and the next older one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    SameDay,
    Continued,
    Broken,
}

/// Computes current and longest streaks
#[derive(Clone, Copy, Debug, Default)]
pub struct StreakCalculator {
    policy: ContinuationPolicy,
}

impl StreakCalculator {
    pub fn new(policy: ContinuationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ContinuationPolicy {
        self.policy
    }

    /// Compute both streaks as of `now`
    ///
    /// Day boundaries are taken from the time zone `now` is expressed in.
    pub fn calculate<Tz: TimeZone>(&self, log: &EntryLog, now: &DateTime<Tz>) -> StreakResult {
        let tz = now.timezone();
        let now = now.with_timezone(&Utc);
        let steps = self.steps(log, &tz);

        let current = self.current_from_steps(log, &steps, &now, &tz);
        let longest = longest_from_steps(log, &steps).max(current);

        tracing::debug!(
            "Computed streaks over {} entries: current={}, longest={}",
            log.len(),
            current,
            longest
        );

        StreakResult { current, longest }
    }

    /// Current streak only
    pub fn current_streak<Tz: TimeZone>(&self, log: &EntryLog, now: &DateTime<Tz>) -> u32 {
        let tz = now.timezone();
        let steps = self.steps(log, &tz);
        self.current_from_steps(log, &steps, &now.with_timezone(&Utc), &tz)
    }

    /// Whether the most recent mark still counts toward a live streak
    pub fn is_alive<Tz: TimeZone>(&self, latest: &DateTime<Utc>, now: &DateTime<Utc>, tz: &Tz) -> bool {
        match day_difference(latest, now, tz) {
            // Marks stamped after `now` (clock skew between devices) count as today
            gap if gap <= 0 => true,
            1 => self.policy.keeps_alive(*now - *latest),
            _ => false,
        }
    }

    fn current_from_steps<Tz: TimeZone>(
        &self,
        log: &EntryLog,
        steps: &[Step],
        now: &DateTime<Utc>,
        tz: &Tz,
    ) -> u32 {
        let Some(latest) = log.timestamps().next() else {
            return 0;
        };
        if !self.is_alive(&latest, now, tz) {
            return 0;
        }

        let continued = steps
            .iter()
            .take_while(|step| **step != Step::Broken)
            .filter(|step| **step == Step::Continued)
            .count();
        1 + continued as u32
    }

    /// Classify each adjacent pair of dated entries, newest first
    fn steps<Tz: TimeZone>(&self, log: &EntryLog, tz: &Tz) -> Vec<Step> {
        let timestamps: Vec<DateTime<Utc>> = log.timestamps().collect();
        timestamps
            .windows(2)
            .map(|pair| {
                let (newer, older) = (&pair[0], &pair[1]);
                match day_difference(older, newer, tz) {
                    0 => Step::SameDay,
                    gap if self.policy.continues(gap, *newer - *older) => Step::Continued,
                    _ => Step::Broken,
                }
            })
            .collect()
    }
}

fn longest_from_steps(log: &EntryLog, steps: &[Step]) -> u32 {
    if log.latest().is_none() {
        return 0;
    }

    let mut run = 1u32;
    let mut best = 1u32;
    for step in steps {
        match step {
            Step::SameDay => {}
            Step::Continued => {
                run += 1;
                best = best.max(run);
            }
            Step::Broken => run = 1,
        }
    }
    best
}
