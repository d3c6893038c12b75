//! Achievements and motivation tiers derived from streak results.

use crate::calendar::local_date;
use crate::{EntryLog, StreakResult};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// A milestone reached by the current streak
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    SevenDayStreak,
    ThirtyDayStreak,
    PersonalBest,
}

impl Achievement {
    /// Achievement unlocked by a freshly computed result, if any
    ///
    /// Meant to be called right after a new mark; the exact-match thresholds
    /// fire once per streak.
    pub fn check(result: &StreakResult) -> Option<Self> {
        match result.current {
            7 => Some(Achievement::SevenDayStreak),
            30 => Some(Achievement::ThirtyDayStreak),
            n if n > 7 && n == result.longest => Some(Achievement::PersonalBest),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Achievement::SevenDayStreak => {
                "7 Day Streak! You're becoming a master of doing nothing!"
            }
            Achievement::ThirtyDayStreak => "30 Day Streak! You're a legendary nothing-doer!",
            Achievement::PersonalBest => "New Personal Best! Keep going!",
        }
    }
}

/// Encouragement level for a current streak length
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StreakTier {
    Start,
    GreatStart,
    OnFire,
    IncredibleWeek,
    Unstoppable,
    Legendary,
}

impl StreakTier {
    pub fn for_streak(current: u32) -> Self {
        match current {
            0 => StreakTier::Start,
            1..=2 => StreakTier::GreatStart,
            3..=6 => StreakTier::OnFire,
            7..=13 => StreakTier::IncredibleWeek,
            14..=29 => StreakTier::Unstoppable,
            _ => StreakTier::Legendary,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StreakTier::Start => "Start your journey!",
            StreakTier::GreatStart => "Great start!",
            StreakTier::OnFire => "You're on fire!",
            StreakTier::IncredibleWeek => "Incredible week!",
            StreakTier::Unstoppable => "Unstoppable!",
            StreakTier::Legendary => "Legendary!",
        }
    }
}

/// Whether a new mark would land on a day not yet marked
pub fn can_mark_today<Tz: TimeZone>(log: &EntryLog, now: &DateTime<Tz>) -> bool {
    match log.latest().and_then(|e| e.timestamp) {
        Some(latest) => local_date(&latest, &now.timezone()) != now.date_naive(),
        None => true,
    }
}
