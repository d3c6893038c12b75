//! Core domain types for the Nada log.
//!
//! This module defines the fundamental types used throughout the system:
//! - Entries and the newest-first entry log
//! - Streak results
//! - History buckets and granularity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Entry Types
// ============================================================================

/// A recorded "did nothing" mark
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub id: Uuid,
    /// Absent only in damaged or hand-edited data; such entries are ignored
    /// by streak and bucket computations.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Entry {
    /// Create a new entry with a fresh id
    pub fn new(timestamp: DateTime<Utc>, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Some(timestamp),
            note,
        }
    }
}

/// Entries ordered newest first
///
/// Entries without a timestamp sit at the end. Every constructor upholds this
/// ordering, so consumers can walk the log without re-checking it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryLog {
    entries: Vec<Entry>,
}

impl EntryLog {
    /// Build a log from entries in any order
    pub fn new(mut entries: Vec<Entry>) -> Self {
        // `None` < `Some` for Option, so reversing puts untimed entries last
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { entries }
    }

    /// Wrap entries the caller has already sorted newest first
    pub fn from_sorted(entries: Vec<Entry>) -> Self {
        debug_assert!(
            entries
                .windows(2)
                .all(|w| w[0].timestamp >= w[1].timestamp),
            "entries must be sorted newest first"
        );
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamps of all dated entries, newest first
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.entries.iter().filter_map(|e| e.timestamp)
    }

    /// The most recent dated entry
    pub fn latest(&self) -> Option<&Entry> {
        self.entries.iter().find(|e| e.timestamp.is_some())
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

impl FromIterator<Entry> for EntryLog {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ============================================================================
// Derived Results
// ============================================================================

/// Current and longest streak, in distinct days
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    pub current: u32,
    pub longest: u32,
}

/// Bucket size for history aggregation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Weekly,
    Monthly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Weekly => f.write_str("weekly"),
            Granularity::Monthly => f.write_str("monthly"),
        }
    }
}

impl FromStr for Granularity {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Granularity::Weekly),
            "monthly" | "month" => Ok(Granularity::Monthly),
            other => Err(crate::Error::Other(format!(
                "Unknown granularity: {} (expected weekly or monthly)",
                other
            ))),
        }
    }
}

/// A calendar-aligned group of entries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// First instant of the week or month, in the zone the log was bucketed in
    pub start: DateTime<Utc>,
    pub count: usize,
}

/// Scalar statistics shown next to the history chart
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_entries: usize,
    pub this_month: usize,
}
