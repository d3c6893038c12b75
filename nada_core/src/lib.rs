#![forbid(unsafe_code)]

//! Core domain model and streak engine for Nada, a "did nothing today" log.
//!
//! This crate provides:
//! - Domain types (entries, the newest-first entry log, buckets)
//! - Streak calculation with a configurable continuation policy
//! - Weekly and monthly history aggregation
//! - Achievements and day-boundary refresh
//! - Persistence glue (JSONL store, CSV export, config)
//!
//! The calculators are pure: they read an [`EntryLog`] snapshot and a
//! caller-supplied "now", and keep nothing between calls.

pub mod types;
pub mod error;
pub mod calendar;
pub mod config;
pub mod logging;
pub mod streak;
pub mod history;
pub mod milestones;
pub mod refresh;
pub mod store;
pub mod export;
pub mod seed;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use streak::{ContinuationPolicy, StreakCalculator};
pub use history::HistoryAggregator;
pub use milestones::{can_mark_today, Achievement, StreakTier};
pub use refresh::{recompute, EntrySource, Snapshot};
pub use store::{EntrySink, JsonlStore};
