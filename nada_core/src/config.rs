//! Configuration file support for Nada.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/nada/config.toml`.

use crate::history::DEFAULT_WEEKLY_LIMIT;
use crate::streak::DEFAULT_GRACE_HOURS;
use crate::{ContinuationPolicy, Error, HistoryAggregator, Result, StreakCalculator};
use chrono::{Duration, Weekday};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub streak: StreakConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Which continuation rule streaks use
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    GraceWindow,
    CalendarDay,
}

/// Streak rules
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreakConfig {
    #[serde(default)]
    pub policy: PolicyKind,

    /// Only used by the grace window policy
    #[serde(default = "default_grace_hours")]
    pub grace_hours: i64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            grace_hours: default_grace_hours(),
        }
    }
}

/// Largest accepted grace window: a week
///
/// Marks on adjacent days are never more than about 49 hours apart, so any
/// larger window already behaves like the calendar day rule.
pub const MAX_GRACE_HOURS: i64 = 7 * 24;

impl StreakConfig {
    /// Unvalidated values are clamped into `1..=MAX_GRACE_HOURS`
    pub fn policy(&self) -> ContinuationPolicy {
        match self.policy {
            PolicyKind::GraceWindow => {
                let hours = self.grace_hours.clamp(1, MAX_GRACE_HOURS);
                ContinuationPolicy::GraceWindow(Duration::hours(hours))
            }
            PolicyKind::CalendarDay => ContinuationPolicy::CalendarDay,
        }
    }
}

/// History view settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_first_weekday")]
    pub first_weekday: Weekday,

    #[serde(default = "default_weekly_limit")]
    pub weekly_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            first_weekday: default_first_weekday(),
            weekly_limit: default_weekly_limit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("nada")
}

fn default_grace_hours() -> i64 {
    DEFAULT_GRACE_HOURS
}

fn default_first_weekday() -> Weekday {
    Weekday::Mon
}

fn default_weekly_limit() -> usize {
    DEFAULT_WEEKLY_LIMIT
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the calculators cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_GRACE_HOURS).contains(&self.streak.grace_hours) {
            return Err(Error::Config(format!(
                "streak.grace_hours must be between 1 and {}, got {}",
                MAX_GRACE_HOURS, self.streak.grace_hours
            )));
        }
        if self.history.weekly_limit == 0 {
            return Err(Error::Config("history.weekly_limit must be at least 1".into()));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("nada").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn streak_calculator(&self) -> StreakCalculator {
        StreakCalculator::new(self.streak.policy())
    }

    pub fn history_aggregator(&self) -> HistoryAggregator {
        HistoryAggregator::new(self.history.first_weekday, self.history.weekly_limit)
    }
}
