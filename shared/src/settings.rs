//! Engine settings that callers may override
//!
//! The defaults encode the regional harvest calendar the farm records were
//! collected under. They are values, not rules: load different ones per region.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{validate_month, validate_month_day, validate_relocation_threshold};

/// Default maximum distance a manual relocation may move a tree
pub const DEFAULT_MAX_RELOCATION_METERS: f64 = 5.0;

/// Invalid engine settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: &'static str },
}

/// Tunable engine parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Relocations farther than this from the previous position are rejected
    pub max_relocation_meters: f64,

    /// Calendar used to guess a season end date that was never recorded
    pub harvest_calendar: HarvestCalendar,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_relocation_meters: DEFAULT_MAX_RELOCATION_METERS,
            harvest_calendar: HarvestCalendar::default(),
        }
    }
}

impl EngineSettings {
    /// Check every setting, reporting the first invalid key
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_relocation_threshold(self.max_relocation_meters).map_err(|message| {
            SettingsError::Invalid {
                key: "engine.max_relocation_meters",
                message,
            }
        })?;
        self.harvest_calendar.validate()
    }
}

/// Fallback harvest calendar for season records missing an end date.
///
/// Months are 1-based. With the defaults, a record read before August is
/// assumed to belong to the season that closed on September 30 of the previous
/// year; from August onwards, to the one closing September 30 of this year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HarvestCalendar {
    /// First month in which the current year's season is assumed to be the latest
    pub cutoff_month: u32,
    pub season_end_month: u32,
    pub season_end_day: u32,
}

impl Default for HarvestCalendar {
    fn default() -> Self {
        Self {
            cutoff_month: 8,
            season_end_month: 9,
            season_end_day: 30,
        }
    }
}

impl HarvestCalendar {
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_month(self.cutoff_month).map_err(|message| SettingsError::Invalid {
            key: "engine.harvest_calendar.cutoff_month",
            message,
        })?;
        validate_month_day(self.season_end_month, self.season_end_day).map_err(|message| {
            SettingsError::Invalid {
                key: "engine.harvest_calendar.season_end_day",
                message,
            }
        })
    }

    /// Season year assumed for a record read at `now`
    pub fn assumed_season_year(&self, now: DateTime<Utc>) -> i32 {
        if now.month() < self.cutoff_month {
            now.year() - 1
        } else {
            now.year()
        }
    }

    /// Estimated end of the most recent season, at 00:00 UTC of the end day.
    ///
    /// An invalid month/day is walked back to the last existing day of the
    /// month so the estimate is always defined.
    pub fn estimate_season_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let year = self.assumed_season_year(now);
        let month = self.season_end_month.clamp(1, 12);
        let date = (1..=self.season_end_day.clamp(1, 31))
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .unwrap_or(NaiveDate::MIN);
        Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
    }
}
