//! Calendar-day keys and local-time formatting for a fixed IANA zone.
//!
//! Every record is keyed by the calendar day *as seen in the configured zone*,
//! so "today" is derived from the zone, never from the host's local time.

pub mod calendar;

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use calendar::{days_to_payday, is_near_due_day, next_due_date, DueDate};

pub const DEFAULT_TIMEZONE: &str = "Asia/Jakarta";

/// Canonical `YYYY-MM-DD` key for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn days_before(&self, days: u64) -> Self {
        Self(self.0.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map(Self)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for DayKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for DayKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/// Resolves wall-clock instants to day keys in one fixed zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    tz: Tz,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            tz: chrono_tz::Asia::Jakarta,
        }
    }
}

impl Clock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let tz: Tz = name
            .parse()
            .map_err(|err| anyhow!("unknown timezone '{name}': {err}"))?;
        Ok(Self { tz })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn day_key(&self, now: DateTime<Utc>) -> DayKey {
        DayKey(now.with_timezone(&self.tz).date_naive())
    }

    pub fn today(&self) -> DayKey {
        self.day_key(Utc::now())
    }

    /// `YYYY-MM-DD HH:MM` in the configured zone.
    pub fn format_local(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.tz).format("%Y-%m-%d %H:%M").to_string()
    }
}

/// `days` keys ending at `today`, most recent first.
pub fn keys_back(today: DayKey, days: usize) -> Vec<DayKey> {
    (0..days as u64).map(|offset| today.days_before(offset)).collect()
}
