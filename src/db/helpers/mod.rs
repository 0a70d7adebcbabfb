use std::{collections::BTreeMap, convert::TryFrom};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn to_u64(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("{field} contains negative value {value}"))
}

pub fn to_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} contains out-of-range value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_checklist(value: &str) -> Result<BTreeMap<String, bool>> {
    serde_json::from_str(value).context("failed to parse checklist")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_reject_out_of_range_values() {
        assert!(to_i64(u64::MAX).is_err());
        assert!(to_u64(-1, "income").is_err());
        assert_eq!(to_u32(60, "practice_minutes").unwrap(), 60);
        assert!(to_u32(i64::MAX, "practice_minutes").is_err());
    }

    #[test]
    fn datetimes_round_trip_through_rfc3339() {
        let now = Utc::now();
        assert_eq!(parse_datetime(&now.to_rfc3339(), "created_at").unwrap(), now);
        assert!(parse_datetime("yesterday", "created_at").is_err());
    }
}
