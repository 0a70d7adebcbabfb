//! Validation for logged values before they reach the store.

use anyhow::{bail, Result};

const MAX_SLEEP_HOURS: f64 = 24.0;
const HEAVINESS_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Outreach messages that count toward the day; more are stored as the cap.
pub const OUTREACH_CAP: u32 = 3;
/// Practice minutes that count toward the day.
pub const PRACTICE_MINUTES_CAP: u32 = 60;

pub fn validate_sleep_hours(hours: f64) -> Result<()> {
    if !hours.is_finite() {
        bail!("sleep hours must be a number");
    }
    if !(0.0..=MAX_SLEEP_HOURS).contains(&hours) {
        bail!("sleep hours must be between 0 and 24");
    }
    Ok(())
}

pub fn validate_heaviness(score: u8) -> Result<()> {
    if !HEAVINESS_RANGE.contains(&score) {
        bail!("heaviness must be between 1 and 5");
    }
    Ok(())
}

pub fn validate_note(note: &str) -> Result<()> {
    if note.len() > 4_000 {
        bail!("note too long (max 4,000 chars)");
    }
    Ok(())
}
