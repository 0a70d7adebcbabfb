//! Daily state log: sleep, meals, breathing, drop sessions and the day's rituals.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation;
use crate::time::DayKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date_key: DayKey,
    pub sleep_hours: f64,
    pub meals_count: u32,
    pub breath_sessions: u32,
    /// Emergency "drop" sessions used today
    pub drop_sessions: u32,
    /// Subjective heaviness, 1 (light) to 5 (heavy)
    pub heaviness: Option<u8>,
    pub morning_practice_done: bool,
    pub ritual_done: bool,
    pub freeze_mode: bool,
    #[serde(default)]
    pub checklist: BTreeMap<String, bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyRecord {
    pub fn empty(date_key: DayKey, now: DateTime<Utc>) -> Self {
        Self {
            date_key,
            sleep_hours: 0.0,
            meals_count: 0,
            breath_sessions: 0,
            drop_sessions: 0,
            heaviness: None,
            morning_practice_done: false,
            ritual_done: false,
            freeze_mode: false,
            checklist: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks a stored or imported record against the same rules as a patch.
    pub fn validate(&self) -> Result<()> {
        validation::validate_sleep_hours(self.sleep_hours)?;
        if let Some(score) = self.heaviness {
            validation::validate_heaviness(score)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, patch: DailyPatch, now: DateTime<Utc>) -> Result<()> {
        if let Some(hours) = patch.sleep_hours {
            validation::validate_sleep_hours(hours)?;
        }
        if let Some(score) = patch.heaviness {
            validation::validate_heaviness(score)?;
        }

        if let Some(hours) = patch.sleep_hours {
            self.sleep_hours = hours;
        }
        if let Some(score) = patch.heaviness {
            self.heaviness = Some(score);
        }
        if let Some(meals) = patch.meals_count {
            self.meals_count = meals;
        }
        if let Some(sessions) = patch.breath_sessions {
            self.breath_sessions = sessions;
        }
        if let Some(sessions) = patch.drop_sessions {
            self.drop_sessions = sessions;
        }
        if let Some(done) = patch.morning_practice_done {
            self.morning_practice_done = done;
        }
        if let Some(done) = patch.ritual_done {
            self.ritual_done = done;
        }
        if let Some(active) = patch.freeze_mode {
            self.freeze_mode = active;
        }
        // Checklist entries merge into the existing map.
        if let Some(items) = patch.checklist {
            self.checklist.extend(items);
        }
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DailyPatch {
    pub sleep_hours: Option<f64>,
    pub meals_count: Option<u32>,
    pub breath_sessions: Option<u32>,
    pub drop_sessions: Option<u32>,
    pub heaviness: Option<u8>,
    pub morning_practice_done: Option<bool>,
    pub ritual_done: Option<bool>,
    pub freeze_mode: Option<bool>,
    pub checklist: Option<BTreeMap<String, bool>>,
}
