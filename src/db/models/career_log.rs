use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{OUTREACH_CAP, PRACTICE_MINUTES_CAP};
use crate::time::DayKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecord {
    pub date_key: DayKey,
    pub outreach_sent: u32,
    /// Minutes of billable-skill practice
    pub practice_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CareerRecord {
    pub fn empty(date_key: DayKey, now: DateTime<Utc>) -> Self {
        Self {
            date_key,
            outreach_sent: 0,
            practice_minutes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored counters never exceed the caps a patch clamps to.
    pub fn validate(&self) -> Result<()> {
        if self.outreach_sent > OUTREACH_CAP {
            bail!("outreach_sent {} exceeds the daily cap of {OUTREACH_CAP}", self.outreach_sent);
        }
        if self.practice_minutes > PRACTICE_MINUTES_CAP {
            bail!(
                "practice_minutes {} exceeds the daily cap of {PRACTICE_MINUTES_CAP}",
                self.practice_minutes
            );
        }
        Ok(())
    }

    /// Counters are clamped to their daily caps.
    pub fn apply(&mut self, patch: CareerPatch, now: DateTime<Utc>) {
        if let Some(sent) = patch.outreach_sent {
            self.outreach_sent = sent.min(OUTREACH_CAP);
        }
        if let Some(minutes) = patch.practice_minutes {
            self.practice_minutes = minutes.min(PRACTICE_MINUTES_CAP);
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CareerPatch {
    pub outreach_sent: Option<u32>,
    pub practice_minutes: Option<u32>,
}
