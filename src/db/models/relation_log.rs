use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation;
use crate::time::DayKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRecord {
    pub date_key: DayKey,
    #[serde(default)]
    pub note: String,
    pub partner_mood: Option<String>,
    pub parent_contacted: bool,
    pub ritual_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RelationRecord {
    pub fn empty(date_key: DayKey, now: DateTime<Utc>) -> Self {
        Self {
            date_key,
            note: String::new(),
            partner_mood: None,
            parent_contacted: false,
            ritual_minutes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_note(&self.note)
    }

    pub fn apply(&mut self, patch: RelationPatch, now: DateTime<Utc>) -> Result<()> {
        if let Some(note) = &patch.note {
            validation::validate_note(note)?;
        }

        if let Some(note) = patch.note {
            self.note = note;
        }
        if let Some(mood) = patch.partner_mood {
            let mood = mood.trim().to_string();
            self.partner_mood = (!mood.is_empty()).then_some(mood);
        }
        if let Some(contacted) = patch.parent_contacted {
            self.parent_contacted = contacted;
        }
        if let Some(minutes) = patch.ritual_minutes {
            self.ritual_minutes = Some(minutes);
        }
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelationPatch {
    pub note: Option<String>,
    pub partner_mood: Option<String>,
    pub parent_contacted: Option<bool>,
    pub ritual_minutes: Option<u32>,
}
