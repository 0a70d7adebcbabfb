use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::DayRecord;
use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_u32},
    models::{RelationPatch, RelationRecord},
};
use crate::time::DayKey;

impl DayRecord for RelationRecord {
    const TABLE: &'static str = "relation_logs";
    const COLUMNS: &'static str =
        "date_key, note, partner_mood, parent_contacted, ritual_minutes, created_at, updated_at";

    fn new_for_day(date_key: DayKey, now: DateTime<Utc>) -> Self {
        RelationRecord::empty(date_key, now)
    }

    fn date_key(&self) -> DayKey {
        self.date_key
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        let ritual_minutes: Option<i64> = row.get("ritual_minutes")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(RelationRecord {
            date_key: row.get("date_key")?,
            note: row.get("note")?,
            partner_mood: row.get("partner_mood")?,
            parent_contacted: row.get("parent_contacted")?,
            ritual_minutes: ritual_minutes
                .map(|minutes| to_u32(minutes, "ritual_minutes"))
                .transpose()?,
            created_at: parse_datetime(&created_at, "created_at")?,
            updated_at: parse_datetime(&updated_at, "updated_at")?,
        })
    }

    fn validate(&self) -> Result<()> {
        RelationRecord::validate(self)
    }

    fn write(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO relation_logs (
                date_key, note, partner_mood, parent_contacted, ritual_minutes,
                created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                self.date_key,
                self.note,
                self.partner_mood,
                self.parent_contacted,
                self.ritual_minutes,
                self.created_at.to_rfc3339(),
                self.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl Database {
    pub async fn get_relation(&self, day: DayKey) -> Result<Option<RelationRecord>> {
        self.get_record(day).await
    }

    pub async fn upsert_relation(
        &self,
        day: DayKey,
        patch: RelationPatch,
    ) -> Result<RelationRecord> {
        self.upsert_with(day, move |record: &mut RelationRecord, now| record.apply(patch, now))
            .await
    }
}
