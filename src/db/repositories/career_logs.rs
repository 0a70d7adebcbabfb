use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::DayRecord;
use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_u32},
    models::{CareerPatch, CareerRecord},
};
use crate::time::DayKey;

impl DayRecord for CareerRecord {
    const TABLE: &'static str = "career_logs";
    const COLUMNS: &'static str =
        "date_key, outreach_sent, practice_minutes, created_at, updated_at";

    fn new_for_day(date_key: DayKey, now: DateTime<Utc>) -> Self {
        CareerRecord::empty(date_key, now)
    }

    fn date_key(&self) -> DayKey {
        self.date_key
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(CareerRecord {
            date_key: row.get("date_key")?,
            outreach_sent: to_u32(row.get("outreach_sent")?, "outreach_sent")?,
            practice_minutes: to_u32(row.get("practice_minutes")?, "practice_minutes")?,
            created_at: parse_datetime(&created_at, "created_at")?,
            updated_at: parse_datetime(&updated_at, "updated_at")?,
        })
    }

    fn validate(&self) -> Result<()> {
        CareerRecord::validate(self)
    }

    fn write(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO career_logs (
                date_key, outreach_sent, practice_minutes, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.date_key,
                self.outreach_sent,
                self.practice_minutes,
                self.created_at.to_rfc3339(),
                self.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl Database {
    pub async fn get_career(&self, day: DayKey) -> Result<Option<CareerRecord>> {
        self.get_record(day).await
    }

    pub async fn upsert_career(&self, day: DayKey, patch: CareerPatch) -> Result<CareerRecord> {
        self.upsert_with(day, move |record: &mut CareerRecord, now| {
            record.apply(patch, now);
            Ok(())
        })
        .await
    }
}
