use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::DayRecord;
use crate::db::{
    connection::Database,
    helpers::{parse_checklist, parse_datetime, to_u32},
    models::{DailyPatch, DailyRecord},
};
use crate::time::DayKey;

impl DayRecord for DailyRecord {
    const TABLE: &'static str = "daily_logs";
    const COLUMNS: &'static str = "date_key, sleep_hours, meals_count, breath_sessions, \
        drop_sessions, heaviness, morning_practice_done, ritual_done, freeze_mode, checklist, \
        created_at, updated_at";

    fn new_for_day(date_key: DayKey, now: DateTime<Utc>) -> Self {
        DailyRecord::empty(date_key, now)
    }

    fn date_key(&self) -> DayKey {
        self.date_key
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        let checklist: String = row.get("checklist")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(DailyRecord {
            date_key: row.get("date_key")?,
            sleep_hours: row.get("sleep_hours")?,
            meals_count: to_u32(row.get("meals_count")?, "meals_count")?,
            breath_sessions: to_u32(row.get("breath_sessions")?, "breath_sessions")?,
            drop_sessions: to_u32(row.get("drop_sessions")?, "drop_sessions")?,
            heaviness: row.get("heaviness")?,
            morning_practice_done: row.get("morning_practice_done")?,
            ritual_done: row.get("ritual_done")?,
            freeze_mode: row.get("freeze_mode")?,
            checklist: parse_checklist(&checklist)?,
            created_at: parse_datetime(&created_at, "created_at")?,
            updated_at: parse_datetime(&updated_at, "updated_at")?,
        })
    }

    fn validate(&self) -> Result<()> {
        DailyRecord::validate(self)
    }

    fn write(&self, conn: &Connection) -> Result<()> {
        let checklist = serde_json::to_string(&self.checklist)?;
        conn.execute(
            "INSERT OR REPLACE INTO daily_logs (
                date_key, sleep_hours, meals_count, breath_sessions, drop_sessions, heaviness,
                morning_practice_done, ritual_done, freeze_mode, checklist, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                self.date_key,
                self.sleep_hours,
                self.meals_count,
                self.breath_sessions,
                self.drop_sessions,
                self.heaviness,
                self.morning_practice_done,
                self.ritual_done,
                self.freeze_mode,
                checklist,
                self.created_at.to_rfc3339(),
                self.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl Database {
    pub async fn get_daily(&self, day: DayKey) -> Result<Option<DailyRecord>> {
        self.get_record(day).await
    }

    pub async fn upsert_daily(&self, day: DayKey, patch: DailyPatch) -> Result<DailyRecord> {
        self.upsert_with(day, move |record: &mut DailyRecord, now| record.apply(patch, now))
            .await
    }
}
