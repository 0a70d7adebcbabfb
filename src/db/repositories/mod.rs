//! Day-keyed record storage. Every record kind lives in its own table with
//! `date_key` as the primary key; writes replace the whole row.

pub mod career_logs;
pub mod daily_logs;
pub mod finance_logs;
pub mod relation_logs;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::assessment::window::DayWindow;
use crate::db::{
    connection::Database,
    models::{CareerRecord, DailyRecord, FinanceRecord, RelationRecord},
};
use crate::time::{keys_back, DayKey};

pub trait DayRecord: Clone + Send + Sized + 'static {
    const TABLE: &'static str;
    /// Column list used by every SELECT, `date_key` first.
    const COLUMNS: &'static str;

    fn new_for_day(date_key: DayKey, now: DateTime<Utc>) -> Self;
    fn date_key(&self) -> DayKey;
    fn from_row(row: &Row<'_>) -> Result<Self>;
    /// Same rules the patch path enforces, applied to a whole record.
    fn validate(&self) -> Result<()>;
    /// Insert or replace the row for this record's day.
    fn write(&self, conn: &Connection) -> Result<()>;
}

/// Everything logged for one day, `None` where a kind has no row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntries {
    pub date_key: DayKey,
    pub daily: Option<DailyRecord>,
    pub finance: Option<FinanceRecord>,
    pub relation: Option<RelationRecord>,
    pub career: Option<CareerRecord>,
}

pub fn fetch<T: DayRecord>(conn: &Connection, day: DayKey) -> Result<Option<T>> {
    let sql = format!("SELECT {} FROM {} WHERE date_key = ?1", T::COLUMNS, T::TABLE);
    let mut stmt = conn.prepare_cached(&sql)?;
    let mut rows = stmt.query(params![day])?;
    match rows.next()? {
        Some(row) => Ok(Some(T::from_row(row)?)),
        None => Ok(None),
    }
}

pub fn fetch_all<T: DayRecord>(conn: &Connection) -> Result<Vec<T>> {
    let sql = format!("SELECT {} FROM {} ORDER BY date_key", T::COLUMNS, T::TABLE);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(T::from_row(row)?);
    }
    Ok(records)
}

pub fn clear<T: DayRecord>(conn: &Connection) -> Result<usize> {
    Ok(conn.execute(&format!("DELETE FROM {}", T::TABLE), [])?)
}

impl Database {
    pub async fn get_record<T: DayRecord>(&self, day: DayKey) -> Result<Option<T>> {
        self.execute(move |conn| fetch(conn, day)).await
    }

    /// One slot per requested key, `None` where no row exists.
    pub async fn get_many<T: DayRecord>(&self, days: Vec<DayKey>) -> Result<Vec<Option<T>>> {
        self.execute(move |conn| days.into_iter().map(|day| fetch(conn, day)).collect())
            .await
    }

    /// `days` records ending at `today`, most recent first.
    pub async fn load_window<T: DayRecord>(&self, today: DayKey, days: usize) -> Result<DayWindow<T>> {
        let records = self.get_many(keys_back(today, days)).await?;
        Ok(DayWindow::new(records))
    }

    pub async fn list_all<T: DayRecord>(&self) -> Result<Vec<T>> {
        self.execute(|conn| fetch_all(conn)).await
    }

    pub async fn get_day(&self, day: DayKey) -> Result<DayEntries> {
        let (daily, finance, relation, career) = tokio::try_join!(
            self.get_daily(day),
            self.get_finance(day),
            self.get_relation(day),
            self.get_career(day),
        )?;
        Ok(DayEntries {
            date_key: day,
            daily,
            finance,
            relation,
            career,
        })
    }

    /// Creates a defaulted row for `day` when none exists, then applies `edit`.
    /// Nothing is written when `edit` fails.
    pub async fn upsert_with<T, F>(&self, day: DayKey, edit: F) -> Result<T>
    where
        T: DayRecord,
        F: FnOnce(&mut T, DateTime<Utc>) -> Result<()> + Send + 'static,
    {
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let now = Utc::now();
            let mut record = fetch::<T>(&tx, day)?.unwrap_or_else(|| T::new_for_day(day, now));
            edit(&mut record, now)?;
            record.write(&tx)?;
            tx.commit()?;
            Ok(record)
        })
        .await
    }
}
