use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::DayRecord;
use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_i64, to_u64},
    models::{FinancePatch, FinanceRecord},
};
use crate::time::DayKey;

fn amount(row: &Row<'_>, column: &str) -> Result<u64> {
    to_u64(row.get(column)?, column)
}

impl DayRecord for FinanceRecord {
    const TABLE: &'static str = "finance_logs";
    const COLUMNS: &'static str = "date_key, income, expense_food, expense_fuel, topup_wallet, \
        vice_spend, other_expense, cash_on_hand, freeze_applied, note, created_at, updated_at";

    fn new_for_day(date_key: DayKey, now: DateTime<Utc>) -> Self {
        FinanceRecord::empty(date_key, now)
    }

    fn date_key(&self) -> DayKey {
        self.date_key
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        let cash_on_hand: Option<i64> = row.get("cash_on_hand")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(FinanceRecord {
            date_key: row.get("date_key")?,
            income: amount(row, "income")?,
            expense_food: amount(row, "expense_food")?,
            expense_fuel: amount(row, "expense_fuel")?,
            topup_wallet: amount(row, "topup_wallet")?,
            vice_spend: amount(row, "vice_spend")?,
            other_expense: amount(row, "other_expense")?,
            cash_on_hand: cash_on_hand
                .map(|value| to_u64(value, "cash_on_hand"))
                .transpose()?,
            freeze_applied: row.get("freeze_applied")?,
            note: row.get("note")?,
            created_at: parse_datetime(&created_at, "created_at")?,
            updated_at: parse_datetime(&updated_at, "updated_at")?,
        })
    }

    fn validate(&self) -> Result<()> {
        FinanceRecord::validate(self)
    }

    fn write(&self, conn: &Connection) -> Result<()> {
        let cash_on_hand = self.cash_on_hand.map(to_i64).transpose()?;
        conn.execute(
            "INSERT OR REPLACE INTO finance_logs (
                date_key, income, expense_food, expense_fuel, topup_wallet, vice_spend,
                other_expense, cash_on_hand, freeze_applied, note, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                self.date_key,
                to_i64(self.income)?,
                to_i64(self.expense_food)?,
                to_i64(self.expense_fuel)?,
                to_i64(self.topup_wallet)?,
                to_i64(self.vice_spend)?,
                to_i64(self.other_expense)?,
                cash_on_hand,
                self.freeze_applied,
                self.note,
                self.created_at.to_rfc3339(),
                self.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl Database {
    pub async fn get_finance(&self, day: DayKey) -> Result<Option<FinanceRecord>> {
        self.get_record(day).await
    }

    pub async fn upsert_finance(&self, day: DayKey, patch: FinancePatch) -> Result<FinanceRecord> {
        self.upsert_with(day, move |record: &mut FinanceRecord, now| record.apply(patch, now))
            .await
    }
}
