//! Daily money log. Amounts are whole units of the local currency.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation;
use crate::time::DayKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRecord {
    pub date_key: DayKey,
    pub income: u64,
    pub expense_food: u64,
    pub expense_fuel: u64,
    /// Vehicle-wallet top-up
    pub topup_wallet: u64,
    /// Small-vice spending (cigarettes, coffee)
    pub vice_spend: u64,
    pub other_expense: u64,
    /// End-of-day cash estimate
    pub cash_on_hand: Option<u64>,
    pub freeze_applied: bool,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinanceRecord {
    pub fn empty(date_key: DayKey, now: DateTime<Utc>) -> Self {
        Self {
            date_key,
            income: 0,
            expense_food: 0,
            expense_fuel: 0,
            topup_wallet: 0,
            vice_spend: 0,
            other_expense: 0,
            cash_on_hand: None,
            freeze_applied: false,
            note: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn total_expense(&self) -> u64 {
        self.expense_food
            .saturating_add(self.expense_fuel)
            .saturating_add(self.topup_wallet)
            .saturating_add(self.vice_spend)
            .saturating_add(self.other_expense)
    }

    pub fn net(&self) -> i64 {
        let income = i64::try_from(self.income).unwrap_or(i64::MAX);
        let expense = i64::try_from(self.total_expense()).unwrap_or(i64::MAX);
        income.saturating_sub(expense)
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_note(&self.note)
    }

    pub fn apply(&mut self, patch: FinancePatch, now: DateTime<Utc>) -> Result<()> {
        if let Some(note) = &patch.note {
            validation::validate_note(note)?;
        }

        if let Some(value) = patch.income {
            self.income = value;
        }
        if let Some(value) = patch.expense_food {
            self.expense_food = value;
        }
        if let Some(value) = patch.expense_fuel {
            self.expense_fuel = value;
        }
        if let Some(value) = patch.topup_wallet {
            self.topup_wallet = value;
        }
        if let Some(value) = patch.vice_spend {
            self.vice_spend = value;
        }
        if let Some(value) = patch.other_expense {
            self.other_expense = value;
        }
        if let Some(value) = patch.cash_on_hand {
            self.cash_on_hand = Some(value);
        }
        if let Some(applied) = patch.freeze_applied {
            self.freeze_applied = applied;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FinancePatch {
    pub income: Option<u64>,
    pub expense_food: Option<u64>,
    pub expense_fuel: Option<u64>,
    pub topup_wallet: Option<u64>,
    pub vice_spend: Option<u64>,
    pub other_expense: Option<u64>,
    pub cash_on_hand: Option<u64>,
    pub freeze_applied: Option<bool>,
    pub note: Option<String>,
}
