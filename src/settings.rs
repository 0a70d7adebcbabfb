use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::time::{Clock, DEFAULT_TIMEZONE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTargets {
    /// Acceptable small-vice spend per day
    pub vice_max: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTargets {
    /// Vehicle-wallet top-up cap over 7 days
    pub topup_max: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtSchedule {
    pub monthly_amount: u64,
    /// One or two days of the month
    pub due_days: Vec<u32>,
    pub months_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payday {
    pub day_of_month: u32,
}

/// Currency-denominated assumptions behind the payday projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceModel {
    /// Minimal income assumed for each day until payday
    pub daily_floor_income: u64,
    /// Cash below this on a deficit day is critical
    pub low_cash_threshold: u64,
    /// Days either side of a due day that count as "near"
    pub due_window_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreezePolicy {
    pub days: u32,
    pub vice_max: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub daily_targets: DailyTargets,
    pub weekly_targets: WeeklyTargets,
    pub debt: DebtSchedule,
    pub payday: Payday,
    pub finance_model: FinanceModel,
    pub freeze: FreezePolicy,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Configuration {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            daily_targets: DailyTargets { vice_max: 10_000 },
            weekly_targets: WeeklyTargets { topup_max: 100_000 },
            debt: DebtSchedule {
                monthly_amount: 400_000,
                due_days: vec![1, 15],
                months_remaining: 4,
            },
            payday: Payday { day_of_month: 27 },
            finance_model: FinanceModel {
                daily_floor_income: 60_000,
                low_cash_threshold: 50_000,
                due_window_days: 2,
            },
            freeze: FreezePolicy {
                days: 3,
                vice_max: 5_000,
            },
            timezone: DEFAULT_TIMEZONE.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Configuration {
    pub fn clock(&self) -> Result<Clock> {
        Clock::from_name(&self.timezone)
    }

    pub fn validate(&self) -> Result<()> {
        if self.debt.due_days.len() > 2 {
            bail!("at most two debt due days are supported");
        }
        if self
            .debt
            .due_days
            .iter()
            .chain(std::iter::once(&self.payday.day_of_month))
            .any(|day| !(1..=31).contains(day))
        {
            bail!("days of month must be between 1 and 31");
        }
        if self.finance_model.due_window_days < 0 {
            bail!("due window must not be negative");
        }
        self.clock()?;
        Ok(())
    }

    fn merged(&self, patch: ConfigPatch, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        if let Some(daily) = patch.daily_targets {
            if let Some(value) = daily.vice_max {
                next.daily_targets.vice_max = value;
            }
        }
        if let Some(weekly) = patch.weekly_targets {
            if let Some(value) = weekly.topup_max {
                next.weekly_targets.topup_max = value;
            }
        }
        if let Some(debt) = patch.debt {
            if let Some(value) = debt.monthly_amount {
                next.debt.monthly_amount = value;
            }
            if let Some(mut days) = debt.due_days {
                days.sort_unstable();
                days.dedup();
                next.debt.due_days = days;
            }
            if let Some(value) = debt.months_remaining {
                next.debt.months_remaining = value;
            }
        }
        if let Some(payday) = patch.payday {
            if let Some(value) = payday.day_of_month {
                next.payday.day_of_month = value;
            }
        }
        if let Some(model) = patch.finance_model {
            if let Some(value) = model.daily_floor_income {
                next.finance_model.daily_floor_income = value;
            }
            if let Some(value) = model.low_cash_threshold {
                next.finance_model.low_cash_threshold = value;
            }
            if let Some(value) = model.due_window_days {
                next.finance_model.due_window_days = value;
            }
        }
        if let Some(freeze) = patch.freeze {
            if let Some(value) = freeze.days {
                next.freeze.days = value;
            }
            if let Some(value) = freeze.vice_max {
                next.freeze.vice_max = value;
            }
        }
        if let Some(timezone) = patch.timezone {
            next.timezone = timezone;
        }
        next.updated_at = now;
        next
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DailyTargetsPatch {
    pub vice_max: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WeeklyTargetsPatch {
    pub topup_max: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DebtSchedulePatch {
    pub monthly_amount: Option<u64>,
    pub due_days: Option<Vec<u32>>,
    pub months_remaining: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PaydayPatch {
    pub day_of_month: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FinanceModelPatch {
    pub daily_floor_income: Option<u64>,
    pub low_cash_threshold: Option<u64>,
    pub due_window_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FreezePolicyPatch {
    pub days: Option<u32>,
    pub vice_max: Option<u64>,
}

/// Partial configuration update; each section merges field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigPatch {
    pub daily_targets: Option<DailyTargetsPatch>,
    pub weekly_targets: Option<WeeklyTargetsPatch>,
    pub debt: Option<DebtSchedulePatch>,
    pub payday: Option<PaydayPatch>,
    pub finance_model: Option<FinanceModelPatch>,
    pub freeze: Option<FreezePolicyPatch>,
    pub timezone: Option<String>,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Configuration>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Settings at {} are unreadable ({err}); falling back to defaults",
                    path.display()
                );
                Configuration::default()
            })
        } else {
            Configuration::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Configuration> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Configuration> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Current configuration, writing the defaults to disk on first use.
    pub fn get_or_init(&self) -> Result<Configuration> {
        let guard = self.read_guard();
        if !self.path.exists() {
            self.persist(&guard)?;
        }
        Ok(guard.clone())
    }

    pub fn patch(&self, patch: ConfigPatch) -> Result<Configuration> {
        let mut guard = self.write_guard();
        let merged = guard.merged(patch, Utc::now());
        merged.validate()?;
        self.persist(&merged)?;
        *guard = merged.clone();
        Ok(merged)
    }

    pub fn replace(&self, configuration: Configuration) -> Result<()> {
        configuration.validate()?;
        let mut guard = self.write_guard();
        self.persist(&configuration)?;
        *guard = configuration;
        Ok(())
    }

    fn persist(&self, data: &Configuration) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
