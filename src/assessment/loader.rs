//! Reads the store and runs the pure engine for one day.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::assessment::{
    config::AssessmentConfig,
    pipeline::{assess, AssessmentInput},
    types::Assessment,
};
use crate::db::{
    models::{CareerRecord, DailyRecord, FinanceRecord, RelationRecord},
    Database,
};
use crate::log_info;
use crate::settings::SettingsStore;
use crate::time::{Clock, DayKey};

const ENABLE_LOGS: bool = true;

pub async fn load_input(
    db: &Database,
    settings: &SettingsStore,
    today: DayKey,
    config: &AssessmentConfig,
) -> Result<AssessmentInput> {
    let configuration = settings.get_or_init()?;
    let days = config.window_days;
    let (daily, finance, relation, career) = tokio::try_join!(
        db.load_window::<DailyRecord>(today, days),
        db.load_window::<FinanceRecord>(today, days),
        db.load_window::<RelationRecord>(today, days),
        db.load_window::<CareerRecord>(today, days),
    )?;

    Ok(AssessmentInput {
        today,
        daily,
        finance,
        relation,
        career,
        configuration,
    })
}

/// Assessment for an explicit day.
pub async fn assess_on(
    db: &Database,
    settings: &SettingsStore,
    today: DayKey,
) -> Result<Assessment> {
    let config = AssessmentConfig::default();
    let input = load_input(db, settings, today, &config).await?;
    let assessment = assess(&input, &config);

    log_info!(
        "Assessed {}: overall {}, primary {}, mode {}",
        assessment.date_key,
        assessment.overall_level.as_str(),
        assessment.primary_driver.as_str(),
        assessment.mode_tomorrow.as_str()
    );
    Ok(assessment)
}

/// Assessment for the day `now` falls on in the clock's zone.
pub async fn assess_day(
    db: &Database,
    settings: &SettingsStore,
    clock: &Clock,
    now: DateTime<Utc>,
) -> Result<Assessment> {
    assess_on(db, settings, clock.day_key(now)).await
}
