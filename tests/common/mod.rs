#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use lifeline_lib::assessment::{AssessmentInput, DayWindow};
use lifeline_lib::db::models::{CareerRecord, DailyRecord, FinanceRecord, RelationRecord};
use lifeline_lib::settings::Configuration;
use lifeline_lib::time::DayKey;

pub fn today() -> DayKey {
    DayKey::from_ymd(2024, 6, 8).unwrap()
}

pub fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap()
}

pub fn input() -> AssessmentInput {
    AssessmentInput::empty(today(), Configuration::default())
}

pub fn daily(offset: u64, edit: impl FnOnce(&mut DailyRecord)) -> DailyRecord {
    let mut record = DailyRecord::empty(today().days_before(offset), stamp());
    edit(&mut record);
    record
}

pub fn finance(offset: u64, edit: impl FnOnce(&mut FinanceRecord)) -> FinanceRecord {
    let mut record = FinanceRecord::empty(today().days_before(offset), stamp());
    edit(&mut record);
    record
}

pub fn finance_on(day: DayKey, edit: impl FnOnce(&mut FinanceRecord)) -> FinanceRecord {
    let mut record = FinanceRecord::empty(day, stamp());
    edit(&mut record);
    record
}

pub fn relation(offset: u64, edit: impl FnOnce(&mut RelationRecord)) -> RelationRecord {
    let mut record = RelationRecord::empty(today().days_before(offset), stamp());
    edit(&mut record);
    record
}

pub fn career(offset: u64, edit: impl FnOnce(&mut CareerRecord)) -> CareerRecord {
    let mut record = CareerRecord::empty(today().days_before(offset), stamp());
    edit(&mut record);
    record
}

/// Pads to a full week with absent days.
pub fn window<T>(mut days: Vec<Option<T>>) -> DayWindow<T> {
    days.resize_with(7, || None);
    DayWindow::new(days)
}

pub fn clean_day(offset: u64) -> DailyRecord {
    daily(offset, |log| {
        log.sleep_hours = 7.0;
        log.meals_count = 3;
        log.breath_sessions = 2;
        log.morning_practice_done = true;
        log.ritual_done = true;
    })
}
