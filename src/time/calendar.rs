use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::DayKey;

fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + (month as i32 - 1) + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = shift_month(year, month, 1);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Day-of-month `day` in the given month, clamped to the month's length.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Days from `today` until the next payday (0 when today is payday).
pub fn days_to_payday(today: DayKey, payday_day: u32) -> i64 {
    let date = today.date();
    let (year, month) = (date.year(), date.month());
    let this_month = clamped_date(year, month, payday_day);

    let target = match this_month {
        Some(payday) if payday >= date => Some(payday),
        _ => {
            let (next_year, next_month) = shift_month(year, month, 1);
            clamped_date(next_year, next_month, payday_day)
        }
    };

    target
        .map(|payday| (payday - date).num_days().max(0))
        .unwrap_or(0)
}

/// True when any due day falls within `window_days` of `today`, looking at the
/// previous, current and next month's occurrence of each due day.
pub fn is_near_due_day(today: DayKey, due_days: &[u32], window_days: i64) -> bool {
    let date = today.date();
    let (year, month) = (date.year(), date.month());

    due_days.iter().any(|&due_day| {
        [-1, 0, 1].iter().any(|&delta| {
            let (y, m) = shift_month(year, month, delta);
            clamped_date(y, m, due_day)
                .map(|candidate| (candidate - date).num_days().abs() <= window_days)
                .unwrap_or(false)
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueDate {
    pub date_key: DayKey,
    pub days_left: i64,
}

/// Nearest due date on or after `today`.
pub fn next_due_date(today: DayKey, due_days: &[u32]) -> Option<DueDate> {
    let date = today.date();
    let (year, month) = (date.year(), date.month());

    [0, 1]
        .iter()
        .flat_map(|&delta| {
            let (y, m) = shift_month(year, month, delta);
            due_days
                .iter()
                .filter(|&&day| day > 0)
                .filter_map(move |&day| clamped_date(y, m, day))
        })
        .filter(|candidate| *candidate >= date)
        .min()
        .map(|due| DueDate {
            date_key: DayKey::new(due),
            days_left: (due - date).num_days(),
        })
}
