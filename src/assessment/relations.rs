//! Relations: the daily 7-minute ritual, read from the daily log.

use serde::Serialize;

use crate::assessment::{
    config::AssessmentConfig,
    types::{DomainStatus, Level},
    window::{clamp_score, count_true, dedup_capped, known_count, DayWindow},
    ROUGH_ESTIMATE,
};
use crate::db::models::DailyRecord;

const TOO_RARE: &str = "I've shown up too rarely lately.";
const PATCHY: &str = "I've been showing up patchily this week.";
const STILL_PRESENT: &str = "I keep showing up, even if briefly.";
const PRESENT_TODAY: &str = "I showed up today.";
const MISSED_TWO: &str = "I missed the last two days; a short moment is enough.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationsMetrics {
    pub ritual_count7: usize,
    pub known_days7: usize,
    pub missed_last_two: bool,
    pub ritual_today: bool,
}

pub fn evaluate(
    daily: &DayWindow<DailyRecord>,
    stability: Level,
    confidence: u8,
    config: &AssessmentConfig,
) -> DomainStatus<RelationsMetrics> {
    let window7 = daily.recent(config.window_days);
    let known_days7 = known_count(window7);
    let ritual_count7 = count_true(window7, |log| log.ritual_done);
    let ritual_today = daily.today().is_some_and(|log| log.ritual_done);
    let missed = |index| daily.day(index).is_some_and(|log| !log.ritual_done);
    let missed_last_two = missed(0) && missed(1);
    let enough_data = known_days7 >= config.min_known_days;

    let mut level = if !enough_data {
        Level::AtRisk
    } else if ritual_count7 >= 6 {
        Level::Safe
    } else if ritual_count7 >= 3 {
        Level::AtRisk
    } else {
        Level::Critical
    };

    // Withdrawal compounds instability.
    if stability != Level::Safe && missed_last_two {
        level = level.bump();
    }
    if !enough_data || ritual_today {
        level = level.capped_at(Level::AtRisk);
    }

    let base = if !enough_data {
        50.0
    } else if ritual_count7 >= 6 {
        90.0
    } else if ritual_count7 >= 3 {
        60.0
    } else {
        30.0
    };
    let mut score = if missed_last_two { base - 10.0 } else { base };
    if ritual_today {
        score = f64::max(score, 60.0);
    }

    let mut reasons: Vec<&str> = Vec::new();
    if !enough_data {
        reasons.push(ROUGH_ESTIMATE);
    } else if ritual_count7 <= 2 {
        reasons.push(TOO_RARE);
    } else if ritual_count7 <= 5 {
        reasons.push(PATCHY);
    } else {
        reasons.push(STILL_PRESENT);
    }
    if ritual_today {
        reasons.push(PRESENT_TODAY);
    }
    if missed_last_two {
        reasons.push(MISSED_TWO);
    }
    if confidence < config.low_confidence && reasons.first() != Some(&ROUGH_ESTIMATE) {
        reasons.insert(0, ROUGH_ESTIMATE);
    }

    let actions = if level == Level::Safe {
        vec!["Keep the 7-minute ritual".to_string()]
    } else {
        vec![
            "7-minute ritual today".to_string(),
            "One small act of help this week".to_string(),
        ]
    };

    DomainStatus {
        level,
        score: clamp_score(score),
        confidence,
        reasons: dedup_capped(reasons, config.domain_reason_cap),
        actions,
        metrics: RelationsMetrics {
            ritual_count7,
            known_days7,
            missed_last_two,
            ritual_today,
        },
    }
}
