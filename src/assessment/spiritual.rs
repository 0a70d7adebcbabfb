//! Spiritual: the morning practice and how long it has been missed.

use serde::Serialize;

use crate::assessment::{
    config::AssessmentConfig,
    types::{DomainStatus, Level},
    window::{dedup_capped, known_count, leading_streak, DayWindow},
    ROUGH_ESTIMATE,
};
use crate::db::models::DailyRecord;

const HELD_TODAY: &str = "I held the morning practice today.";
const TIRED_FOR_DAYS: &str = "I'm not far away. I've just been tired the past few days.";
const TIRED: &str = "I'm not far away. I'm just tired.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpiritualMetrics {
    /// Consecutive missed mornings counting back from today
    pub miss_streak: usize,
    pub known_days7: usize,
    pub today_known: bool,
}

pub fn evaluate(
    daily: &DayWindow<DailyRecord>,
    confidence: u8,
    config: &AssessmentConfig,
) -> DomainStatus<SpiritualMetrics> {
    let window7 = daily.recent(config.window_days);
    let miss_streak = leading_streak(window7, |log| !log.morning_practice_done);
    let known_days7 = known_count(window7);
    let today_known = daily.today().is_some();
    let held_today = daily.today().is_some_and(|log| log.morning_practice_done);

    let mut level = if held_today {
        Level::Safe
    } else if miss_streak >= 3 {
        Level::Critical
    } else {
        Level::AtRisk
    };
    if known_days7 < config.spiritual_min_known_days {
        level = level.capped_at(Level::AtRisk);
    }

    let mut reasons: Vec<&str> = Vec::new();
    if !today_known {
        reasons.push(ROUGH_ESTIMATE);
    }
    reasons.push(if held_today {
        HELD_TODAY
    } else if miss_streak >= 3 {
        TIRED_FOR_DAYS
    } else {
        TIRED
    });

    let actions = if level == Level::Safe {
        vec!["Keep the morning rhythm".to_string()]
    } else {
        vec![
            "Hold the morning practice".to_string(),
            "An honest prayer: I'm tired.".to_string(),
        ]
    };

    let score = match level {
        Level::Safe => 90,
        Level::AtRisk => 60,
        Level::Critical => 30,
    };

    DomainStatus {
        level,
        score,
        confidence,
        reasons: dedup_capped(reasons, config.domain_reason_cap),
        actions,
        metrics: SpiritualMetrics {
            miss_streak,
            known_days7,
            today_known,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::test_support::{daily, window};

    fn mornings(pattern: &[Option<bool>]) -> DayWindow<DailyRecord> {
        window(
            pattern
                .iter()
                .enumerate()
                .map(|(offset, done)| {
                    done.map(|done| daily(offset as u64, |log| log.morning_practice_done = done))
                })
                .collect(),
        )
    }

    #[test]
    fn held_today_overrides_streak() {
        let days = mornings(&[Some(true), Some(false), Some(false), Some(false)]);
        let status = evaluate(&days, 80, &AssessmentConfig::default());
        assert_eq!(status.level, Level::Safe);
        assert_eq!(status.score, 90);
        assert_eq!(status.reasons, vec![HELD_TODAY.to_string()]);
    }

    #[test]
    fn three_missed_mornings_are_critical() {
        let days = mornings(&[Some(false), Some(false), Some(false), Some(true)]);
        let status = evaluate(&days, 80, &AssessmentConfig::default());
        assert_eq!(status.metrics.miss_streak, 3);
        assert_eq!(status.level, Level::Critical);
        assert_eq!(status.reasons, vec![TIRED_FOR_DAYS.to_string()]);
    }

    #[test]
    fn streak_stops_at_unknown_day() {
        let days = mornings(&[Some(false), None, Some(false), Some(false)]);
        let status = evaluate(&days, 50, &AssessmentConfig::default());
        assert_eq!(status.metrics.miss_streak, 1);
        assert_eq!(status.level, Level::AtRisk);
    }

    #[test]
    fn sparse_data_caps_at_risk() {
        let days = mornings(&[Some(false), Some(false)]);
        let status = evaluate(&days, 50, &AssessmentConfig::default());
        assert_eq!(status.level, Level::AtRisk);

        let status = evaluate(&mornings(&[]), 40, &AssessmentConfig::default());
        assert_eq!(status.level, Level::AtRisk);
        assert_eq!(status.reasons[0], ROUGH_ESTIMATE);
    }
}
