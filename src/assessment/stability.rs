//! Stability: sleep, food, breathing and drop sessions.

use serde::Serialize;

use crate::assessment::{
    config::AssessmentConfig,
    types::{DomainStatus, Level},
    window::{clamp_score, dedup_capped, finite, known_values, mean, DayWindow},
    ROUGH_ESTIMATE,
};
use crate::db::models::DailyRecord;

const SLEEP_CRITICAL_HOURS: f64 = 5.0;
const SLEEP_OK_HOURS: f64 = 6.0;
const SLEEP_AVG_RISKY: f64 = 5.5;
const DROP_CRITICAL_TODAY: u32 = 3;
const DROP_HEAVY_SUM3: u32 = 6;
const DROP_SOME_SUM3: u32 = 3;
const HEAVINESS_RISKY_AVG: f64 = 4.0;

const SLEEP_TOO_THIN: &str = "My sleep was too thin today, so my body panics easily.";
const SLEEP_SHORT: &str = "I slept too little, so my system tips into panic easily.";
const DROP_FREQUENT: &str = "Drop Mode kicked in often today; I need to lighten the load.";
const DROP_PILED_UP: &str = "Drop Mode has piled up over the last three days; I need to go slow.";
const BARELY_ATE: &str = "I barely ate today.";
const MEALS_SHORT: &str = "I haven't eaten enough, so my energy drops easily.";
const BREATH_LOW: &str = "Too few conscious breaths, so my head gets noisy.";
const SLEEP_THIN_3DAYS: &str = "My sleep over the last three days is still thin.";
const SLEEP_DECLINING: &str = "My sleep over the last three days has slipped below this week's rhythm.";
const FEELING_HEAVY: &str = "The past few days have felt heavy.";
const NOT_LOGGED: &str = "I haven't filled in today's log yet.";
const STEADY: &str = "I'm fairly steady today.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityMetrics {
    pub sleep_avg3: Option<f64>,
    pub sleep_avg7: Option<f64>,
    pub heaviness_avg3: Option<f64>,
    pub drop_sum3: u32,
    pub sleep_hours_today: Option<f64>,
    pub meals_today: Option<u32>,
    pub breath_today: Option<u32>,
    pub drop_today: Option<u32>,
    pub today_known: bool,
}

impl StabilityMetrics {
    /// Today's log shows short sleep or too few meals or breaths.
    pub fn depleted_today(&self) -> bool {
        self.breath_today.is_some_and(|breath| breath < 2)
            || self.meals_today.is_some_and(|meals| meals < 2)
            || self.sleep_hours_today.is_some_and(|sleep| sleep < SLEEP_OK_HOURS)
    }
}

pub fn evaluate(
    daily: &DayWindow<DailyRecord>,
    confidence: u8,
    config: &AssessmentConfig,
) -> DomainStatus<StabilityMetrics> {
    let today = daily.today();
    let window3 = daily.recent(3);
    let window7 = daily.recent(config.window_days);

    let sleep3 = known_values(window3, |log| Some(log.sleep_hours));
    let sleep_avg3 = mean(&sleep3);
    let sleep_avg7 = mean(&known_values(window7, |log| Some(log.sleep_hours)));
    let heaviness_avg3 = mean(&known_values(window3, |log| {
        log.heaviness.map(f64::from)
    }));
    let drop_sum3 = window3
        .iter()
        .flatten()
        .fold(0u32, |sum, log| sum.saturating_add(log.drop_sessions));

    let metrics = StabilityMetrics {
        sleep_avg3,
        sleep_avg7,
        heaviness_avg3,
        drop_sum3,
        sleep_hours_today: today.and_then(|log| finite(log.sleep_hours)),
        meals_today: today.map(|log| log.meals_count),
        breath_today: today.map(|log| log.breath_sessions),
        drop_today: today.map(|log| log.drop_sessions),
        today_known: today.is_some(),
    };

    let sleep_below = |hours: f64| metrics.sleep_hours_today.is_some_and(|sleep| sleep < hours);
    let avg3_below = |hours: f64| sleep_avg3.is_some_and(|avg| avg < hours);
    let drop_today = metrics.drop_today.unwrap_or(0);

    let critical = sleep_below(SLEEP_CRITICAL_HOURS)
        || avg3_below(SLEEP_CRITICAL_HOURS)
        || metrics.meals_today == Some(0)
        || drop_today >= DROP_CRITICAL_TODAY
        || (sleep_below(SLEEP_OK_HOURS) && drop_today >= 2);

    let at_risk = avg3_below(SLEEP_AVG_RISKY)
        || metrics
            .sleep_hours_today
            .is_some_and(|sleep| (SLEEP_CRITICAL_HOURS..SLEEP_OK_HOURS).contains(&sleep))
        || metrics.breath_today.is_some_and(|breath| breath < 2)
        || heaviness_avg3.is_some_and(|avg| avg >= HEAVINESS_RISKY_AVG);

    let mut level = if critical {
        Level::Critical
    } else if at_risk {
        Level::AtRisk
    } else {
        Level::Safe
    };

    if !metrics.today_known && confidence < config.low_confidence {
        level = Level::AtRisk;
    }

    // A rested, fed, drop-free day is never critical on history alone.
    let recovered_today = metrics.sleep_hours_today.is_some_and(|s| s >= SLEEP_OK_HOURS)
        && metrics.meals_today.is_some_and(|meals| meals >= 1)
        && drop_today == 0;
    if recovered_today {
        level = level.capped_at(Level::AtRisk);
    }

    let score = clamp_score(score(today, &metrics));
    let reasons = reasons(&metrics, sleep3.len(), confidence, config);

    let actions = match level {
        Level::Critical => vec![
            "Drop Mode".to_string(),
            "Sleep comes first".to_string(),
            "Big decisions wait".to_string(),
        ],
        Level::AtRisk => vec![
            "Add one breathing session".to_string(),
            "Go to bed earlier".to_string(),
        ],
        Level::Safe => vec!["Keep the simple rhythm".to_string()],
    };

    DomainStatus {
        level,
        score,
        confidence,
        reasons,
        actions,
        metrics,
    }
}

fn score(today: Option<&DailyRecord>, metrics: &StabilityMetrics) -> f64 {
    let mut score = 0.0;

    if let Some(log) = today {
        score += match metrics.sleep_hours_today {
            Some(sleep) if sleep >= 6.0 => 35.0,
            Some(sleep) if sleep >= 5.0 => 25.0,
            Some(sleep) if sleep >= 4.0 => 12.0,
            _ => 0.0,
        };
        score += match log.meals_count {
            0 => 0.0,
            1 => 10.0,
            _ => 20.0,
        };
        score += match log.breath_sessions {
            0 => 0.0,
            1 => 8.0,
            _ => 15.0,
        };
        score += match log.drop_sessions {
            0 => 15.0,
            1 => 10.0,
            2 => 5.0,
            _ => 0.0,
        };
        score += match log.heaviness {
            Some(1) => 15.0,
            Some(2) => 12.0,
            Some(3) => 8.0,
            Some(4) => 4.0,
            _ => 0.0,
        };
    }

    match metrics.sleep_avg3 {
        Some(avg) if avg < SLEEP_CRITICAL_HOURS => score -= 12.0,
        Some(avg) if avg < SLEEP_AVG_RISKY => score -= 6.0,
        _ => {}
    }

    if metrics.drop_sum3 >= DROP_HEAVY_SUM3 {
        score -= 10.0;
    } else if metrics.drop_sum3 >= DROP_SOME_SUM3 {
        score -= 5.0;
    }

    score
}

fn reasons(
    metrics: &StabilityMetrics,
    known_sleep3: usize,
    confidence: u8,
    config: &AssessmentConfig,
) -> Vec<String> {
    let mut reasons: Vec<&str> = Vec::new();

    match metrics.sleep_hours_today {
        Some(sleep) if sleep < SLEEP_CRITICAL_HOURS => reasons.push(SLEEP_TOO_THIN),
        Some(sleep) if sleep < SLEEP_OK_HOURS => reasons.push(SLEEP_SHORT),
        _ => {}
    }

    if metrics.drop_today.is_some_and(|drops| drops >= 2) {
        reasons.push(DROP_FREQUENT);
    }
    if metrics.drop_sum3 >= DROP_HEAVY_SUM3 {
        reasons.push(DROP_PILED_UP);
    }

    match metrics.meals_today {
        Some(0) => reasons.push(BARELY_ATE),
        Some(1) => reasons.push(MEALS_SHORT),
        _ => {}
    }

    if metrics.breath_today.is_some_and(|breath| breath < 2) {
        reasons.push(BREATH_LOW);
    }

    // A trend needs more than one day behind it.
    if known_sleep3 >= 2 {
        if metrics.sleep_avg3.is_some_and(|avg| avg < SLEEP_AVG_RISKY) {
            reasons.push(SLEEP_THIN_3DAYS);
        }
        if let (Some(avg3), Some(avg7)) = (metrics.sleep_avg3, metrics.sleep_avg7) {
            if avg3 + config.sleep_trend_margin < avg7 {
                reasons.push(SLEEP_DECLINING);
            }
        }
    }

    if metrics
        .heaviness_avg3
        .is_some_and(|avg| avg >= HEAVINESS_RISKY_AVG)
    {
        reasons.push(FEELING_HEAVY);
    }

    if reasons.is_empty() {
        reasons.push(if metrics.today_known { STEADY } else { NOT_LOGGED });
    }

    if confidence < config.low_confidence {
        reasons.insert(0, ROUGH_ESTIMATE);
    }

    dedup_capped(reasons, config.domain_reason_cap)
}
