//! Finance: daily net, deficit streaks, top-up relapse and the payday projection.

use serde::Serialize;

use crate::assessment::{
    config::AssessmentConfig,
    types::{DomainStatus, Level},
    window::{
        clamp_score, dedup_capped, known_count, known_values, leading_streak, mean, DayWindow,
    },
    ROUGH_ESTIMATE,
};
use crate::db::models::FinanceRecord;
use crate::settings::Configuration;
use crate::time::{days_to_payday, is_near_due_day, DayKey};

const DEFICIT_STREAK: &str = "My deficits are running back to back; I need to stop the leaks.";
const DEFICIT_TODAY: &str = "I ran a deficit today. Stopping the leaks comes first.";
const TOPUP_STREAK: &str = "I'm topping up too often, a sign I'm sliding back into panic spending.";
const TOPUP_OVER_CAP: &str = "Weekly top-ups went past the guardrail.";
const VICE_HARD: &str = "My vice spending is far too high today.";
const VICE_OVER: &str = "Vice spending is above the daily guardrail.";
const SPENDING_UP: &str = "Spending over the last three days is above my weekly rhythm.";
const NEAR_DUE: &str = "A debt payment is close, so I need to be extra tidy.";
const CASH_MISSING: &str = "I haven't filled in tonight's cash, so this is an estimate.";
const PROJECTION_RISKY: &str = "At this pace I risk running short before payday.";
const PROJECTION_SAFE: &str = "At this pace I'm reasonably safe until payday.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceMetrics {
    pub net_today: Option<i64>,
    pub deficit_streak: usize,
    pub spending_avg7: Option<f64>,
    pub spending_avg3: Option<f64>,
    pub income_avg7: Option<f64>,
    pub weekly_topup7: u64,
    pub topup_streak: bool,
    pub days_to_payday: i64,
    pub projected_net_to_payday: f64,
    pub near_due: bool,
    pub cash_on_hand: Option<u64>,
    pub vice_max: u64,
    pub weekly_topup_max: u64,
    pub known_days7: usize,
    pub today_known: bool,
}

impl FinanceMetrics {
    pub fn topup_over_cap(&self) -> bool {
        self.weekly_topup7 > self.weekly_topup_max
    }
}

pub fn evaluate(
    finance: &DayWindow<FinanceRecord>,
    today_key: DayKey,
    confidence: u8,
    configuration: &Configuration,
    config: &AssessmentConfig,
) -> DomainStatus<FinanceMetrics> {
    let today = finance.today();
    let window3 = finance.recent(3);
    let window7 = finance.recent(config.window_days);

    let expense = |record: &FinanceRecord| Some(record.total_expense() as f64);
    let spending_avg7 = mean(&known_values(window7, expense));
    let spending_avg3 = mean(&known_values(window3, expense));
    let income_avg7 = mean(&known_values(window7, |record| Some(record.income as f64)));
    let weekly_topup7 = window7
        .iter()
        .flatten()
        .fold(0u64, |sum, record| sum.saturating_add(record.topup_wallet));

    // Three straight logged days with a top-up.
    let topup_streak = window3.len() == 3
        && window3
            .iter()
            .all(|day| day.as_ref().is_some_and(|record| record.topup_wallet > 0));

    let deficit_streak = leading_streak(window7, |record| record.net() < 0);
    let cash_on_hand = today.and_then(|record| record.cash_on_hand);
    let cash = cash_on_hand.unwrap_or(0);

    let model = &configuration.finance_model;
    let days_to_payday = days_to_payday(today_key, configuration.payday.day_of_month);
    let days = days_to_payday as f64;
    let projected_net_to_payday = cash as f64 + model.daily_floor_income as f64 * days
        - spending_avg7.unwrap_or(0.0) * days;

    let near_due = is_near_due_day(
        today_key,
        &configuration.debt.due_days,
        model.due_window_days,
    );

    let metrics = FinanceMetrics {
        net_today: today.map(FinanceRecord::net),
        deficit_streak,
        spending_avg7,
        spending_avg3,
        income_avg7,
        weekly_topup7,
        topup_streak,
        days_to_payday,
        projected_net_to_payday,
        near_due,
        cash_on_hand,
        vice_max: configuration.daily_targets.vice_max,
        weekly_topup_max: configuration.weekly_targets.topup_max,
        known_days7: known_count(window7),
        today_known: today.is_some(),
    };

    let vice_max = metrics.vice_max;
    let deficit_today = metrics.net_today.is_some_and(|net| net < 0);
    let vice_over = today.is_some_and(|record| record.vice_spend > vice_max);
    let vice_hard = today.is_some_and(|record| record.vice_spend > vice_max.saturating_mul(2));

    let critical = deficit_streak >= 2
        || (deficit_today && cash < model.low_cash_threshold)
        || vice_hard
        || topup_streak;
    let at_risk = deficit_today || metrics.topup_over_cap() || vice_over;

    let mut level = if critical {
        Level::Critical
    } else if at_risk {
        Level::AtRisk
    } else {
        Level::Safe
    };

    if near_due && level != Level::Safe {
        level = level.bump();
    }

    // Silence about money is not a healthy reading.
    if !metrics.today_known && confidence < config.low_confidence {
        level = level.max(Level::AtRisk);
    }

    let mut penalty = 0.0;
    if deficit_today {
        penalty += 20.0;
    }
    penalty += match deficit_streak {
        0 => 0.0,
        1 => 10.0,
        _ => 20.0,
    };
    if projected_net_to_payday < 0.0 {
        penalty += 15.0;
    }
    if metrics.topup_over_cap() {
        penalty += 10.0;
    }
    if vice_over {
        penalty += 10.0;
    }
    if vice_hard {
        penalty += 10.0;
    }
    if topup_streak {
        penalty += 10.0;
    }
    if near_due {
        penalty += 5.0;
    }

    let mut triggered: Vec<&str> = Vec::new();
    if confidence < config.low_confidence {
        triggered.push(ROUGH_ESTIMATE);
    }
    if deficit_streak >= 2 {
        triggered.push(DEFICIT_STREAK);
    }
    if deficit_today {
        triggered.push(DEFICIT_TODAY);
    }
    if topup_streak {
        triggered.push(TOPUP_STREAK);
    }
    if metrics.topup_over_cap() {
        triggered.push(TOPUP_OVER_CAP);
    }
    if vice_hard {
        triggered.push(VICE_HARD);
    } else if vice_over {
        triggered.push(VICE_OVER);
    }
    if let (Some(avg3), Some(avg7)) = (spending_avg3, spending_avg7) {
        if avg7 > 0.0 && avg3 > avg7 * config.spending_trend_ratio {
            triggered.push(SPENDING_UP);
        }
    }
    if near_due {
        triggered.push(NEAR_DUE);
    }
    if cash_on_hand.is_none() {
        triggered.push(CASH_MISSING);
    }

    // The projection always closes the list.
    let mut reasons = dedup_capped(triggered, config.domain_reason_cap.saturating_sub(1));
    reasons.push(if projected_net_to_payday < 0.0 {
        PROJECTION_RISKY.to_string()
    } else {
        PROJECTION_SAFE.to_string()
    });

    let freeze = &configuration.freeze;
    let actions = match level {
        Level::Critical => vec![
            format!(
                "Freeze Mode for {} days (vice max {}, other spending 0, \
                 top-ups only from the weekly allowance)",
                freeze.days, freeze.vice_max
            ),
            "Vice and top-up guardrails".to_string(),
        ],
        Level::AtRisk => vec!["Back to the vice and top-up guardrails".to_string()],
        Level::Safe => vec!["Keep the spending rhythm".to_string()],
    };

    DomainStatus {
        level,
        score: clamp_score(100.0 - penalty),
        confidence,
        reasons,
        actions,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::test_support::{finance, stamp, today, window};

    fn run(days: Vec<Option<FinanceRecord>>, confidence: u8) -> DomainStatus<FinanceMetrics> {
        evaluate(
            &window(days),
            today(),
            confidence,
            &Configuration::default(),
            &AssessmentConfig::default(),
        )
    }

    fn with_net(offset: u64, net: i64) -> FinanceRecord {
        finance(offset, |record| {
            if net >= 0 {
                record.income = net as u64;
            } else {
                record.expense_food = net.unsigned_abs();
            }
            record.cash_on_hand = Some(500_000);
        })
    }

    #[test]
    fn two_day_deficit_streak_is_critical() {
        let status = run(
            vec![
                Some(with_net(0, -50_000)),
                Some(with_net(1, -20_000)),
                Some(with_net(2, 10_000)),
            ],
            70,
        );
        assert_eq!(status.metrics.deficit_streak, 2);
        assert_eq!(status.level, Level::Critical);
        assert_eq!(status.reasons[0], DEFICIT_STREAK);
        assert!(status.actions[0].starts_with("Freeze Mode for 3 days"));
    }

    #[test]
    fn deficit_with_low_cash_is_critical_but_with_buffer_is_not() {
        let low_cash = finance(0, |record| {
            record.expense_food = 30_000;
            record.cash_on_hand = Some(20_000);
        });
        assert_eq!(run(vec![Some(low_cash)], 70).level, Level::Critical);

        let buffered = finance(0, |record| {
            record.expense_food = 30_000;
            record.cash_on_hand = Some(500_000);
        });
        let status = run(vec![Some(buffered)], 70);
        assert_eq!(status.level, Level::AtRisk);
        assert!(status.reasons.iter().any(|r| r == DEFICIT_TODAY));
    }

    #[test]
    fn streak_stops_at_gap() {
        let status = run(
            vec![Some(with_net(0, -5_000)), None, Some(with_net(2, -5_000))],
            70,
        );
        assert_eq!(status.metrics.deficit_streak, 1);
    }

    #[test]
    fn topup_streak_needs_three_logged_days() {
        let topped = |offset| {
            finance(offset, |record| {
                record.income = 100_000;
                record.topup_wallet = 10_000;
                record.cash_on_hand = Some(300_000);
            })
        };
        let status = run(vec![Some(topped(0)), Some(topped(1)), Some(topped(2))], 70);
        assert!(status.metrics.topup_streak);
        assert_eq!(status.level, Level::Critical);

        let status = run(vec![Some(topped(0)), None, Some(topped(2))], 70);
        assert!(!status.metrics.topup_streak);
        assert_eq!(status.level, Level::Safe);
    }

    #[test]
    fn vice_caps_escalate() {
        let vice = |spend| {
            finance(0, move |record| {
                record.income = 200_000;
                record.vice_spend = spend;
                record.cash_on_hand = Some(300_000);
            })
        };
        assert_eq!(run(vec![Some(vice(15_000))], 70).level, Level::AtRisk);
        assert_eq!(run(vec![Some(vice(25_000))], 70).level, Level::Critical);
        assert_eq!(run(vec![Some(vice(10_000))], 70).level, Level::Safe);
    }

    #[test]
    fn near_due_bumps_only_unsafe_levels() {
        let config = AssessmentConfig::default();
        let configuration = Configuration::default();
        let due_eve = DayKey::from_ymd(2024, 6, 14).unwrap();
        let record = |spend| {
            let mut record = FinanceRecord::empty(due_eve, stamp());
            record.income = 200_000;
            record.vice_spend = spend;
            record.cash_on_hand = Some(300_000);
            record
        };

        let risky = evaluate(
            &window(vec![Some(record(15_000))]),
            due_eve,
            70,
            &configuration,
            &config,
        );
        assert!(risky.metrics.near_due);
        assert_eq!(risky.level, Level::Critical);

        let calm = evaluate(
            &window(vec![Some(record(0))]),
            due_eve,
            70,
            &configuration,
            &config,
        );
        assert_eq!(calm.level, Level::Safe);
        assert!(calm.reasons.iter().any(|r| r == NEAR_DUE));
    }

    #[test]
    fn projection_closes_reasons() {
        let status = run(vec![Some(with_net(0, 50_000))], 70);
        assert_eq!(status.reasons.last().map(String::as_str), Some(PROJECTION_SAFE));
        assert!(status.reasons.len() <= AssessmentConfig::default().domain_reason_cap);

        let broke = finance(0, |record| {
            record.expense_food = 900_000;
            record.cash_on_hand = Some(0);
        });
        let status = run(vec![Some(broke)], 70);
        assert!(status.metrics.projected_net_to_payday < 0.0);
        assert_eq!(status.reasons.last().map(String::as_str), Some(PROJECTION_RISKY));
    }

    #[test]
    fn no_data_is_never_safe() {
        let status = run(vec![None; 7], 40);
        assert_eq!(status.level, Level::AtRisk);
        assert_eq!(status.reasons[0], ROUGH_ESTIMATE);
        assert!(status.reasons.iter().any(|r| r == CASH_MISSING));
        assert_eq!(status.metrics.known_days7, 0);
    }

    #[test]
    fn spending_trend_needs_rising_three_day_average() {
        let spend = |offset, amount| {
            finance(offset, move |record| {
                record.income = 1_000_000;
                record.expense_food = amount;
                record.cash_on_hand = Some(1_000_000);
            })
        };
        let days = vec![
            Some(spend(0, 90_000)),
            Some(spend(1, 90_000)),
            Some(spend(2, 90_000)),
            Some(spend(3, 10_000)),
            Some(spend(4, 10_000)),
        ];
        let status = run(days, 70);
        assert!(status.reasons.iter().any(|r| r == SPENDING_UP));
    }
}
