mod common;

use common::{career, clean_day, daily, finance, input, relation, today, window};
use lifeline_lib::assessment::{
    assess, AssessmentConfig, AssessmentInput, Domain, Level, ModeTomorrow,
};
use lifeline_lib::settings::Configuration;
use lifeline_lib::time::DayKey;

#[test]
fn depleted_day_is_critical_with_sleep_and_food_reasons() {
    let mut input = input();
    input.daily = window(vec![Some(daily(0, |log| {
        log.sleep_hours = 4.0;
        log.meals_count = 0;
        log.drop_sessions = 3;
        log.breath_sessions = 0;
    }))]);

    let assessment = assess(&input, &AssessmentConfig::default());
    let stability = &assessment.per_domain.stability;
    assert_eq!(stability.level, Level::Critical);
    assert!(stability.score <= 20);
    assert!(stability.reasons.iter().any(|r| r.contains("sleep was too thin")));
    assert!(stability.reasons.iter().any(|r| r == "I barely ate today."));
    assert_eq!(assessment.mode_tomorrow, ModeTomorrow::Survive);
}

#[test]
fn clean_today_caps_stability_despite_bad_history() {
    let mut input = input();
    let mut days = vec![Some(clean_day(0))];
    for offset in 1..7 {
        days.push(Some(daily(offset, |log| {
            log.sleep_hours = 3.0;
            log.drop_sessions = 4;
        })));
    }
    input.daily = window(days);

    let assessment = assess(&input, &AssessmentConfig::default());
    assert_ne!(assessment.per_domain.stability.level, Level::Critical);
}

#[test]
fn only_today_logged_reads_as_partial() {
    let mut input = input();
    input.daily = window(vec![Some(clean_day(0))]);
    input.finance = window(vec![Some(finance(0, |record| {
        record.income = 80_000;
        record.expense_food = 30_000;
        record.cash_on_hand = Some(300_000);
    }))]);
    input.relation = window(vec![Some(relation(0, |record| {
        record.note = "Dinner together".into();
    }))]);
    input.career = window(vec![Some(career(0, |record| record.outreach_sent = 1))]);

    let assessment = assess(&input, &AssessmentConfig::default());
    assert_eq!(assessment.per_domain.stability.confidence, 70);
    assert_eq!(assessment.per_domain.finance.confidence, 70);
    assert!(assessment.overall_level >= Level::AtRisk);
    assert_ne!(assessment.mode_tomorrow, ModeTomorrow::Push);
}

#[test]
fn deficit_with_thin_cash_is_critical_but_not_with_a_cushion() {
    let run = |cash| {
        let mut input = input();
        input.finance = window(vec![Some(finance(0, |record| {
            record.income = 20_000;
            record.expense_food = 45_000;
            record.cash_on_hand = Some(cash);
        }))]);
        assess(&input, &AssessmentConfig::default()).per_domain.finance.level
    };

    assert_eq!(run(30_000), Level::Critical);
    assert_ne!(run(500_000), Level::Critical);
}

#[test]
fn two_deficit_days_in_a_row_are_critical() {
    let mut input = input();
    input.finance = window(vec![
        Some(finance(0, |record| record.expense_food = 50_000)),
        Some(finance(1, |record| record.expense_fuel = 20_000)),
        Some(finance(2, |record| record.income = 10_000)),
    ]);

    let assessment = assess(&input, &AssessmentConfig::default());
    assert_eq!(assessment.per_domain.finance.metrics.deficit_streak, 2);
    assert_eq!(assessment.per_domain.finance.level, Level::Critical);
    assert_eq!(assessment.mode_tomorrow, ModeTomorrow::Survive);
}

#[test]
fn ritual_today_keeps_relations_off_critical() {
    let mut input = input();
    let mut days = vec![Some(daily(0, |log| log.ritual_done = true))];
    for offset in 1..7 {
        days.push(Some(daily(offset, |log| log.ritual_done = false)));
    }
    input.daily = window(days);

    let assessment = assess(&input, &AssessmentConfig::default());
    assert!(assessment.per_domain.relations.level <= Level::AtRisk);
}

#[test]
fn a_steady_week_pushes_forward() {
    let mut input = input();
    input.daily = window((0..7).map(|offset| Some(clean_day(offset))).collect());
    input.finance = window(
        (0..7)
            .map(|offset| {
                Some(finance(offset, |record| {
                    record.income = 90_000;
                    record.expense_food = 30_000;
                    record.cash_on_hand = Some(400_000);
                }))
            })
            .collect(),
    );
    input.career = window(
        (0..7)
            .map(|offset| Some(career(offset, |record| record.practice_minutes = 45)))
            .collect(),
    );

    let assessment = assess(&input, &AssessmentConfig::default());
    for domain in Domain::PRIORITY {
        assert_eq!(assessment.per_domain.level(domain), Level::Safe, "{domain:?}");
    }
    assert_eq!(assessment.overall_level, Level::Safe);
    assert_eq!(assessment.mode_tomorrow, ModeTomorrow::Push);
    assert!(assessment.plan_tomorrow.len() <= 3);
    assert_eq!(assessment.date_key, today());
}

/// The day before the default due day on the 15th.
fn due_eve() -> DayKey {
    DayKey::from_ymd(2024, 6, 14).unwrap()
}

#[test]
fn silent_finance_week_on_a_due_eve_is_at_risk() {
    let input = AssessmentInput::empty(due_eve(), Configuration::default());
    let assessment = assess(&input, &AssessmentConfig::default());
    let finance = &assessment.per_domain.finance;

    assert!(finance.metrics.near_due);
    assert!(!finance.metrics.today_known);
    assert!(finance.confidence <= 40);
    assert_eq!(finance.level, Level::AtRisk);
    assert!(finance
        .reasons
        .iter()
        .any(|reason| reason == "A debt payment is close, so I need to be extra tidy."));
}

#[test]
fn a_deficit_on_a_due_eve_escalates_to_critical() {
    let mut input = AssessmentInput::empty(due_eve(), Configuration::default());
    input.finance = window(vec![Some(common::finance_on(due_eve(), |record| {
        record.expense_food = 40_000;
        record.cash_on_hand = Some(500_000);
    }))]);

    let assessment = assess(&input, &AssessmentConfig::default());
    assert_eq!(assessment.per_domain.finance.level, Level::Critical);
    assert_eq!(assessment.mode_tomorrow, ModeTomorrow::Survive);
}
