mod common;

use common::{career, daily, finance, input, relation};
use lifeline_lib::assessment::{
    assess, AssessmentConfig, AssessmentInput, DayWindow, Domain, Level, ModeTomorrow,
};
use lifeline_lib::db::models::{CareerRecord, DailyRecord, FinanceRecord, RelationRecord};
use proptest::prelude::*;

const CAREER_ACTION: &str = "I send one client message";

fn daily_strategy() -> impl Strategy<Value = (f64, u32, u32, u32, Option<u8>, bool, bool)> {
    (
        0.0f64..10.0,
        0u32..4,
        0u32..4,
        0u32..5,
        proptest::option::of(1u8..=5),
        any::<bool>(),
        any::<bool>(),
    )
}

fn finance_strategy() -> impl Strategy<Value = (u64, u64, u64, u64, Option<u64>)> {
    (
        0u64..150_000,
        0u64..80_000,
        0u64..60_000,
        0u64..40_000,
        proptest::option::of(0u64..600_000),
    )
}

fn week<S: Strategy>(day: S) -> impl Strategy<Value = Vec<Option<S::Value>>> {
    proptest::collection::vec(proptest::option::of(day), 7)
}

fn build<V, T>(days: Vec<Option<V>>, make: impl Fn(u64, V) -> T) -> DayWindow<T> {
    DayWindow::new(
        days.into_iter()
            .enumerate()
            .map(|(offset, day)| day.map(|values| make(offset as u64, values)))
            .collect(),
    )
}

fn daily_record(offset: u64, v: (f64, u32, u32, u32, Option<u8>, bool, bool)) -> DailyRecord {
    daily(offset, |log| {
        log.sleep_hours = v.0;
        log.meals_count = v.1;
        log.breath_sessions = v.2;
        log.drop_sessions = v.3;
        log.heaviness = v.4;
        log.morning_practice_done = v.5;
        log.ritual_done = v.6;
    })
}

fn finance_record(offset: u64, v: (u64, u64, u64, u64, Option<u64>)) -> FinanceRecord {
    finance(offset, |record| {
        record.income = v.0;
        record.expense_food = v.1;
        record.topup_wallet = v.2;
        record.vice_spend = v.3;
        record.cash_on_hand = v.4;
    })
}

fn relation_record(offset: u64, with_note: bool) -> RelationRecord {
    relation(offset, |record| {
        if with_note {
            record.note = "Talked for a while".into();
        }
    })
}

fn career_record(offset: u64, v: (u32, u32)) -> CareerRecord {
    career(offset, |record| {
        record.outreach_sent = v.0;
        record.practice_minutes = v.1;
    })
}

fn input_strategy() -> impl Strategy<Value = AssessmentInput> {
    (
        week(daily_strategy()),
        week(finance_strategy()),
        week(any::<bool>()),
        week((0u32..=3, 0u32..=60)),
    )
        .prop_map(|(daily_days, finance_days, relation_days, career_days)| {
            let mut input = input();
            input.daily = build(daily_days, daily_record);
            input.finance = build(finance_days, finance_record);
            input.relation = build(relation_days, relation_record);
            input.career = build(career_days, career_record);
            input
        })
}

proptest! {
    #[test]
    fn overall_level_is_the_worst_domain(input in input_strategy()) {
        let assessment = assess(&input, &AssessmentConfig::default());
        let worst = Domain::PRIORITY
            .into_iter()
            .map(|domain| assessment.per_domain.level(domain))
            .max()
            .unwrap();
        prop_assert_eq!(assessment.overall_level, worst);
    }

    #[test]
    fn reasons_and_plan_stay_within_caps(input in input_strategy()) {
        let assessment = assess(&input, &AssessmentConfig::default());

        let reasons = &assessment.overall_reasons;
        prop_assert!(!reasons.is_empty() && reasons.len() <= 2);
        prop_assert!(reasons.iter().enumerate().all(|(i, r)| !reasons[..i].contains(r)));

        let plan = &assessment.plan_tomorrow;
        let cap = if assessment.mode_tomorrow == ModeTomorrow::Survive { 2 } else { 3 };
        prop_assert!(!plan.is_empty() && plan.len() <= cap);
        prop_assert!(plan.iter().enumerate().all(|(i, item)| !plan[..i].contains(item)));
    }

    #[test]
    fn depleted_unsteady_days_never_push_career(input in input_strategy()) {
        let assessment = assess(&input, &AssessmentConfig::default());
        let stability = &assessment.per_domain.stability;
        let breathless = stability.metrics.breath_today.is_some_and(|breath| breath < 2);
        if stability.level == Level::AtRisk && breathless {
            prop_assert!(assessment.debug_info.energy_low);
            prop_assert!(!assessment.plan_tomorrow.iter().any(|item| item == CAREER_ACTION));
        }
    }

    #[test]
    fn clean_today_is_never_critical_for_stability(
        input in input_strategy(),
        sleep in 6.0f64..10.0,
        meals in 1u32..4,
    ) {
        let mut input = input;
        let mut days = input.daily.days().to_vec();
        days[0] = Some(daily_record(0, (sleep, meals, 2, 0, None, true, true)));
        input.daily = DayWindow::new(days);

        let assessment = assess(&input, &AssessmentConfig::default());
        prop_assert_ne!(assessment.per_domain.stability.level, Level::Critical);
    }

    #[test]
    fn the_same_input_gives_the_same_assessment(input in input_strategy()) {
        let config = AssessmentConfig::default();
        let first = serde_json::to_string(&assess(&input, &config)).unwrap();
        let second = serde_json::to_string(&assess(&input, &config)).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn an_empty_week_never_claims_safety() {
    let assessment = assess(&input(), &AssessmentConfig::default());
    for domain in Domain::PRIORITY {
        assert!(assessment.per_domain.confidence(domain) <= 40, "{domain:?}");
        assert_ne!(assessment.per_domain.level(domain), Level::Safe, "{domain:?}");
    }
}
