//! The pure assessment: a bundle of recent records and configuration in, a
//! structured assessment out. Stability is evaluated first because Relations
//! and Career consult its level; aggregation, narrative and plan follow.

use crate::assessment::{
    aggregate, career,
    confidence::Coverage,
    config::AssessmentConfig,
    finance, narrative,
    plan::{self, RelationSignals},
    relations, spiritual, stability,
    types::{Assessment, DebugCounts, DebugInfo, PerDomain, TodayRecords},
    window::DayWindow,
};
use crate::db::models::{CareerRecord, DailyRecord, FinanceRecord, RelationRecord};
use crate::settings::Configuration;
use crate::time::{keys_back, DayKey};

/// Everything the engine reads. Windows are most-recent-first with index 0
/// for `today`; absent days stay `None`.
#[derive(Debug, Clone)]
pub struct AssessmentInput {
    pub today: DayKey,
    pub daily: DayWindow<DailyRecord>,
    pub finance: DayWindow<FinanceRecord>,
    pub relation: DayWindow<RelationRecord>,
    pub career: DayWindow<CareerRecord>,
    pub configuration: Configuration,
}

impl AssessmentInput {
    /// No records at all for `today`'s window.
    pub fn empty(today: DayKey, configuration: Configuration) -> Self {
        Self {
            today,
            daily: DayWindow::default(),
            finance: DayWindow::default(),
            relation: DayWindow::default(),
            career: DayWindow::default(),
            configuration,
        }
    }
}

pub fn assess(input: &AssessmentInput, config: &AssessmentConfig) -> Assessment {
    let coverage = Coverage::measure(&input.daily, &input.finance, &input.career, config);

    let stability = stability::evaluate(&input.daily, coverage.stability(), config);
    let finance = finance::evaluate(
        &input.finance,
        input.today,
        coverage.finance(config),
        &input.configuration,
        config,
    );
    let relations = relations::evaluate(
        &input.daily,
        stability.level,
        coverage.relations(config),
        config,
    );
    let spiritual = spiritual::evaluate(&input.daily, coverage.spiritual(config), config);
    let career = career::evaluate(
        &input.career,
        stability.level,
        coverage.career(config),
        config,
    );

    let per_domain = PerDomain {
        stability,
        finance,
        relations,
        spiritual,
        career,
    };

    let overall_level = aggregate::overall_level(&per_domain);
    let drivers = aggregate::select_drivers(&per_domain, config);
    let mode_tomorrow = aggregate::mode_tomorrow(&per_domain, overall_level);

    let reason_driver = drivers.reason_driver;
    let overall_reasons = narrative::overall_reasons(
        per_domain.reasons(reason_driver),
        coverage.known_days(reason_driver),
        per_domain.confidence(reason_driver),
        config,
    );

    let signals = RelationSignals {
        ritual_today: input.daily.today().is_some_and(|log| log.ritual_done),
        note_today: input.relation.today().is_some_and(RelationRecord::has_note),
    };
    let plan_tomorrow = plan::plan_tomorrow(&per_domain, &drivers, mode_tomorrow, signals, config);

    let counts = DebugCounts {
        known_days7: coverage.daily_known7,
        ritual_true7: per_domain.relations.metrics.ritual_count7,
        morning_miss_streak: per_domain.spiritual.metrics.miss_streak,
        deficit_streak: per_domain.finance.metrics.deficit_streak,
        weekly_topup7: per_domain.finance.metrics.weekly_topup7,
        topup_streak: per_domain.finance.metrics.topup_streak,
    };

    let debug_info = DebugInfo {
        window_keys: keys_back(input.today, config.window_days),
        reason_driver,
        primary_driver_confidence: per_domain.confidence(drivers.primary),
        bottleneck_confidence: per_domain.confidence(drivers.bottleneck),
        energy_low: plan::energy_low(&per_domain.stability),
        counts,
        today: TodayRecords {
            daily: input.daily.today().cloned(),
            finance: input.finance.today().cloned(),
            relation: input.relation.today().cloned(),
            career: input.career.today().cloned(),
        },
        impact_scores: drivers.impact_scores,
        driver_scores: drivers.driver_scores,
    };

    Assessment {
        date_key: input.today,
        per_domain,
        overall_level,
        overall_reasons,
        plan_tomorrow,
        primary_driver: drivers.primary,
        bottleneck_domain: drivers.bottleneck,
        mode_tomorrow,
        debug_info,
    }
}
