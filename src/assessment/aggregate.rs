//! Cross-domain rollup: overall level, impact and driver scores, and the
//! domains that lead the narrative and the plan.
//!
//! The impact score measures how strongly a domain's current metrics should
//! steer tomorrow, independent of the domain's own health score. Driver scores
//! weight impact by confidence so a thinly logged domain cannot take the
//! spotlight unless it is critical.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::assessment::{
    config::AssessmentConfig,
    types::{Domain, Level, ModeTomorrow, PerDomain},
    window::clamp_score,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Drivers {
    pub impact_scores: BTreeMap<Domain, u8>,
    pub driver_scores: BTreeMap<Domain, u32>,
    pub primary: Domain,
    pub bottleneck: Domain,
    /// Domain whose reasons explain the day
    pub reason_driver: Domain,
}

pub fn overall_level(per_domain: &PerDomain) -> Level {
    Level::worst(per_domain.levels())
}

pub fn mode_tomorrow(per_domain: &PerDomain, overall: Level) -> ModeTomorrow {
    let survival = [per_domain.stability.level, per_domain.finance.level];
    if survival.contains(&Level::Critical) {
        ModeTomorrow::Survive
    } else if overall == Level::AtRisk {
        ModeTomorrow::Tidy
    } else {
        ModeTomorrow::Push
    }
}

pub fn impact_score(per_domain: &PerDomain, domain: Domain) -> u8 {
    let stability_level = per_domain.stability.level;
    let mut impact = 0.0;

    match domain {
        Domain::Stability => {
            let m = &per_domain.stability.metrics;
            impact += match m.sleep_avg3 {
                Some(avg) if avg < 5.0 => 40.0,
                Some(avg) if avg < 5.5 => 25.0,
                _ => 0.0,
            };
            if m.sleep_hours_today.is_some_and(|sleep| sleep < 5.0) {
                impact += 20.0;
            }
            if m.drop_sum3 >= 6 {
                impact += 25.0;
            } else if m.drop_sum3 >= 3 {
                impact += 15.0;
            }
            if m.breath_today.is_some_and(|breath| breath < 2) {
                impact += 10.0;
            }
            if m.meals_today == Some(0) {
                impact += 10.0;
            }
        }
        Domain::Finance => {
            let m = &per_domain.finance.metrics;
            impact += match m.deficit_streak {
                0 => 0.0,
                1 => 20.0,
                _ => 35.0,
            };
            if m.projected_net_to_payday < 0.0 {
                impact += 30.0;
            }
            if m.near_due {
                impact += 15.0;
            }
            if m.net_today.is_some_and(|net| net < 0) {
                impact += 15.0;
            }
            if m.topup_over_cap() {
                impact += 10.0;
            }
        }
        Domain::Relations => {
            let m = &per_domain.relations.metrics;
            if m.ritual_count7 <= 2 {
                impact += 25.0;
            } else if m.ritual_count7 <= 5 {
                impact += 15.0;
            }
            if stability_level != Level::Safe {
                impact += 10.0;
            }
            if m.missed_last_two {
                impact += 10.0;
            }
        }
        Domain::Spiritual => {
            impact += match per_domain.spiritual.metrics.miss_streak {
                0 => 0.0,
                1 | 2 => 10.0,
                _ => 20.0,
            };
        }
        Domain::Career => {
            let m = &per_domain.career.metrics;
            if stability_level == Level::Safe && m.momentum7 <= 2 {
                impact += 20.0;
            }
            if !m.moved_today {
                impact += 10.0;
            }
        }
    }

    clamp_score(impact)
}

pub fn driver_score(impact: u8, confidence: u8, level: Level, config: &AssessmentConfig) -> u32 {
    let mut score = f64::from(impact) * f64::from(confidence) / 100.0;
    if confidence < config.low_confidence && level != Level::Critical {
        score *= config.low_confidence_damping;
    }
    score.round().max(0.0) as u32
}

/// Worst level among `candidates`, earliest in priority order on ties.
fn worst_of(
    per_domain: &PerDomain,
    candidates: impl IntoIterator<Item = Domain>,
) -> Option<Domain> {
    let mut best: Option<Domain> = None;
    for domain in candidates {
        match best {
            Some(current) if per_domain.level(domain) <= per_domain.level(current) => {}
            _ => best = Some(domain),
        }
    }
    best
}

pub fn select_drivers(per_domain: &PerDomain, config: &AssessmentConfig) -> Drivers {
    let mut impact_scores = BTreeMap::new();
    let mut driver_scores = BTreeMap::new();
    for domain in Domain::PRIORITY {
        let impact = impact_score(per_domain, domain);
        let score = driver_score(
            impact,
            per_domain.confidence(domain),
            per_domain.level(domain),
            config,
        );
        impact_scores.insert(domain, impact);
        driver_scores.insert(domain, score);
    }

    let mut primary = Domain::Stability;
    for domain in Domain::PRIORITY {
        if driver_scores[&domain] > driver_scores[&primary] {
            primary = domain;
        }
    }

    let reliable = Domain::PRIORITY
        .into_iter()
        .filter(|domain| per_domain.confidence(*domain) >= config.reliable_confidence);
    let bottleneck = worst_of(per_domain, reliable).unwrap_or(primary);

    let reason_driver = if per_domain.confidence(primary) < config.low_confidence {
        let anchors = [Domain::Stability, Domain::Finance].into_iter().filter(|domain| {
            per_domain.confidence(*domain) >= config.reliable_confidence
                && per_domain.level(*domain) != Level::Safe
        });
        worst_of(per_domain, anchors).unwrap_or(primary)
    } else {
        primary
    };

    Drivers {
        impact_scores,
        driver_scores,
        primary,
        bottleneck,
        reason_driver,
    }
}
