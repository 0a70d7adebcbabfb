//! Career: small daily moves (outreach or practice) and the week's momentum.

use serde::Serialize;

use crate::assessment::{
    config::AssessmentConfig,
    types::{DomainStatus, Level},
    window::{dedup_capped, known_count, DayWindow},
    ROUGH_ESTIMATE,
};
use crate::db::models::CareerRecord;

/// Practice minutes that count as moving on their own.
const PRACTICE_MOVE_MINUTES: u32 = 30;

const MOVED_BOTH: &str = "I moved today (outreach and practice).";
const MOVED_OUTREACH: &str = "I moved today (client outreach).";
const MOVED_PRACTICE: &str = "I moved today (practice).";
const SURVIVE_FIRST: &str = "Today I put getting through first.";
const STALLED: &str = "I'm fairly steady, but my work rhythm has stalled.";
const NOT_MOVED: &str = "I haven't moved yet today.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerMetrics {
    /// Days in the window with outreach or enough practice
    pub momentum7: usize,
    pub moved_today: bool,
    pub known_days7: usize,
    pub today_known: bool,
}

fn moved_by_outreach(record: &CareerRecord) -> bool {
    record.outreach_sent >= 1
}

fn moved_by_practice(record: &CareerRecord) -> bool {
    record.practice_minutes >= PRACTICE_MOVE_MINUTES
}

fn moved(record: &CareerRecord) -> bool {
    moved_by_outreach(record) || moved_by_practice(record)
}

pub fn evaluate(
    career: &DayWindow<CareerRecord>,
    stability: Level,
    confidence: u8,
    config: &AssessmentConfig,
) -> DomainStatus<CareerMetrics> {
    let window7 = career.recent(config.window_days);
    let today = career.today();
    let by_outreach = today.is_some_and(moved_by_outreach);
    let by_practice = today.is_some_and(moved_by_practice);
    let moved_today = by_outreach || by_practice;
    let momentum7 = window7.iter().flatten().filter(|record| moved(record)).count();
    let known_days7 = known_count(window7);
    let enough_data = known_days7 >= config.min_known_days;

    let mut level = if moved_today {
        Level::Safe
    } else if enough_data && momentum7 <= 2 && stability == Level::Safe {
        Level::Critical
    } else {
        Level::AtRisk
    };
    if !enough_data {
        level = level.capped_at(Level::AtRisk);
    }
    if stability == Level::Critical && level == Level::Safe {
        level = Level::AtRisk;
    }

    let mut reasons: Vec<&str> = Vec::new();
    if today.is_none() {
        reasons.push(ROUGH_ESTIMATE);
    }
    reasons.push(match (by_outreach, by_practice) {
        (true, true) => MOVED_BOTH,
        (true, false) => MOVED_OUTREACH,
        (false, true) => MOVED_PRACTICE,
        (false, false) if stability == Level::Critical => SURVIVE_FIRST,
        (false, false) if level == Level::Critical => STALLED,
        (false, false) => NOT_MOVED,
    });

    let action = if stability == Level::Critical {
        "Today I get through first. Career tomorrow."
    } else {
        match level {
            Level::Critical => "Tomorrow, just one message.",
            Level::AtRisk => "Start with one small message.",
            Level::Safe => "Keep the small rhythm.",
        }
    };

    let score = if moved_today {
        85
    } else if level == Level::Critical {
        35
    } else {
        55
    };

    DomainStatus {
        level,
        score,
        confidence,
        reasons: dedup_capped(reasons, config.domain_reason_cap),
        actions: vec![action.to_string()],
        metrics: CareerMetrics {
            momentum7,
            moved_today,
            known_days7,
            today_known: today.is_some(),
        },
    }
}
