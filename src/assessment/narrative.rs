//! Overall reasons: the reason driver's own list, trimmed to what the data
//! can support.

use crate::assessment::{config::AssessmentConfig, window::dedup_capped};

pub const PROVISIONAL_READING: &str = "For now I'm reading this as an estimate.";
pub const NOT_ENOUGH_NOTES: &str = "My notes aren't enough yet, so this is provisional.";

/// Phrases that claim a multi-day trend.
const TREND_MARKERS: [&str; 8] = [
    "lately",
    "last three days",
    "last 3 days",
    "this week",
    "weekly",
    "past few days",
    "7 days",
    "seven days",
];

fn claims_trend(reason: &str) -> bool {
    let lower = reason.to_lowercase();
    TREND_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn is_disclaimer(reason: &str) -> bool {
    let lower = reason.to_lowercase();
    lower.contains("estimate") || lower.contains("provisional")
}

pub fn overall_reasons(
    reasons: &[String],
    known_days: usize,
    confidence: u8,
    config: &AssessmentConfig,
) -> Vec<String> {
    let sparse = known_days < config.min_known_days;
    let mut selected: Vec<&str> = reasons
        .iter()
        .map(String::as_str)
        .filter(|reason| !(sparse && claims_trend(reason)))
        .collect();

    if confidence < config.low_confidence && !selected.iter().any(|reason| is_disclaimer(reason)) {
        selected.insert(0, PROVISIONAL_READING);
    }

    let mut overall = dedup_capped(selected, config.overall_reason_cap);
    if overall.is_empty() {
        overall.push(NOT_ENOUGH_NOTES.to_string());
    }
    overall
}
