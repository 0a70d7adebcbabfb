use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assessment::{
    career::CareerMetrics, finance::FinanceMetrics, relations::RelationsMetrics,
    spiritual::SpiritualMetrics, stability::StabilityMetrics,
};
use crate::db::models::{CareerRecord, DailyRecord, FinanceRecord, RelationRecord};
use crate::time::DayKey;

/// Three-valued risk classification, ordered `Safe < AtRisk < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Safe,
    AtRisk,
    Critical,
}

impl Level {
    /// One step worse; `Critical` stays `Critical`.
    pub fn bump(self) -> Self {
        match self {
            Level::Safe => Level::AtRisk,
            Level::AtRisk | Level::Critical => Level::Critical,
        }
    }

    pub fn capped_at(self, ceiling: Level) -> Self {
        self.min(ceiling)
    }

    pub fn worst(levels: impl IntoIterator<Item = Level>) -> Self {
        levels.into_iter().fold(Level::Safe, Level::max)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Safe => "SAFE",
            Level::AtRisk => "AT_RISK",
            Level::Critical => "CRITICAL",
        }
    }
}

/// Life domains in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Domain {
    Stability,
    Finance,
    Relations,
    Spiritual,
    Career,
}

impl Domain {
    pub const PRIORITY: [Domain; 5] = [
        Domain::Stability,
        Domain::Finance,
        Domain::Relations,
        Domain::Spiritual,
        Domain::Career,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Stability => "STABILITY",
            Domain::Finance => "FINANCE",
            Domain::Relations => "RELATIONS",
            Domain::Spiritual => "SPIRITUAL",
            Domain::Career => "CAREER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeTomorrow {
    /// Stability or finance is critical: only protect the basics.
    #[serde(rename = "SELAMAT")]
    Survive,
    /// Something is at risk: tidy up.
    #[serde(rename = "RAPIKAN")]
    Tidy,
    /// Everything holds: push forward.
    #[serde(rename = "DORONG")]
    Push,
}

impl ModeTomorrow {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeTomorrow::Survive => "SELAMAT",
            ModeTomorrow::Tidy => "RAPIKAN",
            ModeTomorrow::Push => "DORONG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStatus<M> {
    pub level: Level,
    pub score: u8,
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub actions: Vec<String>,
    pub metrics: M,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerDomain {
    pub stability: DomainStatus<StabilityMetrics>,
    pub finance: DomainStatus<FinanceMetrics>,
    pub relations: DomainStatus<RelationsMetrics>,
    pub spiritual: DomainStatus<SpiritualMetrics>,
    pub career: DomainStatus<CareerMetrics>,
}

impl PerDomain {
    pub fn level(&self, domain: Domain) -> Level {
        match domain {
            Domain::Stability => self.stability.level,
            Domain::Finance => self.finance.level,
            Domain::Relations => self.relations.level,
            Domain::Spiritual => self.spiritual.level,
            Domain::Career => self.career.level,
        }
    }

    pub fn confidence(&self, domain: Domain) -> u8 {
        match domain {
            Domain::Stability => self.stability.confidence,
            Domain::Finance => self.finance.confidence,
            Domain::Relations => self.relations.confidence,
            Domain::Spiritual => self.spiritual.confidence,
            Domain::Career => self.career.confidence,
        }
    }

    pub fn reasons(&self, domain: Domain) -> &[String] {
        match domain {
            Domain::Stability => &self.stability.reasons,
            Domain::Finance => &self.finance.reasons,
            Domain::Relations => &self.relations.reasons,
            Domain::Spiritual => &self.spiritual.reasons,
            Domain::Career => &self.career.reasons,
        }
    }

    pub fn levels(&self) -> [Level; 5] {
        Domain::PRIORITY.map(|domain| self.level(domain))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayRecords {
    pub daily: Option<DailyRecord>,
    pub finance: Option<FinanceRecord>,
    pub relation: Option<RelationRecord>,
    pub career: Option<CareerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugCounts {
    pub known_days7: usize,
    pub ritual_true7: usize,
    pub morning_miss_streak: usize,
    pub deficit_streak: usize,
    pub weekly_topup7: u64,
    pub topup_streak: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub window_keys: Vec<DayKey>,
    pub reason_driver: Domain,
    pub primary_driver_confidence: u8,
    pub bottleneck_confidence: u8,
    pub impact_scores: BTreeMap<Domain, u8>,
    pub driver_scores: BTreeMap<Domain, u32>,
    pub energy_low: bool,
    pub counts: DebugCounts,
    pub today: TodayRecords,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub date_key: DayKey,
    pub per_domain: PerDomain,
    pub overall_level: Level,
    pub overall_reasons: Vec<String>,
    pub plan_tomorrow: Vec<String>,
    pub primary_driver: Domain,
    pub bottleneck_domain: Domain,
    pub mode_tomorrow: ModeTomorrow,
    pub debug_info: DebugInfo,
}
