//! Tomorrow's checklist, built from the bottleneck and primary driver.

use crate::assessment::{
    aggregate::Drivers,
    config::AssessmentConfig,
    stability::StabilityMetrics,
    types::{Domain, DomainStatus, Level, ModeTomorrow, PerDomain},
};

/// Candidates for the optional third slot, in order.
const EXTRA_DOMAINS: [Domain; 3] = [Domain::Relations, Domain::Spiritual, Domain::Career];

/// Same-day signals from the relation and daily logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationSignals {
    pub ritual_today: bool,
    pub note_today: bool,
}

/// Never push career work on a depleted day.
pub fn energy_low(stability: &DomainStatus<StabilityMetrics>) -> bool {
    stability.level != Level::Safe
        && (!stability.metrics.today_known || stability.metrics.depleted_today())
}

pub fn action_for(domain: Domain, level: Level) -> &'static str {
    match (domain, level) {
        (Domain::Stability, Level::Critical) => "I go into Drop Mode",
        (Domain::Stability, Level::AtRisk) => "I add one breathing session",
        (Domain::Stability, Level::Safe) => "I keep my breathing rhythm",
        (Domain::Finance, Level::Critical) => "I go into Freeze Mode for 3 days",
        (Domain::Finance, Level::AtRisk) => "I go back to the vice and top-up guardrails",
        (Domain::Finance, Level::Safe) => "I keep my spending rhythm",
        (Domain::Relations, _) => "I do the 7-minute ritual (tomorrow)",
        (Domain::Spiritual, _) => "I hold the morning practice",
        (Domain::Career, _) => "I send one client message",
    }
}

fn relations_action(signals: RelationSignals) -> &'static str {
    match (signals.ritual_today, signals.note_today) {
        (true, true) => "Keep the 7-minute ritual tomorrow",
        (true, false) => "Tomorrow, just leave one sentence for my partner",
        (false, _) => action_for(Domain::Relations, Level::Safe),
    }
}

pub fn plan_tomorrow(
    per_domain: &PerDomain,
    drivers: &Drivers,
    mode: ModeTomorrow,
    signals: RelationSignals,
    config: &AssessmentConfig,
) -> Vec<String> {
    let allow_career = !energy_low(&per_domain.stability);
    let mut planned: Vec<Domain> = Vec::new();
    let mut plan: Vec<String> = Vec::new();

    let mut push = |domain: Domain, planned: &mut Vec<Domain>| {
        if domain == Domain::Career && !allow_career {
            return;
        }
        let action = match domain {
            Domain::Relations => relations_action(signals),
            _ => action_for(domain, per_domain.level(domain)),
        };
        planned.push(domain);
        if !plan.iter().any(|item| item == action) {
            plan.push(action.to_string());
        }
    };

    push(drivers.bottleneck, &mut planned);
    if drivers.primary != drivers.bottleneck {
        push(drivers.primary, &mut planned);
    }

    if mode != ModeTomorrow::Survive {
        let extra = EXTRA_DOMAINS.into_iter().find(|domain| {
            !planned.contains(domain) && (*domain != Domain::Career || allow_career)
        });
        if let Some(domain) = extra {
            push(domain, &mut planned);
        }
    }

    let cap = match mode {
        ModeTomorrow::Survive => config.plan_cap_survive,
        ModeTomorrow::Tidy | ModeTomorrow::Push => config.plan_cap_default,
    };
    plan.truncate(cap);
    if plan.is_empty() {
        plan.push(action_for(Domain::Stability, per_domain.stability.level).to_string());
    }
    plan
}
