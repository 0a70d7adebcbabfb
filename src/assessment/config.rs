/// Tunable constants for the assessment engine.
///
/// These are product "feel" values, kept together so they can be adjusted
/// without touching the evaluators.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    /// Trailing window length (days, including today)
    pub window_days: usize,

    /// Below this confidence a domain's reading is an estimate
    pub low_confidence: u8,

    /// At or above this confidence a domain may be named the bottleneck
    pub reliable_confidence: u8,

    /// Driver-score multiplier for low-confidence domains that are not critical
    pub low_confidence_damping: f64,

    /// Known days needed before Relations/Career may claim CRITICAL, and before
    /// trend reasons are surfaced in the overall narrative
    pub min_known_days: usize,

    /// Known days needed before Spiritual may claim CRITICAL
    pub spiritual_min_known_days: usize,

    pub domain_reason_cap: usize,
    pub overall_reason_cap: usize,

    /// Plan length in survive mode / otherwise
    pub plan_cap_survive: usize,
    pub plan_cap_default: usize,

    /// 3-day average spending above 7-day average × ratio counts as a trend
    pub spending_trend_ratio: f64,

    /// 3-day sleep average this far below the 7-day average counts as a decline
    pub sleep_trend_margin: f64,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            low_confidence: 60,
            reliable_confidence: 70,
            low_confidence_damping: 0.25,
            min_known_days: 4,
            spiritual_min_known_days: 3,
            domain_reason_cap: 4,
            overall_reason_cap: 2,
            plan_cap_survive: 2,
            plan_cap_default: 3,
            spending_trend_ratio: 1.1,
            sleep_trend_margin: 0.3,
        }
    }
}
