//! Daily assessment engine.
//!
//! Everything except [`loader`] is pure: evaluators take explicit windows and
//! configuration and return plain values, treating absent or non-finite
//! inputs as unknown rather than failing.

pub mod aggregate;
pub mod career;
pub mod confidence;
pub mod config;
pub mod finance;
pub mod loader;
pub mod narrative;
pub mod pipeline;
pub mod plan;
pub mod relations;
pub mod spiritual;
pub mod stability;
pub mod types;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AssessmentConfig;
pub use loader::assess_day;
pub use pipeline::{assess, AssessmentInput};
pub use types::{Assessment, Domain, DomainStatus, Level, ModeTomorrow, PerDomain};
pub use window::DayWindow;

/// Disclaimer a domain leads with when its confidence is low.
pub const ROUGH_ESTIMATE: &str = "This is still a rough estimate because my notes are thin.";
