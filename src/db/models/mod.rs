pub mod career_log;
pub mod daily_log;
pub mod finance_log;
pub mod relation_log;
pub mod validation;

pub use career_log::{CareerPatch, CareerRecord};
pub use daily_log::{DailyPatch, DailyRecord};
pub use finance_log::{FinancePatch, FinanceRecord};
pub use relation_log::{RelationPatch, RelationRecord};
