use chrono::{DateTime, TimeZone, Utc};

use crate::assessment::{
    career::CareerMetrics,
    finance::FinanceMetrics,
    relations::RelationsMetrics,
    spiritual::SpiritualMetrics,
    stability::StabilityMetrics,
    types::{Domain, DomainStatus, Level, PerDomain},
    window::DayWindow,
};
use crate::db::models::{CareerRecord, DailyRecord, FinanceRecord, RelationRecord};
use crate::time::DayKey;

/// Well clear of the default debt due days.
pub fn today() -> DayKey {
    DayKey::from_ymd(2024, 6, 8).unwrap()
}

pub fn key(offset: u64) -> DayKey {
    today().days_before(offset)
}

pub fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap()
}

pub fn daily(offset: u64, edit: impl FnOnce(&mut DailyRecord)) -> DailyRecord {
    let mut record = DailyRecord::empty(key(offset), stamp());
    edit(&mut record);
    record
}

pub fn finance(offset: u64, edit: impl FnOnce(&mut FinanceRecord)) -> FinanceRecord {
    let mut record = FinanceRecord::empty(key(offset), stamp());
    edit(&mut record);
    record
}

pub fn relation(offset: u64, edit: impl FnOnce(&mut RelationRecord)) -> RelationRecord {
    let mut record = RelationRecord::empty(key(offset), stamp());
    edit(&mut record);
    record
}

pub fn career(offset: u64, edit: impl FnOnce(&mut CareerRecord)) -> CareerRecord {
    let mut record = CareerRecord::empty(key(offset), stamp());
    edit(&mut record);
    record
}

/// Pads to a full week with absent days.
pub fn window<T>(mut days: Vec<Option<T>>) -> DayWindow<T> {
    while days.len() < 7 {
        days.push(None);
    }
    DayWindow::new(days)
}

/// Every domain safe, reliably logged, with metrics that carry no impact.
pub fn per_domain() -> PerDomain {
    fn status<M>(metrics: M) -> DomainStatus<M> {
        DomainStatus {
            level: Level::Safe,
            score: 90,
            confidence: 80,
            reasons: Vec::new(),
            actions: Vec::new(),
            metrics,
        }
    }

    PerDomain {
        stability: status(StabilityMetrics {
            sleep_avg3: Some(7.0),
            sleep_avg7: Some(7.0),
            heaviness_avg3: None,
            drop_sum3: 0,
            sleep_hours_today: Some(7.0),
            meals_today: Some(3),
            breath_today: Some(2),
            drop_today: Some(0),
            today_known: true,
        }),
        finance: status(FinanceMetrics {
            net_today: Some(10_000),
            deficit_streak: 0,
            spending_avg7: Some(50_000.0),
            spending_avg3: Some(50_000.0),
            income_avg7: Some(60_000.0),
            weekly_topup7: 0,
            topup_streak: false,
            days_to_payday: 10,
            projected_net_to_payday: 100_000.0,
            near_due: false,
            cash_on_hand: Some(200_000),
            vice_max: 10_000,
            weekly_topup_max: 100_000,
            known_days7: 7,
            today_known: true,
        }),
        relations: status(RelationsMetrics {
            ritual_count7: 7,
            known_days7: 7,
            missed_last_two: false,
            ritual_today: true,
        }),
        spiritual: status(SpiritualMetrics {
            miss_streak: 0,
            known_days7: 7,
            today_known: true,
        }),
        career: status(CareerMetrics {
            momentum7: 5,
            moved_today: true,
            known_days7: 7,
            today_known: true,
        }),
    }
}

impl PerDomain {
    pub fn set(&mut self, domain: Domain, level: Level, confidence: u8) {
        let (slot_level, slot_confidence) = match domain {
            Domain::Stability => (&mut self.stability.level, &mut self.stability.confidence),
            Domain::Finance => (&mut self.finance.level, &mut self.finance.confidence),
            Domain::Relations => (&mut self.relations.level, &mut self.relations.confidence),
            Domain::Spiritual => (&mut self.spiritual.level, &mut self.spiritual.confidence),
            Domain::Career => (&mut self.career.level, &mut self.career.confidence),
        };
        *slot_level = level;
        *slot_confidence = confidence;
    }
}
