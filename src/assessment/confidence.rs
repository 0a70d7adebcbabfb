//! How much of each trailing window is populated, and the confidence that buys.

use serde::Serialize;

use crate::assessment::{
    config::AssessmentConfig,
    types::Domain,
    window::{known_count, DayWindow},
};
use crate::db::models::{CareerRecord, DailyRecord, FinanceRecord};

const FULL: u8 = 100;
const HIGH: u8 = 80;
const PARTIAL: u8 = 70;
const THIN: u8 = 50;
const FLOOR: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub daily_today: bool,
    pub daily_known3: usize,
    pub daily_known7: usize,
    pub finance_known7: usize,
    pub finance_cash_today: bool,
    pub career_known7: usize,
}

impl Coverage {
    pub fn measure(
        daily: &DayWindow<DailyRecord>,
        finance: &DayWindow<FinanceRecord>,
        career: &DayWindow<CareerRecord>,
        config: &AssessmentConfig,
    ) -> Self {
        let days = config.window_days;
        Self {
            daily_today: daily.today().is_some(),
            daily_known3: known_count(daily.recent(3)),
            daily_known7: known_count(daily.recent(days)),
            finance_known7: known_count(finance.recent(days)),
            finance_cash_today: finance
                .today()
                .is_some_and(|record| record.cash_on_hand.is_some()),
            career_known7: known_count(career.recent(days)),
        }
    }

    /// Known days backing a domain's trend claims.
    pub fn known_days(&self, domain: Domain) -> usize {
        match domain {
            Domain::Finance => self.finance_known7,
            Domain::Career => self.career_known7,
            Domain::Stability | Domain::Relations | Domain::Spiritual => self.daily_known7,
        }
    }

    pub fn stability(&self) -> u8 {
        match (self.daily_today, self.daily_known3) {
            (true, known) if known >= 2 => FULL,
            (true, _) => PARTIAL,
            (false, known) if known >= 1 => PARTIAL,
            _ => FLOOR,
        }
    }

    pub fn finance(&self, config: &AssessmentConfig) -> u8 {
        if self.finance_known7 >= config.min_known_days && self.finance_cash_today {
            FULL
        } else if self.finance_known7 >= 1 {
            PARTIAL
        } else {
            FLOOR
        }
    }

    pub fn relations(&self, config: &AssessmentConfig) -> u8 {
        weekly_confidence(self.daily_known7, config)
    }

    pub fn spiritual(&self, config: &AssessmentConfig) -> u8 {
        weekly_confidence(self.daily_known7, config)
    }

    pub fn career(&self, config: &AssessmentConfig) -> u8 {
        weekly_confidence(self.career_known7, config)
    }
}

fn weekly_confidence(known: usize, config: &AssessmentConfig) -> u8 {
    if known >= config.min_known_days {
        HIGH
    } else if known >= 2 {
        THIN
    } else {
        FLOOR
    }
}
