use serde::Serialize;

/// Trailing run of daily records, most recent first (index 0 = today).
///
/// Absent days stay `None`; they are never replaced with zeroed records, since
/// the number of known days feeds every confidence calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayWindow<T> {
    days: Vec<Option<T>>,
}

impl<T> Default for DayWindow<T> {
    fn default() -> Self {
        Self { days: Vec::new() }
    }
}

impl<T> DayWindow<T> {
    pub fn new(days: Vec<Option<T>>) -> Self {
        Self { days }
    }

    pub fn today(&self) -> Option<&T> {
        self.day(0)
    }

    pub fn day(&self, index: usize) -> Option<&T> {
        self.days.get(index).and_then(Option::as_ref)
    }

    /// The first `len` days (or fewer when the window is shorter).
    pub fn recent(&self, len: usize) -> &[Option<T>] {
        &self.days[..len.min(self.days.len())]
    }

    pub fn days(&self) -> &[Option<T>] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn known_days(&self) -> usize {
        known_count(&self.days)
    }
}

pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

pub fn known_count<T>(days: &[Option<T>]) -> usize {
    days.iter().filter(|day| day.is_some()).count()
}

/// Values picked from present days only; non-finite values count as unknown.
pub fn known_values<T>(days: &[Option<T>], pick: impl Fn(&T) -> Option<f64>) -> Vec<f64> {
    days.iter()
        .flatten()
        .filter_map(|record| pick(record).and_then(finite))
        .collect()
}

pub fn count_true<T>(days: &[Option<T>], pick: impl Fn(&T) -> bool) -> usize {
    days.iter().flatten().filter(|record| pick(record)).count()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Consecutive days from today matching `pred`, stopping at the first absent
/// day or the first day that does not match.
pub fn leading_streak<T>(days: &[Option<T>], pred: impl Fn(&T) -> bool) -> usize {
    days.iter()
        .take_while(|day| day.as_ref().is_some_and(&pred))
        .count()
}

pub fn clamp_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Order-preserving de-duplication, truncated to `cap` entries.
pub fn dedup_capped<S: AsRef<str>>(items: impl IntoIterator<Item = S>, cap: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.as_ref();
        if item.is_empty() || out.iter().any(|existing| existing == item) {
            continue;
        }
        if out.len() == cap {
            break;
        }
        out.push(item.to_string());
    }
    out
}
