//! Reporting period for the workload views

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::WorkloadQuery;
use crate::storage::{KeyValueStore, PERIOD_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodPreset {
    Today,
    /// Today and the six days before it
    Week,
    /// Same day one month back through today
    Month,
}

impl PeriodPreset {
    pub const ALL: [PeriodPreset; 3] = [PeriodPreset::Today, PeriodPreset::Week, PeriodPreset::Month];

    pub fn label(&self) -> &'static str {
        match self {
            PeriodPreset::Today => "Сегодня",
            PeriodPreset::Week => "Неделя",
            PeriodPreset::Month => "Месяц",
        }
    }
}

/// Inclusive date range; either end may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Storage shape: ISO dates, empty string for an open end
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPeriod {
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
}

pub fn query_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `D.M.YYYY`, no zero padding
pub fn display_date(date: NaiveDate) -> String {
    date.format("%-d.%-m.%Y").to_string()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn preset(preset: PeriodPreset, today: NaiveDate) -> Self {
        let start = match preset {
            PeriodPreset::Today => Some(today),
            PeriodPreset::Week => today.checked_sub_days(Days::new(6)),
            PeriodPreset::Month => today.checked_sub_months(Months::new(1)),
        };
        Self { start, end: Some(today) }
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn query_bounds(&self) -> (Option<String>, Option<String>) {
        (self.start.map(query_date), self.end.map(query_date))
    }

    pub fn to_query(&self) -> WorkloadQuery {
        let (from, to) = self.query_bounds();
        WorkloadQuery::between(from, to)
    }

    pub fn display(&self) -> String {
        match (self.start, self.end) {
            (Some(s), Some(e)) => format!("{} – {}", display_date(s), display_date(e)),
            (Some(s), None) => format!("с {}", display_date(s)),
            (None, Some(e)) => format!("по {}", display_date(e)),
            (None, None) => "Период не выбран".to_string(),
        }
    }

    /// Last saved period; missing or corrupt entries give an open range
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        let Some(raw) = storage.get(PERIOD_KEY) else {
            return Self::default();
        };
        match serde_json::from_str::<StoredPeriod>(&raw) {
            Ok(stored) => Self {
                start: parse_date(&stored.start),
                end: parse_date(&stored.end),
            },
            Err(e) => {
                log::warn!("Discarding stored period: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &dyn KeyValueStore) {
        let stored = StoredPeriod {
            start: self.start.map(query_date).unwrap_or_default(),
            end: self.end.map(query_date).unwrap_or_default(),
        };
        match serde_json::to_string(&stored) {
            Ok(raw) => storage.set(PERIOD_KEY, &raw),
            Err(e) => log::warn!("Failed to store period: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_presets() {
        let today = date(2025, 3, 31);

        let range = DateRange::preset(PeriodPreset::Today, today);
        assert_eq!((range.start, range.end), (Some(today), Some(today)));

        let range = DateRange::preset(PeriodPreset::Week, today);
        assert_eq!(range.start, Some(date(2025, 3, 25)));

        // month arithmetic clamps to the last valid day
        let range = DateRange::preset(PeriodPreset::Month, today);
        assert_eq!(range.start, Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_formats() {
        let range = DateRange::new(Some(date(2025, 3, 1)), Some(date(2025, 12, 9)));
        assert_eq!(
            range.query_bounds(),
            (Some("2025-03-01".to_string()), Some("2025-12-09".to_string()))
        );
        assert_eq!(display_date(date(2025, 3, 1)), "1.3.2025");
        assert_eq!(range.to_query().queue, "Prisma");
    }

    #[test]
    fn test_persisted_round_trip_with_open_end() {
        let storage = MemoryStorage::new();
        let range = DateRange::new(Some(date(2025, 3, 1)), None);
        range.save(&storage);

        assert_eq!(storage.get(PERIOD_KEY).as_deref(), Some(r#"{"start":"2025-03-01","end":""}"#));
        assert_eq!(DateRange::load(&storage), range);
    }

    #[test]
    fn test_corrupt_storage_gives_open_range() {
        let storage = MemoryStorage::with(&[(PERIOD_KEY, "not json")]);
        assert_eq!(DateRange::load(&storage), DateRange::default());
        assert!(!DateRange::load(&storage).is_complete());
    }
}
