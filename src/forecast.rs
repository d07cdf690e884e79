//! Calendar-day bucketing of short-interval forecast samples

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const UNKNOWN_DESCRIPTION: &str = "unknown";

/// One forecast step as reported upstream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSample {
    /// Unix seconds, UTC
    pub timestamp: i64,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    /// Point temperature, used for both bounds when no range is given
    pub temp: Option<f64>,
    pub description: Option<String>,
    /// 0.0..=1.0
    pub precip_probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub description: String,
    pub precip_probability: f64,
}

#[derive(Debug)]
struct DayAggregate {
    min: f64,
    max: f64,
    description_counts: HashMap<String, u32>,
    leader: Option<(String, u32)>,
    max_precip: f64,
}

impl DayAggregate {
    fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            description_counts: HashMap::new(),
            leader: None,
            max_precip: 0.0,
        }
    }

    fn add(&mut self, min: f64, max: f64, description: &str, precip: f64) {
        self.min = self.min.min(min);
        self.max = self.max.max(max);
        self.max_precip = self.max_precip.max(precip);

        let count = self
            .description_counts
            .entry(description.to_string())
            .or_insert(0);
        *count += 1;

        // Ties keep whichever description reached the count first
        let leads = match &self.leader {
            Some((_, top)) => *count > *top,
            None => true,
        };
        if leads {
            self.leader = Some((description.to_string(), *count));
        }
    }
}

/// Local calendar day of a UTC timestamp under a fixed offset
pub fn day_key(timestamp: i64, utc_offset_seconds: i64) -> Option<NaiveDate> {
    let local = timestamp.checked_add(utc_offset_seconds)?;
    DateTime::from_timestamp(local, 0).map(|dt| dt.date_naive())
}

pub fn summarize(
    samples: &[ForecastSample],
    utc_offset_seconds: i64,
    days: usize,
) -> Vec<DaySummary> {
    summarize_at(samples, utc_offset_seconds, days, Utc::now())
}

/// Summarize relative to `now`. When any day after today is present, today is
/// dropped and only later days are kept.
pub fn summarize_at(
    samples: &[ForecastSample],
    utc_offset_seconds: i64,
    days: usize,
    now: DateTime<Utc>,
) -> Vec<DaySummary> {
    let mut by_day: BTreeMap<NaiveDate, DayAggregate> = BTreeMap::new();

    for sample in samples {
        let Some(key) = day_key(sample.timestamp, utc_offset_seconds) else {
            continue;
        };
        let (Some(min), Some(max)) = (
            sample.temp_min.or(sample.temp),
            sample.temp_max.or(sample.temp),
        ) else {
            continue;
        };

        let description = sample
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN_DESCRIPTION);
        let precip = sample.precip_probability.unwrap_or(0.0);

        by_day
            .entry(key)
            .or_insert_with(|| DayAggregate::new(min, max))
            .add(min, max, description, precip);
    }

    let today = (now + Duration::seconds(utc_offset_seconds)).date_naive();
    let has_future = by_day.keys().any(|k| *k > today);

    by_day
        .into_iter()
        .filter(|(k, _)| !has_future || *k > today)
        .take(days)
        .map(|(date, agg)| DaySummary {
            date,
            label: date.format("%a, %b %-d").to_string(),
            min: agg.min,
            max: agg.max,
            description: agg
                .leader
                .map(|(d, _)| d)
                .unwrap_or_else(|| "mixed conditions".to_string()),
            precip_probability: agg.max_precip,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(ts: i64, min: f64, max: f64, desc: &str, pop: f64) -> ForecastSample {
        ForecastSample {
            timestamp: ts,
            temp_min: Some(min),
            temp_max: Some(max),
            temp: None,
            description: Some(desc.to_string()),
            precip_probability: Some(pop),
        }
    }

    fn ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().timestamp()
    }

    #[test]
    fn test_groups_two_days_and_drops_today() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let samples = vec![
            sample(ts(2026, 3, 10, 15), 50.0, 55.0, "clear sky", 0.0),
            sample(ts(2026, 3, 10, 18), 48.0, 52.0, "clear sky", 0.1),
            sample(ts(2026, 3, 11, 0), 40.0, 45.0, "light rain", 0.6),
            sample(ts(2026, 3, 11, 3), 38.0, 44.0, "light rain", 0.8),
            sample(ts(2026, 3, 11, 6), 41.0, 49.0, "overcast clouds", 0.2),
        ];

        let days = summarize_at(&samples, 0, 3, now);
        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert_eq!(day.label, "Wed, Mar 11");
        assert_eq!(day.min, 38.0);
        assert_eq!(day.max, 49.0);
        assert_eq!(day.description, "light rain");
        assert_eq!(day.precip_probability, 0.8);
    }

    #[test]
    fn test_keeps_today_when_nothing_later() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let samples = vec![sample(ts(2026, 3, 10, 15), 50.0, 55.0, "clear sky", 0.0)];

        let days = summarize_at(&samples, 0, 3, now);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].label, "Tue, Mar 10");
    }

    #[test]
    fn test_offset_moves_samples_across_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        // 03:00 UTC on the 11th is still the 10th at UTC-8
        let samples = vec![
            sample(ts(2026, 3, 10, 20), 60.0, 62.0, "clear sky", 0.0),
            sample(ts(2026, 3, 11, 3), 55.0, 57.0, "clear sky", 0.0),
            sample(ts(2026, 3, 11, 9), 50.0, 51.0, "mist", 0.0),
        ];

        let days = summarize_at(&samples, -8 * 3600, 3, now);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(days[0].min, 55.0);
        assert_eq!(days[0].max, 62.0);
        assert_eq!(days[1].description, "mist");
    }

    #[test]
    fn test_takes_first_n_future_days_in_order() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let samples: Vec<_> = (0..6)
            .rev()
            .map(|d| sample(ts(2026, 3, 10 + d, 12), 40.0, 50.0, "clouds", 0.0))
            .collect();

        let days = summarize_at(&samples, 0, 3, now);
        let dates: Vec<_> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2026-03-11", "2026-03-12", "2026-03-13"]);
    }

    #[test]
    fn test_mode_tie_goes_to_first_to_reach_count() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let samples = vec![
            sample(ts(2026, 3, 11, 0), 40.0, 50.0, "clouds", 0.0),
            sample(ts(2026, 3, 11, 3), 40.0, 50.0, "rain", 0.0),
            sample(ts(2026, 3, 11, 6), 40.0, 50.0, "rain", 0.0),
            sample(ts(2026, 3, 11, 9), 40.0, 50.0, "clouds", 0.0),
        ];

        let days = summarize_at(&samples, 0, 3, now);
        assert_eq!(days[0].description, "rain");
    }

    #[test]
    fn test_point_temperature_and_missing_fields() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let samples = vec![
            ForecastSample {
                timestamp: ts(2026, 3, 11, 0),
                temp: Some(61.5),
                ..ForecastSample::default()
            },
            // No temperature at all: skipped
            ForecastSample {
                timestamp: ts(2026, 3, 11, 3),
                precip_probability: Some(0.9),
                ..ForecastSample::default()
            },
        ];

        let days = summarize_at(&samples, 0, 3, now);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].min, 61.5);
        assert_eq!(days[0].max, 61.5);
        assert_eq!(days[0].description, "unknown");
        assert_eq!(days[0].precip_probability, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize(&[], 0, 3).is_empty());
    }
}
