//! Daily rollups.
//!
//! A [`DailySummary`] is computed fresh on every request from the readings
//! a city has accumulated since UTC midnight. Nothing is cached.
//!
//! # Dominant condition
//!
//! The label with the highest count wins. When several labels share the
//! highest count, the one whose last occurrence comes latest in insertion
//! order wins, so `["Rain", "Clear"]` yields `"Clear"`.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::models::Reading;
use crate::store::ReadingStore;

/// Per-city statistics over same-day readings.
///
/// Serialized as `{ avgTemp, maxTemp, minTemp, dominantWeather }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    #[serde(rename = "dominantWeather")]
    pub dominant_condition: Option<String>,
}

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Most frequent label, ties resolved to the latest last occurrence.
pub fn dominant_condition<'a, I>(labels: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    // label -> (count, index of last occurrence)
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, label) in labels.into_iter().enumerate() {
        let entry = tally.entry(label).or_insert((0, idx));
        entry.0 += 1;
        entry.1 = idx;
    }

    tally
        .into_iter()
        .max_by_key(|(_, stats)| *stats)
        .map(|(label, _)| label.to_string())
}

/// Summarize readings given in insertion order.
pub fn summarize_readings(readings: &[Reading]) -> DailySummary {
    if readings.is_empty() {
        return DailySummary::default();
    }

    let temps = readings.iter().map(|r| r.temperature);
    let sum: f64 = temps.clone().sum();
    let max = temps.clone().fold(f64::NEG_INFINITY, f64::max);
    let min = temps.fold(f64::INFINITY, f64::min);

    DailySummary {
        avg_temp: Some(round2(sum / readings.len() as f64)),
        max_temp: Some(max),
        min_temp: Some(min),
        dominant_condition: dominant_condition(readings.iter().map(|r| r.condition.as_str())),
    }
}

pub struct SummaryAggregator {
    store: Arc<dyn ReadingStore>,
    clock: Arc<dyn Clock>,
}

impl SummaryAggregator {
    pub fn new(store: Arc<dyn ReadingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn summarize(&self, city: &str) -> Result<DailySummary> {
        let boundary = start_of_day(self.clock.now());
        let readings = self.store.since(city, boundary).await?;
        Ok(summarize_readings(&readings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::memory::InMemoryStore;
    use chrono::{Duration, TimeZone};

    fn reading(temp: f64, condition: &str) -> Reading {
        Reading {
            city: "Delhi".to_string(),
            temperature: temp,
            feels_like: temp,
            condition: condition.to_string(),
            observed_at: 0,
            recorded_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_summary_is_all_null() {
        let summary = summarize_readings(&[]);
        assert_eq!(summary, DailySummary::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "avgTemp": null,
                "maxTemp": null,
                "minTemp": null,
                "dominantWeather": null
            })
        );
    }

    #[test]
    fn test_avg_min_max() {
        let readings = vec![
            reading(10.0, "Clear"),
            reading(20.0, "Clear"),
            reading(30.0, "Clear"),
        ];
        let summary = summarize_readings(&readings);
        assert_eq!(summary.avg_temp, Some(20.0));
        assert_eq!(summary.max_temp, Some(30.0));
        assert_eq!(summary.min_temp, Some(10.0));
    }

    #[test]
    fn test_avg_rounded_to_two_places() {
        let readings = vec![reading(10.0, "Clear"), reading(10.0, "Clear"), reading(11.0, "Clear")];
        assert_eq!(summarize_readings(&readings).avg_temp, Some(10.33));
    }

    #[test]
    fn test_dominant_by_count() {
        assert_eq!(
            dominant_condition(["Rain", "Clear", "Rain"]),
            Some("Rain".to_string())
        );
    }

    #[test]
    fn test_dominant_tie_goes_to_latest() {
        assert_eq!(
            dominant_condition(["Rain", "Clear"]),
            Some("Clear".to_string())
        );
        assert_eq!(
            dominant_condition(["Clear", "Rain", "Clear", "Rain"]),
            Some("Rain".to_string())
        );
        assert_eq!(
            dominant_condition(["Rain", "Clear", "Clear", "Rain"]),
            Some("Rain".to_string())
        );
        assert_eq!(
            dominant_condition(["Haze", "Rain", "Rain", "Clear", "Haze"]),
            Some("Haze".to_string())
        );
        assert_eq!(dominant_condition(std::iter::empty()), None);
    }

    #[test]
    fn test_start_of_day_is_utc_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 59).unwrap();
        assert_eq!(
            start_of_day(now),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_summarize_ignores_previous_day() {
        let store = Arc::new(InMemoryStore::new());
        let today = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
        let mut yesterday = reading(99.0, "Storm");
        yesterday.recorded_at = today - Duration::minutes(1);
        store.append(&yesterday).await.unwrap();

        for (temp, cond) in [(10.0, "Rain"), (20.0, "Clear"), (30.0, "Rain")] {
            let mut r = reading(temp, cond);
            r.recorded_at = today + Duration::hours(1);
            store.append(&r).await.unwrap();
        }

        let clock = Arc::new(ManualClock::new(today + Duration::hours(2)));
        let aggregator = SummaryAggregator::new(store, clock);
        let summary = aggregator.summarize("Delhi").await.unwrap();
        assert_eq!(summary.avg_temp, Some(20.0));
        assert_eq!(summary.max_temp, Some(30.0));
        assert_eq!(summary.dominant_condition.as_deref(), Some("Rain"));

        let empty = aggregator.summarize("Chennai").await.unwrap();
        assert_eq!(empty, DailySummary::default());
    }
}
