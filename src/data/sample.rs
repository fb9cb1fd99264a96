//! Seeded synthetic source for running the dashboard without a server.
//!
//! Daily quantities are drawn around a per-category baseline with Gaussian
//! noise, clamped at zero and rounded to 0.1 kg. The same seed always produces
//! the same payloads, so the demo is reproducible.

use chrono::{Days, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde_json::json;

use crate::data::source::{Endpoint, SeriesSource};
use crate::domain::{Category, DailyObservation, PerCategory, Series, SeriesKind};
use crate::error::FetchError;
use crate::series::stats::describe;

/// Forecast horizon served by the demo predictions endpoint.
pub const DEMO_HORIZON_DAYS: usize = 7;

#[derive(Debug, Clone)]
pub struct DemoSource {
    seed: u64,
    last_observed: NaiveDate,
    history_days: usize,
}

impl DemoSource {
    pub fn new(seed: u64, last_observed: NaiveDate, history_days: usize) -> Self {
        Self {
            seed,
            last_observed,
            history_days,
        }
    }

    /// The synthetic history, ending at `last_observed`.
    pub fn historical(&self) -> Series {
        let back = self.history_days.saturating_sub(1) as u64;
        let start = self.last_observed.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        let days = (self.last_observed - start).num_days() as usize + 1;
        self.generate(SeriesKind::Historical, start, days.min(self.history_days), 0)
    }

    /// The synthetic forecast, starting the day after `last_observed`.
    pub fn forecast(&self) -> Series {
        match self.last_observed.checked_add_days(Days::new(1)) {
            Some(start) => self.generate(SeriesKind::Forecast, start, DEMO_HORIZON_DAYS, 1),
            None => Series::empty(SeriesKind::Forecast),
        }
    }

    fn generate(&self, kind: SeriesKind, start: NaiveDate, days: usize, stream: u64) -> Series {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_mul(31).wrapping_add(stream));
        let baselines = PerCategory::from_fn(baseline);
        let observations = (0..days)
            .map_while(|i| start.checked_add_days(Days::new(i as u64)))
            .map(|date| {
                let values = baselines.map(|_, &(mean, sd)| {
                    let noise = Normal::new(0.0, sd).map(|n| n.sample(&mut rng)).unwrap_or(0.0);
                    Some(((mean + noise).max(0.0) * 10.0).round() / 10.0)
                });
                DailyObservation::new(date, values)
            })
            .collect();

        // Consecutive days are strictly increasing by construction.
        Series::new(kind, observations).unwrap_or_else(|_| Series::empty(kind))
    }
}

/// (mean, standard deviation) in kg/day.
fn baseline(category: Category) -> (f64, f64) {
    match category {
        Category::Potong => (22.7, 4.0),
        Category::Kampung => (9.8, 2.0),
        Category::Tua => (5.5, 1.5),
    }
}

fn series_payload(series: &Series) -> serde_json::Value {
    let mut data = serde_json::Map::new();
    data.insert(
        "dates".to_string(),
        json!(series.dates().map(|d| d.to_string()).collect::<Vec<_>>()),
    );
    for category in Category::ALL {
        data.insert(category.key().to_string(), json!(series.column(category)));
    }
    json!({ "success": true, "data": data })
}

fn stats_payload(series: &Series) -> serde_json::Value {
    let description = describe(series);
    let mut data = serde_json::Map::new();
    for (category, summary) in description.categories.iter() {
        if let Some(summary) = summary {
            data.insert(category.key().to_string(), json!(summary));
        }
    }
    json!({ "success": true, "data": data })
}

impl SeriesSource for DemoSource {
    async fn get(&self, endpoint: Endpoint) -> Result<Vec<u8>, FetchError> {
        let payload = match endpoint {
            Endpoint::Historical => series_payload(&self.historical()),
            Endpoint::Predictions => series_payload(&self.forecast()),
            Endpoint::Stats => stats_payload(&self.historical()),
        };
        serde_json::to_vec(&payload).map_err(|e| FetchError::Protocol(format!("demo payload: {e}")))
    }

    fn describe(&self) -> String {
        format!("demo (seed {})", self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::payload::decode_series;

    fn source() -> DemoSource {
        DemoSource::new(42, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 30)
    }

    #[test]
    fn demo_is_deterministic_and_adjacent() {
        let a = source();
        let b = source();
        assert_eq!(a.historical(), b.historical());

        let h = a.historical();
        let f = a.forecast();
        assert_eq!(h.len(), 30);
        assert_eq!(f.len(), DEMO_HORIZON_DAYS);
        assert_eq!(h.last_date(), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(f.first_date(), NaiveDate::from_ymd_opt(2025, 1, 2));
    }

    #[test]
    fn calendar_edges_truncate_instead_of_panicking() {
        let near_start = NaiveDate::MIN.checked_add_days(Days::new(2)).unwrap();
        let h = DemoSource::new(1, near_start, 10).historical();
        assert_eq!(h.len(), 3);
        assert_eq!(h.last_date(), Some(near_start));

        assert!(DemoSource::new(1, NaiveDate::MAX, 3).forecast().is_empty());
    }

    #[tokio::test]
    async fn demo_payloads_pass_validation() {
        let src = source();
        let body = src.get(Endpoint::Predictions).await.unwrap();
        let decoded = decode_series(SeriesKind::Forecast, &body).unwrap();
        assert_eq!(decoded, src.forecast());
    }
}
