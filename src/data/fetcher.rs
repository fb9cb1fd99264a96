//! DataFetcher: requests endpoints and turns bodies into validated series.

use tracing::{debug, warn};

use crate::data::payload::{decode_series, decode_stats};
use crate::data::source::{Endpoint, SeriesSource};
use crate::domain::{CategorySummary, PerCategory, Series};
use crate::error::FetchError;

/// Both series a render cycle needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSeries {
    pub historical: Series,
    pub forecast: Series,
}

#[derive(Debug, Clone)]
pub struct DataFetcher<S> {
    source: S,
}

impl<S: SeriesSource> DataFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and validate one series endpoint. No retries.
    pub async fn fetch(&self, endpoint: Endpoint) -> Result<Series, FetchError> {
        let kind = endpoint.series_kind().ok_or_else(|| {
            FetchError::Protocol(format!("{} does not serve a time series", endpoint.path()))
        })?;

        let result = match self.source.get(endpoint).await {
            Ok(body) => decode_series(kind, &body),
            Err(err) => Err(err),
        };

        match &result {
            Ok(series) => debug!(endpoint = endpoint.path(), days = series.len(), "fetched series"),
            Err(err) => warn!(endpoint = endpoint.path(), error = %err, "fetch failed"),
        }
        result
    }

    /// Fetch historical and forecast series concurrently.
    ///
    /// The first failure (historical checked first) is returned; the other
    /// request still runs to completion.
    pub async fn fetch_both(&self) -> Result<FetchedSeries, FetchError> {
        let (historical, forecast) =
            tokio::join!(self.fetch(Endpoint::Historical), self.fetch(Endpoint::Predictions));
        Ok(FetchedSeries {
            historical: historical?,
            forecast: forecast?,
        })
    }

    /// Server-side aggregate figures (`/api/stats`).
    pub async fn fetch_stats(&self) -> Result<PerCategory<Option<CategorySummary>>, FetchError> {
        let body = self.source.get(Endpoint::Stats).await?;
        decode_stats(&body)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::domain::{Category, SeriesKind};

    /// In-memory source that records request order.
    struct Canned {
        bodies: HashMap<Endpoint, Result<String, FetchError>>,
        requested: RefCell<Vec<Endpoint>>,
    }

    impl SeriesSource for Canned {
        async fn get(&self, endpoint: Endpoint) -> Result<Vec<u8>, FetchError> {
            self.requested.borrow_mut().push(endpoint);
            // Yield once so both requests are in flight before either completes.
            tokio::task::yield_now().await;
            self.bodies
                .get(&endpoint)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Transport("no route".to_string())))
                .map(String::into_bytes)
        }

        fn describe(&self) -> String {
            "canned".to_string()
        }
    }

    fn ok_body(dates: &[&str], potong: &[f64]) -> Result<String, FetchError> {
        let zeros = vec![0.0; potong.len()];
        Ok(serde_json::json!({
            "success": true,
            "data": {
                "dates": dates,
                "ayam_potong": potong,
                "ayam_kampung": zeros,
                "ayam_tua": zeros,
            }
        })
        .to_string())
    }

    fn canned(entries: Vec<(Endpoint, Result<String, FetchError>)>) -> Canned {
        Canned {
            bodies: entries.into_iter().collect(),
            requested: RefCell::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn fetch_both_issues_both_requests_and_returns_both_series() {
        let fetcher = DataFetcher::new(canned(vec![
            (Endpoint::Historical, ok_body(&["2025-01-01"], &[10.0])),
            (Endpoint::Predictions, ok_body(&["2025-01-02", "2025-01-03"], &[13.0, 14.0])),
        ]));

        let fetched = fetcher.fetch_both().await.unwrap();
        assert_eq!(fetched.historical.kind(), SeriesKind::Historical);
        assert_eq!(fetched.historical.len(), 1);
        assert_eq!(fetched.forecast.column(Category::Potong), vec![Some(13.0), Some(14.0)]);

        let requested = fetcher.source().requested.borrow();
        assert_eq!(requested.len(), 2);
        assert!(requested.contains(&Endpoint::Historical));
        assert!(requested.contains(&Endpoint::Predictions));
    }

    #[tokio::test]
    async fn application_error_surfaces_from_either_endpoint() {
        let fetcher = DataFetcher::new(canned(vec![
            (Endpoint::Historical, ok_body(&["2025-01-01"], &[10.0])),
            (
                Endpoint::Predictions,
                Ok(r#"{"success": false, "message": "model unavailable"}"#.to_string()),
            ),
        ]));

        let err = fetcher.fetch_both().await.unwrap_err();
        assert_eq!(err, FetchError::Application("model unavailable".to_string()));
    }

    #[tokio::test]
    async fn transport_errors_pass_through_unchanged() {
        let fetcher = DataFetcher::new(canned(vec![(
            Endpoint::Predictions,
            ok_body(&["2025-01-02"], &[13.0]),
        )]));
        let err = fetcher.fetch_both().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn stats_endpoint_is_not_a_series() {
        let fetcher = DataFetcher::new(canned(vec![]));
        assert!(matches!(
            fetcher.fetch(Endpoint::Stats).await,
            Err(FetchError::Protocol(_))
        ));
    }
}
