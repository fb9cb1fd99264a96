//! Endpoint payload decoding.
//!
//! Every endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true, "data": { "dates": ["2025-01-02", ...], "ayam_potong": [..], ... } }
//! { "success": false, "message": "Gagal memuat data" }
//! ```
//!
//! A series payload is accepted only when `dates` and every category array are
//! present and of equal length, every date parses, and every value is either
//! `null` (no value) or a finite non-negative number.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value as Json;

use crate::domain::{
    Category, CategorySummary, DailyObservation, PerCategory, Series, SeriesKind, Value,
};
use crate::error::FetchError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Json>,
    #[serde(default)]
    message: Option<String>,
}

/// `true` when `body` is a JSON envelope (successful or not).
pub fn is_envelope(body: &[u8]) -> bool {
    serde_json::from_slice::<Envelope>(body).is_ok()
}

/// Decode a time-series payload.
pub fn decode_series(kind: SeriesKind, body: &[u8]) -> Result<Series, FetchError> {
    let data = open_envelope(body)?;
    series_from_data(kind, &data)
}

/// Decode a `/api/stats` payload.
pub fn decode_stats(body: &[u8]) -> Result<PerCategory<Option<CategorySummary>>, FetchError> {
    let data = open_envelope(body)?;
    let mut by_key: HashMap<String, CategorySummary> = serde_json::from_value(data)
        .map_err(|e| FetchError::Protocol(format!("invalid stats payload: {e}")))?;
    Ok(PerCategory::from_fn(|c| by_key.remove(c.key())))
}

fn open_envelope(body: &[u8]) -> Result<Json, FetchError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| FetchError::Protocol(format!("response is not valid JSON: {e}")))?;

    if !envelope.success {
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "request failed without a message".to_string());
        return Err(FetchError::Application(message));
    }

    envelope
        .data
        .ok_or_else(|| FetchError::Protocol("response has no `data` field".to_string()))
}

fn series_from_data(kind: SeriesKind, data: &Json) -> Result<Series, FetchError> {
    let object = data
        .as_object()
        .ok_or_else(|| FetchError::Protocol("`data` is not an object".to_string()))?;

    let raw_dates = object
        .get("dates")
        .and_then(Json::as_array)
        .ok_or_else(|| FetchError::Protocol("`data.dates` is missing or not an array".to_string()))?;

    let dates = raw_dates
        .iter()
        .map(parse_date)
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns: PerCategory<Vec<Value>> = PerCategory::default();
    for category in Category::ALL {
        let key = category.key();
        let raw = object
            .get(key)
            .and_then(Json::as_array)
            .ok_or_else(|| FetchError::Protocol(format!("`data.{key}` is missing or not an array")))?;

        if raw.len() != dates.len() {
            return Err(FetchError::Protocol(format!(
                "`data.{key}` has {} values for {} dates",
                raw.len(),
                dates.len()
            )));
        }

        columns[category] = raw
            .iter()
            .enumerate()
            .map(|(i, v)| parse_value(key, i, v))
            .collect::<Result<Vec<_>, _>>()?;
    }

    let observations = dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| DailyObservation::new(date, columns.map(|_, col| col[i])))
        .collect();

    Series::new(kind, observations).map_err(|e| FetchError::Protocol(e.to_string()))
}

fn parse_date(raw: &Json) -> Result<NaiveDate, FetchError> {
    let text = raw
        .as_str()
        .ok_or_else(|| FetchError::Protocol(format!("date {raw} is not a string")))?;

    // Full timestamps ("2025-01-02T00:00:00") count as their calendar day.
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .or_else(|e| match NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT) {
            Ok(stamp) => Ok(stamp.date()),
            Err(_) => Err(e),
        })
        .map_err(|e| FetchError::Protocol(format!("invalid date '{text}': {e}")))
}

fn parse_value(key: &str, index: usize, raw: &Json) -> Result<Value, FetchError> {
    if raw.is_null() {
        return Ok(None);
    }
    match raw.as_f64() {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(FetchError::Protocol(format!(
            "`data.{key}[{index}]` is not a non-negative number: {raw}"
        ))),
    }
}
