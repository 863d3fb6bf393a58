//! Degraded responses for every failure path

use crate::error::ErrorKind;
use crate::models::{FallbackResponse, FareClass, TravelQuery};
use serde_json::{Map, Value};

/// Best-effort query fields carried into a fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialFields {
    pub source: String,
    pub destination: String,
    pub date: String,
    pub class: String,
}

impl Default for PartialFields {
    fn default() -> Self {
        Self {
            source: String::new(),
            destination: String::new(),
            date: String::new(),
            class: FareClass::default().code().to_string(),
        }
    }
}

impl PartialFields {
    /// Every field taken from the parsed query
    #[must_use]
    pub fn from_query(query: &TravelQuery) -> Self {
        Self {
            source: query.source.clone(),
            destination: query.destination.clone(),
            date: query.date_string(),
            class: query.fare_class.code().to_string(),
        }
    }

    /// String fields present in the payload win, the query fills the gaps
    #[must_use]
    pub fn from_payload(fields: &Map<String, Value>, query: &TravelQuery) -> Self {
        let defaults = Self::from_query(query);
        let pick = |key: &str, default: String| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(default)
        };

        Self {
            source: pick("source", defaults.source),
            destination: pick("destination", defaults.destination),
            date: pick("date", defaults.date),
            class: pick("class", defaults.class),
        }
    }
}

/// Builds [`FallbackResponse`] values; the only place they are created
pub struct FallbackBuilder;

impl FallbackBuilder {
    #[must_use]
    pub fn build(kind: ErrorKind, partial: PartialFields) -> FallbackResponse {
        FallbackResponse {
            source: partial.source,
            destination: partial.destination,
            date: partial.date,
            class: partial.class,
            trains: Vec::new(),
            error: kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn query() -> TravelQuery {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        TravelQuery::new("Delhi", "Leh", date, FareClass::Sleeper)
    }

    #[test]
    fn test_default_fields() {
        let response =
            FallbackBuilder::build(ErrorKind::CollaboratorFailure, PartialFields::default());
        assert_eq!(response.source, "");
        assert_eq!(response.destination, "");
        assert_eq!(response.date, "");
        assert_eq!(response.class, "3A");
        assert!(response.trains.is_empty());
        assert_eq!(response.error, ErrorKind::CollaboratorFailure);
    }

    #[test]
    fn test_from_query() {
        let partial = PartialFields::from_query(&query());
        let response = FallbackBuilder::build(ErrorKind::UnparsableOutput, partial);
        assert_eq!(response.source, "Delhi");
        assert_eq!(response.destination, "Leh");
        assert_eq!(response.date, "2025-06-01");
        assert_eq!(response.class, "SL");
    }

    #[test]
    fn test_payload_fields_take_precedence() {
        let payload = json!({"source": "New Delhi", "date": 20250601, "class": "2A"});
        let fields = PartialFields::from_payload(payload.as_object().unwrap(), &query());

        assert_eq!(fields.source, "New Delhi");
        assert_eq!(fields.destination, "Leh");
        // Non-string values are ignored in favour of the query
        assert_eq!(fields.date, "2025-06-01");
        assert_eq!(fields.class, "2A");
    }
}
