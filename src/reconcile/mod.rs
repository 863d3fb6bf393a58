//! Response reconciliation
//!
//! Turns an untrusted collaborator payload into either a canonical train
//! or flight record, or a tagged fallback. Nothing in this module returns
//! an error: every failure becomes a [`FallbackResponse`].
//!
//! [`FallbackResponse`]: crate::models::FallbackResponse

pub mod fallback;
pub mod payload;
pub mod schema;

pub use fallback::{FallbackBuilder, PartialFields};
pub use payload::{ClassifiedPayload, RawAgentPayload, strip_code_fence};
pub use schema::SchemaViolation;

use crate::error::ErrorKind;
use crate::models::{CanonicalResponse, Reconciled, TravelQuery};
use tracing::{debug, instrument, warn};

/// Validates collaborator payloads against the canonical schemas
pub struct SchemaReconciler;

impl SchemaReconciler {
    /// Reconcile `payload`, using `fallback_query` for anything it lacks
    #[instrument(
        level = "debug",
        skip_all,
        fields(source = %fallback_query.source, destination = %fallback_query.destination)
    )]
    pub fn reconcile(
        payload: impl Into<RawAgentPayload>,
        fallback_query: &TravelQuery,
    ) -> Reconciled {
        match ClassifiedPayload::classify(payload.into()) {
            ClassifiedPayload::Train(fields) => {
                match schema::validate_train(&fields, fallback_query) {
                    Ok(train) => {
                        debug!("Train response with {} trains", train.trains.len());
                        CanonicalResponse::Train(train).into()
                    }
                    Err(violation) => {
                        warn!("Train response failed validation: {}", violation);
                        degrade(
                            ErrorKind::InvalidTrainSchema,
                            PartialFields::from_payload(&fields, fallback_query),
                        )
                    }
                }
            }
            ClassifiedPayload::Flight(fields) => {
                match schema::validate_flight(&fields, fallback_query) {
                    Ok(flight) => {
                        debug!("Flight response with {} flights", flight.flights.len());
                        CanonicalResponse::Flight(flight).into()
                    }
                    Err(violation) => {
                        warn!("Flight response failed validation: {}", violation);
                        degrade(
                            ErrorKind::InvalidFlightSchema,
                            PartialFields::from_payload(&fields, fallback_query),
                        )
                    }
                }
            }
            ClassifiedPayload::Unclassified { kind, fields } => {
                let partial = match fields {
                    Some(fields) => PartialFields::from_payload(&fields, fallback_query),
                    None => PartialFields::from_query(fallback_query),
                };
                degrade(kind, partial)
            }
        }
    }
}

/// Shorthand for [`SchemaReconciler::reconcile`]
pub fn reconcile(payload: impl Into<RawAgentPayload>, fallback_query: &TravelQuery) -> Reconciled {
    SchemaReconciler::reconcile(payload, fallback_query)
}

fn degrade(kind: ErrorKind, partial: PartialFields) -> Reconciled {
    warn!("Falling back: {} ({})", kind, kind.description());
    FallbackBuilder::build(kind, partial).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CabinClass, FareClass};
    use chrono::NaiveDate;
    use serde_json::json;

    fn query() -> TravelQuery {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        TravelQuery::new("Delhi", "Leh", date, FareClass::ThirdAc)
    }

    fn valid_train_text() -> String {
        json!({
            "source": "Delhi",
            "destination": "Mumbai",
            "date": "2025-06-01",
            "class": "3A",
            "trains": [{
                "train_number": "12951",
                "train_name": "Mumbai Rajdhani",
                "departure": "16:25",
                "arrival": "08:15",
                "duration": "15h 50m",
                "availability": "Available 42",
                "fare": 1985
            }]
        })
        .to_string()
    }

    #[test]
    fn test_empty_train_list_is_canonical() {
        let payload = json!({
            "source": "Delhi",
            "destination": "Leh",
            "date": "2025-06-01",
            "class": "3A",
            "trains": []
        });
        let result = reconcile(payload, &query());

        let train = result.as_train().expect("train variant");
        assert!(train.trains.is_empty());
        assert!(result.error().is_none());
        assert!(serde_json::to_value(&result).unwrap().get("error").is_none());
    }

    #[test]
    fn test_fenced_payload_matches_unwrapped() {
        let plain = reconcile(valid_train_text(), &query());
        let fenced = reconcile(format!("```json\n{}\n```", valid_train_text()), &query());
        let bare_fence = reconcile(format!("```\n{}\n```", valid_train_text()), &query());

        assert_eq!(plain, fenced);
        assert_eq!(plain, bare_fence);
        assert_eq!(plain.as_train().unwrap().trains[0].train_number, "12951");
    }

    #[test]
    fn test_prose_falls_back_with_query_fields() {
        let result = reconcile("Sorry, no data available.", &query());
        let fallback = result.as_fallback().expect("fallback");

        assert_eq!(fallback.error, ErrorKind::UnparsableOutput);
        assert!(fallback.trains.is_empty());
        assert_eq!(fallback.source, "Delhi");
        assert_eq!(fallback.destination, "Leh");
        assert_eq!(fallback.date, "2025-06-01");
        assert_eq!(fallback.class, "3A");
    }

    #[test]
    fn test_non_object_output() {
        let result = reconcile(json!(["Delhi", "Leh"]), &query());
        assert_eq!(result.error(), Some(ErrorKind::NonObjectOutput));
    }

    #[test]
    fn test_invalid_train_schema_keeps_partial_fields() {
        let payload = json!({
            "source": "New Delhi",
            "class": "SL",
            "trains": [{"train_number": "12951"}]
        });
        let result = reconcile(payload, &query());
        let fallback = result.as_fallback().expect("fallback");

        assert_eq!(fallback.error, ErrorKind::InvalidTrainSchema);
        assert_eq!(fallback.source, "New Delhi");
        assert_eq!(fallback.destination, "Leh");
        assert_eq!(fallback.class, "SL");
        assert!(fallback.trains.is_empty());
    }

    #[test]
    fn test_flight_payload() {
        let payload = json!({
            "source": "Delhi",
            "destination": "Goa",
            "date": "2025-06-01",
            "cabin_class": "Business",
            "flights": [{
                "flight_number": "AI 887",
                "departure": "07:00",
                "arrival": "09:35",
                "duration": "2h 35m",
                "availability": "4 seats",
                "fare": 18250
            }]
        });
        let result = reconcile(payload, &query());
        let flight = result.as_flight().expect("flight variant");
        assert_eq!(flight.cabin_class, CabinClass::Business);
        assert_eq!(flight.flights[0].fare, 18250);
    }

    #[test]
    fn test_invalid_flight_schema() {
        let payload = json!({"flights": [{"flight_number": "AI 887"}]});
        let result = reconcile(payload, &query());
        assert_eq!(result.error(), Some(ErrorKind::InvalidFlightSchema));
    }

    #[test]
    fn test_both_keys_is_train_shaped() {
        let payload = json!({"trains": [], "flights": [{"bogus": true}]});
        let result = reconcile(payload, &query());
        assert!(result.as_train().is_some());
    }

    #[test]
    fn test_unknown_shape() {
        let payload = json!({"source": "Delhi", "buses": []});
        let result = reconcile(payload, &query());
        let fallback = result.as_fallback().expect("fallback");
        assert_eq!(fallback.error, ErrorKind::UnknownResponseShape);
        assert_eq!(fallback.source, "Delhi");
    }
}
