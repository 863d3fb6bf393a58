//! Canonical availability responses and the degraded fallback shape

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};

use super::{CabinClass, FareClass};

/// One train in an availability listing
///
/// Deserialization is lenient the way agent output needs: numbers are
/// accepted for text fields and an unusable fare becomes 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub train_number: String,
    #[serde(deserialize_with = "lenient::text")]
    pub train_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub departure: String,
    #[serde(deserialize_with = "lenient::text")]
    pub arrival: String,
    #[serde(deserialize_with = "lenient::text")]
    pub duration: String,
    #[serde(deserialize_with = "lenient::text")]
    pub availability: String,
    /// Fare in whole currency units, 0 when the source did not report one
    #[serde(default, deserialize_with = "lenient::fare_or_zero")]
    pub fare: i64,
}

/// One flight in an availability listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub flight_number: String,
    #[serde(deserialize_with = "lenient::text")]
    pub departure: String,
    #[serde(deserialize_with = "lenient::text")]
    pub arrival: String,
    #[serde(deserialize_with = "lenient::text")]
    pub duration: String,
    #[serde(deserialize_with = "lenient::text")]
    pub availability: String,
    #[serde(deserialize_with = "lenient::fare")]
    pub fare: i64,
}

/// Train variant of the canonical response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainAvailability {
    pub source: String,
    pub destination: String,
    pub date: String,
    #[serde(rename = "class")]
    pub fare_class: FareClass,
    pub trains: Vec<TrainRecord>,
}

/// Flight variant of the canonical response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightAvailability {
    pub source: String,
    pub destination: String,
    pub date: String,
    pub cabin_class: CabinClass,
    pub flights: Vec<FlightRecord>,
}

/// Schema-validated availability record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalResponse {
    Train(TrainAvailability),
    Flight(FlightAvailability),
}

/// Degraded but structurally complete response
///
/// Only ever built by [`crate::reconcile::FallbackBuilder`]. `trains` is
/// always empty and `error` names why reconciliation gave up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackResponse {
    pub source: String,
    pub destination: String,
    pub date: String,
    pub class: String,
    pub trains: Vec<TrainRecord>,
    pub error: ErrorKind,
}

/// What the caller always receives: a canonical record or a fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reconciled {
    // Listed first so a payload carrying `error` never decodes as a train record.
    Fallback(FallbackResponse),
    Canonical(CanonicalResponse),
}

impl Reconciled {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Reconciled::Fallback(_))
    }

    /// Error kind, present only on fallbacks
    #[must_use]
    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Reconciled::Fallback(fallback) => Some(fallback.error),
            Reconciled::Canonical(_) => None,
        }
    }

    #[must_use]
    pub fn as_train(&self) -> Option<&TrainAvailability> {
        match self {
            Reconciled::Canonical(CanonicalResponse::Train(train)) => Some(train),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_flight(&self) -> Option<&FlightAvailability> {
        match self {
            Reconciled::Canonical(CanonicalResponse::Flight(flight)) => Some(flight),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_fallback(&self) -> Option<&FallbackResponse> {
        match self {
            Reconciled::Fallback(fallback) => Some(fallback),
            Reconciled::Canonical(_) => None,
        }
    }
}

impl From<CanonicalResponse> for Reconciled {
    fn from(response: CanonicalResponse) -> Self {
        Reconciled::Canonical(response)
    }
}

impl From<FallbackResponse> for Reconciled {
    fn from(response: FallbackResponse) -> Self {
        Reconciled::Fallback(response)
    }
}

/// Field deserializers tolerant of how agents format values
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings pass through and numbers are rendered; train numbers often arrive as numbers
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(text),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(D::Error::custom(format!("expected a string, found {other}"))),
        }
    }

    pub fn fare<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        integer(&value)
            .ok_or_else(|| D::Error::custom(format!("expected an integer fare, found {value}")))
    }

    pub fn fare_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(integer(&Value::deserialize(deserializer)?).unwrap_or(0))
    }

    /// Integers, integral floats and digit strings
    fn integer(value: &Value) -> Option<i64> {
        match value {
            Value::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64)
            }),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}
