//! Validation of classified payloads against the canonical schemas
//!
//! Top-level fields missing from the payload are taken from the parsed
//! query; fields that are present must have the right shape. Records are
//! decoded by their serde impls, which default the train fare to 0.

use crate::models::{CabinClass, FareClass, FlightAvailability, TrainAvailability, TravelQuery};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// First schema violation found in a payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct SchemaViolation {
    pub field: String,
    pub reason: String,
}

impl SchemaViolation {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

type Fields = Map<String, Value>;

pub fn validate_train(
    fields: &Fields,
    defaults: &TravelQuery,
) -> Result<TrainAvailability, SchemaViolation> {
    let fare_class = match fields.get("class") {
        None | Some(Value::Null) => defaults.fare_class,
        Some(Value::String(code)) => code
            .parse::<FareClass>()
            .map_err(|e| SchemaViolation::new("class", e))?,
        Some(_) => return Err(SchemaViolation::new("class", "expected a string")),
    };

    let trains = records(fields, "trains")?
        .iter()
        .enumerate()
        .map(|(i, entry)| record(entry, format!("trains[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TrainAvailability {
        source: top_level_string(fields, "source", &defaults.source)?,
        destination: top_level_string(fields, "destination", &defaults.destination)?,
        date: top_level_string(fields, "date", &defaults.date_string())?,
        fare_class,
        trains,
    })
}

pub fn validate_flight(
    fields: &Fields,
    defaults: &TravelQuery,
) -> Result<FlightAvailability, SchemaViolation> {
    let cabin_class = match fields.get("cabin_class") {
        None | Some(Value::Null) => defaults.cabin_class,
        Some(Value::String(name)) => name
            .parse::<CabinClass>()
            .map_err(|e| SchemaViolation::new("cabin_class", e))?,
        Some(_) => return Err(SchemaViolation::new("cabin_class", "expected a string")),
    };

    let flights = records(fields, "flights")?
        .iter()
        .enumerate()
        .map(|(i, entry)| record(entry, format!("flights[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FlightAvailability {
        source: top_level_string(fields, "source", &defaults.source)?,
        destination: top_level_string(fields, "destination", &defaults.destination)?,
        date: top_level_string(fields, "date", &defaults.date_string())?,
        cabin_class,
        flights,
    })
}

fn top_level_string(fields: &Fields, key: &str, default: &str) -> Result<String, SchemaViolation> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(SchemaViolation::new(key, "expected a string")),
    }
}

fn records<'a>(fields: &'a Fields, key: &str) -> Result<&'a Vec<Value>, SchemaViolation> {
    fields
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaViolation::new(key, "expected a list"))
}

/// Decode one list entry through the record's serde impl, reporting it by position
fn record<T: DeserializeOwned>(value: &Value, path: String) -> Result<T, SchemaViolation> {
    T::deserialize(value).map_err(|e| SchemaViolation::new(path, e.to_string()))
}
