//! Structured travel query model extracted from free text

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format used for every date that crosses the collaborator boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rail fare class code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FareClass {
    #[serde(rename = "1A")]
    FirstAc,
    #[serde(rename = "2A")]
    SecondAc,
    #[default]
    #[serde(rename = "3A")]
    ThirdAc,
    #[serde(rename = "SL")]
    Sleeper,
    #[serde(rename = "CC")]
    ChairCar,
    #[serde(rename = "2S")]
    SecondSitting,
}

impl FareClass {
    /// All canonical codes, in display order
    pub const ALL: [FareClass; 6] = [
        FareClass::FirstAc,
        FareClass::SecondAc,
        FareClass::ThirdAc,
        FareClass::Sleeper,
        FareClass::ChairCar,
        FareClass::SecondSitting,
    ];

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            FareClass::FirstAc => "1A",
            FareClass::SecondAc => "2A",
            FareClass::ThirdAc => "3A",
            FareClass::Sleeper => "SL",
            FareClass::ChairCar => "CC",
            FareClass::SecondSitting => "2S",
        }
    }
}

impl fmt::Display for FareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FareClass {
    type Err = String;

    /// Accepts the canonical codes case-insensitively, plus `SLEEPER` for `SL`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if upper == "SLEEPER" {
            return Ok(FareClass::Sleeper);
        }
        FareClass::ALL
            .into_iter()
            .find(|class| class.code() == upper)
            .ok_or_else(|| format!("unknown fare class '{s}'"))
    }
}

/// Flight cabin class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CabinClass {
    #[default]
    Economy,
    Business,
    First,
}

impl CabinClass {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "Economy",
            CabinClass::Business => "Business",
            CabinClass::First => "First",
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CabinClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(CabinClass::Economy),
            "business" => Ok(CabinClass::Business),
            "first" => Ok(CabinClass::First),
            _ => Err(format!("unknown cabin class '{s}'")),
        }
    }
}

/// Which kind of availability the user is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Train,
    Flight,
}

/// Structured travel parameters handed to the search collaborator
///
/// `source` and `destination` may be empty when extraction was ambiguous.
/// `date` and `class` are always valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelQuery {
    pub source: String,
    pub destination: String,
    pub date: NaiveDate,
    #[serde(rename = "class")]
    pub fare_class: FareClass,
    pub mode: TransportMode,
    pub cabin_class: CabinClass,
}

impl TravelQuery {
    /// Create a train query with economy as the cabin class
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        date: NaiveDate,
        fare_class: FareClass,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            date,
            fare_class,
            mode: TransportMode::Train,
            cabin_class: CabinClass::Economy,
        }
    }

    /// Date rendered as `YYYY-MM-DD`
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
