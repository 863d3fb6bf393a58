//! Data models for the travel assistant
//!
//! This module contains the core domain models organized by concern:
//! - Query: structured travel parameters and class vocabularies
//! - Response: canonical train/flight records and the fallback shape

pub mod query;
pub mod response;

// Re-export all public types for convenient access
pub use query::{CabinClass, DATE_FORMAT, FareClass, TransportMode, TravelQuery};
pub use response::{
    CanonicalResponse, FallbackResponse, FlightAvailability, FlightRecord, Reconciled,
    TrainAvailability, TrainRecord,
};
