//! `travel_assistant` - Travel query normalization and response reconciliation
//!
//! This library turns free-text travel requests into structured queries
//! and reconciles whatever the search agent returns into a canonical
//! train or flight availability record, falling back to a tagged error
//! response when the agent output cannot be trusted.

pub mod assistant;
pub mod config;
pub mod date_resolver;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_parser;
pub mod reconcile;
pub mod vocabulary;

// Re-export core types for public API
pub use assistant::{ReplayCollaborator, SearchCollaborator, TravelAssistant};
pub use config::AssistantConfig;
pub use date_resolver::DateResolver;
pub use error::{ErrorKind, TravelAssistantError};
pub use models::{
    CabinClass, CanonicalResponse, FallbackResponse, FareClass, Reconciled, TransportMode,
    TravelQuery,
};
pub use query_parser::QueryParser;
pub use reconcile::{FallbackBuilder, RawAgentPayload, SchemaReconciler, reconcile};
pub use vocabulary::ClassVocabulary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelAssistantError>;
