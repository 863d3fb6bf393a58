//! Error types and handling for the travel assistant
//!
//! Two families live here. [`TravelAssistantError`] covers genuine failures
//! of the surrounding application (configuration, I/O, the search
//! collaborator). [`ErrorKind`] is the reconciliation taxonomy: it is only
//! ever attached to a fallback response and never returned as an `Err`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for the travel assistant
#[derive(Error, Debug)]
pub enum TravelAssistantError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Search collaborator failures (transport, agent runtime)
    #[error("Collaborator error: {message}")]
    Collaborator { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON encoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl TravelAssistantError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new collaborator error
    pub fn collaborator<S: Into<String>>(message: S) -> Self {
        Self::Collaborator {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelAssistantError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            TravelAssistantError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TravelAssistantError::Collaborator { .. } => {
                "The travel search service is unavailable. Please try again later.".to_string()
            }
            TravelAssistantError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TravelAssistantError::Json { .. } => "Failed to encode the response.".to_string(),
        }
    }
}

/// Why a response degraded to a fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Payload could not be decoded as structured data
    UnparsableOutput,
    /// Payload decoded, but is not a field mapping
    NonObjectOutput,
    /// Train-shaped payload with missing or mistyped fields
    InvalidTrainSchema,
    /// Flight-shaped payload with missing or mistyped fields
    InvalidFlightSchema,
    /// Neither a trains nor a flights list is present
    UnknownResponseShape,
    /// The collaborator failed or timed out before producing a payload
    CollaboratorFailure,
}

impl ErrorKind {
    /// Stable name, identical to the serialized form
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnparsableOutput => "UnparsableOutput",
            ErrorKind::NonObjectOutput => "NonObjectOutput",
            ErrorKind::InvalidTrainSchema => "InvalidTrainSchema",
            ErrorKind::InvalidFlightSchema => "InvalidFlightSchema",
            ErrorKind::UnknownResponseShape => "UnknownResponseShape",
            ErrorKind::CollaboratorFailure => "CollaboratorFailure",
        }
    }

    /// Human-readable explanation to show next to the best-effort fields
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::UnparsableOutput => "The search agent did not return valid JSON.",
            ErrorKind::NonObjectOutput => "The search agent returned JSON that is not an object.",
            ErrorKind::InvalidTrainSchema => "The train response was invalid or incomplete.",
            ErrorKind::InvalidFlightSchema => "The flight response was invalid or incomplete.",
            ErrorKind::UnknownResponseShape => {
                "The search agent response contained neither trains nor flights."
            }
            ErrorKind::CollaboratorFailure => "The search agent could not be reached.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
