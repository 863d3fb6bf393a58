//! Untrusted collaborator payloads and their one-shot classification

use crate::error::ErrorKind;
use serde_json::{Map, Value};
use tracing::debug;

/// Whatever the search collaborator handed back
#[derive(Debug, Clone, PartialEq)]
pub enum RawAgentPayload {
    /// Free text, possibly JSON wrapped in a code fence, possibly prose
    Text(String),
    /// Already-decoded structured data of unknown shape
    Structured(Value),
}

impl From<String> for RawAgentPayload {
    fn from(text: String) -> Self {
        RawAgentPayload::Text(text)
    }
}

impl From<&str> for RawAgentPayload {
    fn from(text: &str) -> Self {
        RawAgentPayload::Text(text.to_string())
    }
}

impl From<Value> for RawAgentPayload {
    fn from(value: Value) -> Self {
        RawAgentPayload::Structured(value)
    }
}

/// A payload after decoding, tagged by the shape it claims to have
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedPayload {
    /// Mapping with a `trains` key; takes precedence over `flights`
    Train(Map<String, Value>),
    /// Mapping with a `flights` key and no `trains` key
    Flight(Map<String, Value>),
    /// Could not be classified. `fields` holds the mapping when one was decoded.
    Unclassified {
        kind: ErrorKind,
        fields: Option<Map<String, Value>>,
    },
}

impl ClassifiedPayload {
    /// Decode and classify. Total: every input yields a tag.
    #[must_use]
    pub fn classify(payload: RawAgentPayload) -> Self {
        let value = match payload {
            RawAgentPayload::Text(text) => match decode_text(&text) {
                Some(value) => value,
                None => {
                    return ClassifiedPayload::Unclassified {
                        kind: ErrorKind::UnparsableOutput,
                        fields: None,
                    };
                }
            },
            // A structured string is still just text from the agent.
            RawAgentPayload::Structured(Value::String(text)) => {
                return Self::classify(RawAgentPayload::Text(text));
            }
            RawAgentPayload::Structured(value) => value,
        };

        let Value::Object(fields) = value else {
            return ClassifiedPayload::Unclassified {
                kind: ErrorKind::NonObjectOutput,
                fields: None,
            };
        };

        if fields.contains_key("trains") {
            ClassifiedPayload::Train(fields)
        } else if fields.contains_key("flights") {
            ClassifiedPayload::Flight(fields)
        } else {
            ClassifiedPayload::Unclassified {
                kind: ErrorKind::UnknownResponseShape,
                fields: Some(fields),
            }
        }
    }
}

fn decode_text(text: &str) -> Option<Value> {
    let body = strip_code_fence(text);
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Payload is not JSON: {}", e);
            None
        }
    }
}

/// Trim and remove an enclosing triple-backtick fence with an optional language tag
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // A language tag only counts when whitespace separates it from the body,
    // so "```42```" keeps its body.
    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    let after_tag = &rest[tag_len..];
    let rest = if tag_len > 0 && after_tag.starts_with(char::is_whitespace) {
        after_tag
    } else {
        rest
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
