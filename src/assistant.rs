//! End-to-end request handling around the search collaborator
//!
//! The only suspension point in a request is the collaborator round trip.
//! Parsing and reconciliation stay synchronous; this layer awaits the
//! collaborator under the configured timeout and turns every transport
//! failure into a fallback.

use crate::config::CollaboratorConfig;
use crate::error::ErrorKind;
use crate::models::{Reconciled, TravelQuery};
use crate::query_parser::QueryParser;
use crate::reconcile::{FallbackBuilder, PartialFields, RawAgentPayload, SchemaReconciler};
use crate::Result;
use async_trait::async_trait;
use tracing::{info, instrument, warn};

/// External search/agent step producing a raw availability payload
#[async_trait]
pub trait SearchCollaborator: Send + Sync {
    async fn search(&self, query: &TravelQuery) -> Result<RawAgentPayload>;
}

/// Collaborator that replays a recorded payload, whatever the query
#[derive(Debug, Clone)]
pub struct ReplayCollaborator {
    payload: RawAgentPayload,
}

impl ReplayCollaborator {
    pub fn new(payload: impl Into<RawAgentPayload>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

#[async_trait]
impl SearchCollaborator for ReplayCollaborator {
    async fn search(&self, _query: &TravelQuery) -> Result<RawAgentPayload> {
        Ok(self.payload.clone())
    }
}

/// Query in, availability response out
pub struct TravelAssistant<C> {
    collaborator: C,
    config: CollaboratorConfig,
    parser: QueryParser,
}

impl<C: SearchCollaborator> TravelAssistant<C> {
    pub fn new(collaborator: C, config: CollaboratorConfig) -> Self {
        Self {
            collaborator,
            config,
            parser: QueryParser::new(),
        }
    }

    /// Parse, search and reconcile a free-text request
    #[instrument(skip(self))]
    pub async fn handle(&self, user_query: &str) -> Reconciled {
        let query = self.parser.parse(user_query);
        info!(
            "Searching {:?} availability {} -> {} on {}",
            query.mode,
            query.source,
            query.destination,
            query.date_string()
        );
        self.handle_query(&query).await
    }

    /// Search and reconcile an already-parsed query
    pub async fn handle_query(&self, query: &TravelQuery) -> Reconciled {
        let search = self.collaborator.search(query);
        match tokio::time::timeout(self.config.timeout(), search).await {
            Ok(Ok(payload)) => SchemaReconciler::reconcile(payload, query),
            Ok(Err(e)) => {
                warn!("Search collaborator failed: {}", e);
                Self::collaborator_failure(query)
            }
            Err(_) => {
                warn!(
                    "Search collaborator timed out after {}s",
                    self.config.timeout_seconds
                );
                Self::collaborator_failure(query)
            }
        }
    }

    fn collaborator_failure(query: &TravelQuery) -> Reconciled {
        FallbackBuilder::build(
            ErrorKind::CollaboratorFailure,
            PartialFields::from_query(query),
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TravelAssistantError;
    use serde_json::json;
    use std::time::Duration;

    struct FailingCollaborator;

    #[async_trait]
    impl SearchCollaborator for FailingCollaborator {
        async fn search(&self, _query: &TravelQuery) -> Result<RawAgentPayload> {
            Err(TravelAssistantError::collaborator("connection refused"))
        }
    }

    struct SlowCollaborator;

    #[async_trait]
    impl SearchCollaborator for SlowCollaborator {
        async fn search(&self, _query: &TravelQuery) -> Result<RawAgentPayload> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(RawAgentPayload::Text("{}".to_string()))
        }
    }

    struct EchoCollaborator;

    #[async_trait]
    impl SearchCollaborator for EchoCollaborator {
        async fn search(&self, query: &TravelQuery) -> Result<RawAgentPayload> {
            Ok(json!({
                "source": query.source,
                "destination": query.destination,
                "date": query.date_string(),
                "class": query.fare_class,
                "trains": []
            })
            .into())
        }
    }

    #[tokio::test]
    async fn test_handle_echoes_parsed_query() {
        let assistant = TravelAssistant::new(EchoCollaborator, CollaboratorConfig::default());
        let result = assistant
            .handle("Show trains from Chennai to Bangalore in sleeper class")
            .await;

        let train = result.as_train().expect("train variant");
        assert_eq!(train.source, "Chennai");
        assert_eq!(train.destination, "Bangalore");
        assert_eq!(train.fare_class.code(), "SL");
    }

    #[tokio::test]
    async fn test_replayed_prose_falls_back() {
        let assistant = TravelAssistant::new(
            ReplayCollaborator::new("Sorry, no data available."),
            CollaboratorConfig::default(),
        );
        let result = assistant.handle("Find trains from Delhi to Mumbai").await;
        let fallback = result.as_fallback().expect("fallback");

        assert_eq!(fallback.error, ErrorKind::UnparsableOutput);
        assert_eq!(fallback.source, "Delhi");
        assert_eq!(fallback.destination, "Mumbai");
    }

    #[tokio::test]
    async fn test_collaborator_error_falls_back() {
        let assistant = TravelAssistant::new(FailingCollaborator, CollaboratorConfig::default());
        let result = assistant.handle("trains from Delhi to Agra").await;
        assert_eq!(result.error(), Some(ErrorKind::CollaboratorFailure));
    }

    #[tokio::test(start_paused = true)]
    async fn test_collaborator_timeout_falls_back() {
        let config = CollaboratorConfig { timeout_seconds: 1 };
        let assistant = TravelAssistant::new(SlowCollaborator, config);
        let result = assistant.handle("trains from Delhi to Agra").await;
        assert_eq!(result.error(), Some(ErrorKind::CollaboratorFailure));
    }
}
