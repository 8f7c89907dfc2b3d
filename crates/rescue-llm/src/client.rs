//! The collaborator client used by the command handlers.
//!
//! Wraps a remote backend (or the offline responder), the prompt engine,
//! and the call deadline. Callers get either a usable answer or a
//! [`CollaboratorError`]; chat additionally has a fallback form that never
//! fails.

use std::time::Duration;

use rescue_core::config::LlmSection;
use rescue_types::NegotiationOutcome;

use crate::backend::{BackendKind, RemoteBackend, ResponseFormat};
use crate::context::{ChatContext, NegotiationBrief};
use crate::error::CollaboratorError;
use crate::offline;
use crate::parse::parse_negotiation_outcome;
use crate::prompt::{PromptEngine, RenderedPrompt};

/// Reply sent when the collaborator cannot answer a chat question.
pub const FALLBACK_CHAT_REPLY: &str = "I apologize, but I'm experiencing technical difficulties. \
    Please try again or contact system administrator.";

/// Client for the external generative-language collaborator.
#[derive(Debug)]
pub struct LanguageClient {
    remote: Option<RemoteBackend>,
    prompts: PromptEngine,
    timeout: Duration,
}

impl LanguageClient {
    /// Build a client from configuration.
    ///
    /// A network backend without an API key degrades to offline mode with
    /// a warning. Ollama endpoints are the exception and may run keyless.
    pub fn from_config(config: &LlmSection) -> Result<Self, CollaboratorError> {
        let kind = BackendKind::parse(&config.backend)?;
        let keyless_ok = config.backend.eq_ignore_ascii_case("ollama");

        let api_key = config.api_key.clone().filter(|k| !k.trim().is_empty());

        let remote = match (kind, api_key) {
            (BackendKind::Offline, _) => None,
            (kind, Some(key)) => RemoteBackend::create(kind, config, key),
            (kind, None) if keyless_ok => RemoteBackend::create(kind, config, String::new()),
            (_, None) => {
                tracing::warn!(
                    backend = %config.backend,
                    "No collaborator API key configured, answering offline"
                );
                None
            }
        };

        Ok(Self {
            remote,
            prompts: PromptEngine::new()?,
            timeout: config.timeout(),
        })
    }

    /// A client that always answers offline.
    pub fn offline(timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            remote: None,
            prompts: PromptEngine::new()?,
            timeout,
        })
    }

    /// Name of the active backend, for logs and `/health`.
    pub fn backend_name(&self) -> &'static str {
        self.remote.as_ref().map_or("offline", RemoteBackend::name)
    }

    /// Ask a free-text question about the dashboard.
    pub async fn chat(
        &self,
        question: &str,
        context: &ChatContext,
    ) -> Result<String, CollaboratorError> {
        let Some(remote) = &self.remote else {
            return Ok(offline::chat_reply(question, context));
        };

        let prompt = self.prompts.chat(question, context)?;
        let reply = self.call(remote, &prompt, ResponseFormat::Text).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(CollaboratorError::Parse("empty chat reply".to_owned()));
        }
        Ok(reply.to_owned())
    }

    /// [`Self::chat`], answering with [`FALLBACK_CHAT_REPLY`] on any failure.
    pub async fn chat_or_fallback(&self, question: &str, context: &ChatContext) -> String {
        match self.chat(question, context).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    backend = self.backend_name(),
                    "Chat collaborator failed, sending fallback reply"
                );
                FALLBACK_CHAT_REPLY.to_owned()
            }
        }
    }

    /// Score a negotiation round. The reply must match the outcome schema
    /// exactly; anything else is an error.
    pub async fn negotiate(
        &self,
        brief: &NegotiationBrief,
    ) -> Result<NegotiationOutcome, CollaboratorError> {
        let Some(remote) = &self.remote else {
            return Ok(offline::negotiation_outcome(brief));
        };

        let prompt = self.prompts.negotiation(brief)?;
        let reply = self.call(remote, &prompt, ResponseFormat::Json).await?;
        parse_negotiation_outcome(&reply)
    }

    /// One backend call under the configured deadline.
    async fn call(
        &self,
        remote: &RemoteBackend,
        prompt: &RenderedPrompt,
        format: ResponseFormat,
    ) -> Result<String, CollaboratorError> {
        tracing::debug!(backend = remote.name(), ?format, "Calling collaborator");
        match tokio::time::timeout(self.timeout, remote.complete(prompt, format)).await {
            Ok(result) => result,
            Err(_) => Err(CollaboratorError::Timeout(self.timeout.as_millis())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rescue_types::{DEFAULT_ALERT_CAPACITY, seed_snapshot};

    use super::*;

    /// Settings pointing at a port nothing listens on.
    fn unreachable_config() -> LlmSection {
        LlmSection {
            backend: "openai".to_owned(),
            api_url: "http://127.0.0.1:9".to_owned(),
            model: "test-model".to_owned(),
            api_key: Some("test".to_owned()),
            timeout_ms: 2_000,
        }
    }

    fn context() -> ChatContext {
        ChatContext::from_snapshot(&seed_snapshot(Utc::now(), DEFAULT_ALERT_CAPACITY))
    }

    #[test]
    fn missing_key_runs_offline() {
        let client = LanguageClient::from_config(&LlmSection::default()).unwrap();
        assert_eq!(client.backend_name(), "offline");
    }

    #[test]
    fn keyed_backend_is_remote() {
        let client = LanguageClient::from_config(&unreachable_config()).unwrap();
        assert_eq!(client.backend_name(), "openai-compatible");
    }

    #[test]
    fn unknown_backend_is_config_error() {
        let config = LlmSection {
            backend: "telepathy".to_owned(),
            ..LlmSection::default()
        };
        assert!(matches!(
            LanguageClient::from_config(&config),
            Err(CollaboratorError::Config(_))
        ));
    }

    #[tokio::test]
    async fn offline_chat_answers() {
        let client = LanguageClient::offline(Duration::from_secs(1)).unwrap();
        let reply = client.chat("any inventory advice?", &context()).await.unwrap();
        assert!(reply.contains("Electronics"));
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back_for_chat() {
        let client = LanguageClient::from_config(&unreachable_config()).unwrap();
        let reply = client.chat_or_fallback("status?", &context()).await;
        assert_eq!(reply, FALLBACK_CHAT_REPLY);
    }

    #[tokio::test]
    async fn unreachable_backend_fails_negotiation() {
        let client = LanguageClient::from_config(&unreachable_config()).unwrap();
        let snapshot = seed_snapshot(Utc::now(), DEFAULT_ALERT_CAPACITY);
        let brief = NegotiationBrief::new(snapshot.supplier(1).unwrap(), serde_json::Value::Null);

        let result = client.negotiate(&brief).await;

        assert!(matches!(
            result,
            Err(CollaboratorError::Backend(_) | CollaboratorError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn offline_negotiation_is_scored() {
        let client = LanguageClient::offline(Duration::from_secs(1)).unwrap();
        let snapshot = seed_snapshot(Utc::now(), DEFAULT_ALERT_CAPACITY);
        let brief = NegotiationBrief::new(snapshot.supplier(4).unwrap(), serde_json::Value::Null);

        let outcome = client.negotiate(&brief).await.unwrap();

        assert!((0.0..=100.0).contains(&outcome.acceptance_likelihood));
    }
}
