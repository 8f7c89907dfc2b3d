//! Remote collaborator backends.
//!
//! Enum dispatch over the supported HTTP APIs, so the client can hold any
//! backend without boxing async trait objects. Every backend takes a
//! rendered prompt and returns the reply text; interpreting that text is
//! the caller's job.

use rescue_core::config::LlmSection;

use crate::error::CollaboratorError;
use crate::prompt::RenderedPrompt;

/// Output shape requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free text.
    Text,
    /// A single JSON object, using the API's JSON mode when it has one.
    Json,
}

/// Which collaborator implementation the configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Google Gemini `generateContent`.
    Gemini,
    /// OpenAI-compatible chat completions (`OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
    /// Canned answers, no network.
    Offline,
}

impl BackendKind {
    /// Parse a configured backend name, case-insensitively.
    pub fn parse(name: &str) -> Result<Self, CollaboratorError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "offline" | "none" => Ok(Self::Offline),
            other => Err(CollaboratorError::Config(format!(
                "unknown llm backend {other:?}"
            ))),
        }
    }
}

/// A remote backend that turns a prompt into reply text.
pub enum RemoteBackend {
    /// Google Gemini.
    Gemini(GeminiBackend),
    /// OpenAI-compatible chat completions.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl std::fmt::Debug for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RemoteBackend").field(&self.name()).finish()
    }
}

impl RemoteBackend {
    /// Build the backend for `kind`, or `None` for [`BackendKind::Offline`].
    pub fn create(kind: BackendKind, config: &LlmSection, api_key: String) -> Option<Self> {
        let endpoint = Endpoint {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key,
            model: config.model.clone(),
        };
        match kind {
            BackendKind::Gemini => Some(Self::Gemini(GeminiBackend(endpoint))),
            BackendKind::OpenAi => Some(Self::OpenAi(OpenAiBackend(endpoint))),
            BackendKind::Anthropic => Some(Self::Anthropic(AnthropicBackend(endpoint))),
            BackendKind::Offline => None,
        }
    }

    /// Send a prompt and return the reply text.
    pub async fn complete(
        &self,
        prompt: &RenderedPrompt,
        format: ResponseFormat,
    ) -> Result<String, CollaboratorError> {
        match self {
            Self::Gemini(backend) => backend.complete(prompt, format).await,
            Self::OpenAi(backend) => backend.complete(prompt, format).await,
            Self::Anthropic(backend) => backend.complete(prompt).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gemini(_) => "gemini",
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

/// Connection details shared by every backend.
struct Endpoint {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl Endpoint {
    /// POST `body` and return the decoded JSON reply, mapping transport
    /// and status failures to [`CollaboratorError::Backend`].
    async fn post_json(
        &self,
        label: &str,
        request: reqwest::RequestBuilder,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, CollaboratorError> {
        let response = request
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Backend(format!("{label} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(CollaboratorError::Backend(format!(
                "{label} returned {status}: {error_body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CollaboratorError::Backend(format!("{label} response parse failed: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

/// Backend for the Gemini `generateContent` API.
///
/// Sends to `{api_url}/models/{model}:generateContent` with the key in the
/// `x-goog-api-key` header. JSON output uses `responseMimeType`.
pub struct GeminiBackend(Endpoint);

impl GeminiBackend {
    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        format: ResponseFormat,
    ) -> Result<String, CollaboratorError> {
        let endpoint = &self.0;
        let url = format!(
            "{}/models/{}:generateContent",
            endpoint.api_url, endpoint.model
        );

        let mut generation_config = serde_json::json!({ "maxOutputTokens": 1024 });
        if format == ResponseFormat::Json
            && let Some(config) = generation_config.as_object_mut()
        {
            config.insert(
                "responseMimeType".to_owned(),
                serde_json::Value::from("application/json"),
            );
        }

        let body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": prompt.system }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt.user }] }],
            "generationConfig": generation_config
        });

        let request = endpoint
            .client
            .post(&url)
            .header("x-goog-api-key", &endpoint.api_key);
        let json = endpoint.post_json("Gemini", request, &body).await?;
        extract_gemini_content(&json)
    }
}

/// Extract `candidates[0].content.parts[0].text`.
fn extract_gemini_content(json: &serde_json::Value) -> Result<String, CollaboratorError> {
    json.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            CollaboratorError::Backend(
                "Gemini response missing candidates[0].content.parts[0].text".to_owned(),
            )
        })
}

// ---------------------------------------------------------------------------
// OpenAI-compatible
// ---------------------------------------------------------------------------

/// Backend for OpenAI-compatible chat completions APIs.
///
/// Sends to `{api_url}/chat/completions` with a bearer token.
pub struct OpenAiBackend(Endpoint);

impl OpenAiBackend {
    async fn complete(
        &self,
        prompt: &RenderedPrompt,
        format: ResponseFormat,
    ) -> Result<String, CollaboratorError> {
        let endpoint = &self.0;
        let url = format!("{}/chat/completions", endpoint.api_url);

        let mut body = serde_json::json!({
            "model": endpoint.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": 0.7,
            "max_tokens": 1024
        });
        if format == ResponseFormat::Json
            && let Some(fields) = body.as_object_mut()
        {
            fields.insert(
                "response_format".to_owned(),
                serde_json::json!({"type": "json_object"}),
            );
        }

        let request = endpoint
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", endpoint.api_key));
        let json = endpoint.post_json("OpenAI", request, &body).await?;
        extract_openai_content(&json)
    }
}

/// Extract `choices[0].message.content`.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, CollaboratorError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            CollaboratorError::Backend(
                "OpenAI response missing choices[0].message.content".to_owned(),
            )
        })
}

// ---------------------------------------------------------------------------
// Anthropic
// ---------------------------------------------------------------------------

/// Backend for the Anthropic Messages API.
///
/// The system message is a top-level field and the key travels in
/// `x-api-key`. There is no JSON mode; the system prompt asks for JSON.
pub struct AnthropicBackend(Endpoint);

impl AnthropicBackend {
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, CollaboratorError> {
        let endpoint = &self.0;
        let url = format!("{}/messages", endpoint.api_url);

        let body = serde_json::json!({
            "model": endpoint.model,
            "max_tokens": 1024,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });

        let request = endpoint
            .client
            .post(&url)
            .header("x-api-key", &endpoint.api_key)
            .header("anthropic-version", "2023-06-01");
        let json = endpoint.post_json("Anthropic", request, &body).await?;
        extract_anthropic_content(&json)
    }
}

/// Extract `content[0].text`.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, CollaboratorError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            CollaboratorError::Backend("Anthropic response missing content[0].text".to_owned())
        })
}
