//! LLM provider abstraction layer.
//!
//! Defines the [`LlmProvider`] trait and the shared request/response types
//! used by all provider implementations.
//!
//! Two providers are implemented:
//! - [`ollama::OllamaProvider`]: Ollama `/api/chat` API
//! - [`openai::OpenAiProvider`]: OpenAI-compatible `/v1/chat/completions` API
//!
//! [`build_provider`] picks one from a `<provider>/<model>` spec.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::NarrativeConfig;

pub mod ollama;
pub mod openai;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Conversation participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message.
    System,
    /// Human user message.
    User,
    /// Assistant (LLM) message.
    Assistant,
}

impl Role {
    /// Wire name shared by the chat APIs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A message in a conversation with an LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,
    /// Plain text content.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Request / Response
// ---------------------------------------------------------------------------

/// A request to an LLM provider for a completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Conversation history including the latest user message.
    pub messages: Vec<Message>,
    /// System prompt (injected before messages).
    pub system: Option<String>,
    /// Maximum tokens in the response.
    pub max_tokens: Option<u32>,
}

/// Usage statistics for a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageStats {
    /// Tokens used in the prompt/input.
    pub input_tokens: u32,
    /// Tokens generated in the response.
    pub output_tokens: u32,
}

/// The response from an LLM provider.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Response text.
    pub text: String,
    /// Token usage.
    pub usage: UsageStats,
    /// The model identifier that served this response.
    pub model: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by model providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match expected schema.
    #[error("provider response parse error: {0}")]
    Parse(String),
    /// Upstream provider responded with an error status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// Provider cannot satisfy the request with current configuration.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// HTTP helpers (useful for all providers)
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure, `ProviderError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"sk-ant-[A-Za-z0-9_\-]{10,}",
        r"sk-[A-Za-z0-9]{32,}",
        r"ghp_[A-Za-z0-9]{20,}",
        r"Bearer [A-Za-z0-9._\-]{16,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Core LLM provider interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Request a completion from the LLM.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on API, network, or parse failure.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;

    /// The model identifier string this provider is instantiated for.
    fn model_id(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Parse a provider string like `"ollama/qwen3:8b"` into components.
///
/// Returns `(provider_name, model_name)`.
///
/// # Errors
///
/// Returns an error if the string has no `/` or either side is empty.
pub fn parse_provider_string(s: &str) -> anyhow::Result<(&str, &str)> {
    let (provider, model) = s.split_once('/').ok_or_else(|| {
        anyhow::anyhow!("invalid provider string: {s:?}, expected format 'provider/model'")
    })?;
    if provider.is_empty() || model.is_empty() {
        anyhow::bail!("invalid provider string: {s:?}, both provider and model must be non-empty");
    }
    Ok((provider, model))
}

/// Instantiate the provider named by `config.model`.
///
/// A non-empty `config.endpoint` replaces the provider's default base URL.
/// The OpenAI provider reads its API key from `config.api_key_env`; a
/// missing key is allowed for self-hosted compatible endpoints.
///
/// # Errors
///
/// Returns an error for a malformed spec or an unsupported provider.
pub fn build_provider(config: &NarrativeConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let (provider, model) = parse_provider_string(&config.model)?;
    let endpoint = config.endpoint.trim();

    match provider {
        "ollama" => {
            let mut instance = ollama::OllamaProvider::new(config.model.clone(), model.to_owned());
            if !endpoint.is_empty() {
                instance.base_url = endpoint.trim_end_matches('/').to_owned();
            }
            Ok(Arc::new(instance))
        }
        "openai" => {
            let api_key = std::env::var(&config.api_key_env)
                .ok()
                .filter(|k| !k.is_empty());
            let mut instance =
                openai::OpenAiProvider::new(config.model.clone(), model.to_owned(), api_key);
            if !endpoint.is_empty() {
                instance.base_url = endpoint.trim_end_matches('/').to_owned();
            }
            Ok(Arc::new(instance))
        }
        other => anyhow::bail!("unsupported provider '{other}', expected 'ollama' or 'openai'"),
    }
}
