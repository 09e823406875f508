//! Generative and embedding API collaborators.
//!
//! Two narrow async traits sit between fitcoach and the model
//! provider: `CompletionClient` for chat-style text generation and
//! `EmbeddingClient` for text embeddings. `OpenAiClient` implements
//! both against an OpenAI-compatible HTTP API; `MockClient` provides
//! deterministic offline behavior for tests.

mod api;
mod mock;

pub use api::{OpenAiClient, OpenAiClientConfig};
pub use mock::MockClient;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for API client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no API key configured; set api.api_key or the OPENAI_API_KEY environment variable")]
    MissingApiKey,

    #[error("API request failed: {0}")]
    Api(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse API response: {0}")]
    Parse(String),
}

/// Chat-completion collaborator.
///
/// The caller owns the prompt text; the client only transports it and
/// returns the model's raw reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a completion for the given prompt.
    ///
    /// `system_message` sets conversation context when present;
    /// `model` overrides the configured default model.
    async fn complete(
        &self,
        prompt: &str,
        system_message: Option<&str>,
        model: Option<&str>,
    ) -> Result<String, ClientError>;
}

/// Text-embedding collaborator.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed the given text into a fixed-dimension vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError>;
}
