//! OpenAI-compatible HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use fitcoach_types::ApiSettings;

use crate::{ClientError, CompletionClient, EmbeddingClient};

/// Configuration for the OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    /// API base URL (e.g., "https://api.openai.com/v1")
    pub base_url: String,

    /// Default chat-completion model
    pub model: String,

    /// Embedding model
    pub embedding_model: String,

    /// API key
    pub api_key: SecretString,

    /// Request timeout
    pub timeout: Duration,

    /// Maximum retry attempts on rate limits
    pub max_retries: u32,
}

impl OpenAiClientConfig {
    /// Build a config from loaded settings.
    ///
    /// The key comes from settings when present, falling back to the
    /// OPENAI_API_KEY environment variable. A blank key counts as
    /// absent.
    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ClientError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
            .ok_or(ClientError::MissingApiKey)?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            embedding_model: settings.embedding_model.clone(),
            api_key: SecretString::from(api_key),
            timeout: Duration::from_secs(settings.timeout_secs),
            max_retries: settings.max_retries,
        })
    }
}

/// Client for an OpenAI-compatible completion and embedding API.
pub struct OpenAiClient {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenAiClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Make a single chat-completion request.
    async fn request_completion(
        &self,
        prompt: &str,
        system_message: Option<&str>,
        model: Option<&str>,
    ) -> Result<String, ClientError> {
        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Serialize)]
        struct ChatMessage {
            role: String,
            content: String,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatReply,
        }

        #[derive(Deserialize)]
        struct ChatReply {
            content: String,
        }

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_message {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = ChatRequest {
            model: model.unwrap_or(&self.config.model).to_string(),
            messages,
            temperature: 0.7,
            max_tokens: 2000,
        };

        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(ClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        body.choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| ClientError::Parse("no choices in response".to_string()))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    /// Generate a completion, retrying on rate limits only.
    ///
    /// Authentication and other API failures surface immediately;
    /// a 429 is retried with exponential backoff up to the configured
    /// attempt limit.
    async fn complete(
        &self,
        prompt: &str,
        system_message: Option<&str>,
        model: Option<&str>,
    ) -> Result<String, ClientError> {
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(120)),
            ..Default::default()
        };

        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "calling chat completion API");

            match self
                .request_completion(prompt, system_message, model)
                .await
            {
                Ok(text) => return Ok(text),
                Err(ClientError::RateLimited) => {
                    if attempts > self.config.max_retries {
                        error!("rate limited and retries exhausted");
                        return Err(ClientError::RateLimited);
                    }

                    match backoff.next_backoff() {
                        Some(duration) => {
                            warn!(
                                retry_in_ms = duration.as_millis(),
                                "rate limited, retrying"
                            );
                            tokio::time::sleep(duration).await;
                        }
                        None => {
                            error!("rate limited and backoff exhausted");
                            return Err(ClientError::RateLimited);
                        }
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError> {
        #[derive(Serialize)]
        struct EmbeddingRequest {
            model: String,
            input: String,
        }

        #[derive(Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let request = EmbeddingRequest {
            model: self.config.embedding_model.clone(),
            input: text.to_string(),
        };

        let url = format!("{}/embeddings", self.config.base_url);
        debug!(model = %request.model, "calling embeddings API");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(ClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ClientError::Parse("no embedding in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Process env is shared across test threads; tests that read or
    // mutate OPENAI_API_KEY hold this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn settings_with_key(key: Option<&str>) -> ApiSettings {
        ApiSettings {
            api_key: key.map(|k| k.to_string()),
            ..ApiSettings::default()
        }
    }

    #[test]
    fn test_config_from_settings_uses_configured_key() {
        let config = OpenAiClientConfig::from_settings(&settings_with_key(Some("sk-test"))).unwrap();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.embedding_model, "text-embedding-3-large");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_config_missing_key_is_error() {
        let _env = ENV_LOCK.lock().unwrap();
        std::env::remove_var("OPENAI_API_KEY");

        let missing = OpenAiClientConfig::from_settings(&settings_with_key(None));
        assert!(matches!(missing, Err(ClientError::MissingApiKey)));

        let blank = OpenAiClientConfig::from_settings(&settings_with_key(Some("   ")));
        assert!(matches!(blank, Err(ClientError::MissingApiKey)));
    }

    #[test]
    fn test_env_var_supplies_missing_key() {
        let _env = ENV_LOCK.lock().unwrap();
        std::env::set_var("OPENAI_API_KEY", "sk-from-env");

        let from_none = OpenAiClientConfig::from_settings(&settings_with_key(None)).unwrap();
        assert_eq!(from_none.api_key.expose_secret(), "sk-from-env");

        // A blank configured key counts as absent, so it also falls
        // through to the environment.
        let from_blank =
            OpenAiClientConfig::from_settings(&settings_with_key(Some("   "))).unwrap();
        assert_eq!(from_blank.api_key.expose_secret(), "sk-from-env");

        std::env::remove_var("OPENAI_API_KEY");
    }

    #[test]
    fn test_client_construction() {
        let config = OpenAiClientConfig::from_settings(&settings_with_key(Some("sk-test"))).unwrap();
        assert!(OpenAiClient::new(config).is_ok());
    }
}
