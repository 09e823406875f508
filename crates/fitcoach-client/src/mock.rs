//! Mock client for testing.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::{ClientError, CompletionClient, EmbeddingClient};

/// Mock client with deterministic completions and embeddings.
///
/// Useful for testing without making API calls. Embeddings are a
/// stable function of the input text, so identical texts always map
/// to identical vectors. `fail_after` injects a failure once the
/// given number of calls has succeeded.
pub struct MockClient {
    reply: String,
    dimensions: usize,
    fail_after: Option<u32>,
    calls: AtomicU32,
}

impl MockClient {
    /// Create a mock that replies with an empty JSON object.
    pub fn new() -> Self {
        Self {
            reply: "{}".to_string(),
            dimensions: 8,
            fail_after: None,
            calls: AtomicU32::new(0),
        }
    }

    /// Set the canned completion reply.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = reply.into();
        self
    }

    /// Set the embedding dimensionality.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Fail every call after the first `calls` successful ones.
    pub fn fail_after(mut self, calls: u32) -> Self {
        self.fail_after = Some(calls);
        self
    }

    /// Number of calls made so far, across both traits.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_call_fails(&self) -> bool {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_after {
            Some(limit) => call >= limit,
            None => false,
        }
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    async fn complete(
        &self,
        _prompt: &str,
        _system_message: Option<&str>,
        _model: Option<&str>,
    ) -> Result<String, ClientError> {
        if self.next_call_fails() {
            return Err(ClientError::Api("mock failure injected".to_string()));
        }
        Ok(self.reply.clone())
    }
}

#[async_trait]
impl EmbeddingClient for MockClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError> {
        if self.next_call_fails() {
            return Err(ClientError::Api("mock failure injected".to_string()));
        }
        Ok(mock_embedding(text, self.dimensions))
    }
}

/// Fold the text's bytes into a fixed-size vector.
fn mock_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimensions];
    for (i, byte) in text.bytes().enumerate() {
        vector[i % dimensions] += f32::from(byte) / 255.0;
    }
    vector
}
