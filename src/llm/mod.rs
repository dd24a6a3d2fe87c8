//! LLM Backend Module
//!
//! Provides the interface the analysis generator talks to, plus the hosted
//! Anthropic Messages API implementation.
//!
//! Failures are reported as [`LlmError`] with an explicit kind (missing
//! configuration, network failure, provider rejection) so callers never have
//! to inspect the completion text to find out whether the call worked.

use async_trait::async_trait;

mod anthropic;
pub use anthropic::AnthropicClient;

/// One text completion with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

/// LLM call errors
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{0} is not configured")]
    ConfigMissing(&'static str),
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Provider returned status {status}: {message}")]
    Provider {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Response contained no text completion")]
    EmptyResponse,
}

/// Unified trait for LLM backends
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Submit a single-turn prompt and return the first text completion
    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError>;

    /// Get the backend name for logging
    fn backend_name(&self) -> &'static str;
}
