use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// A text completion service: system prompt plus conversation in, model text out.
///
/// One call per loop iteration. Implementations do not retry or cache; the
/// agent loop turns any error into an aborted run.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// # Arguments
    /// * `prompt` - The rendered conversation history
    /// * `system_prompt` - Instructions describing the action format and tools
    async fn generate(&self, prompt: &str, system_prompt: &str) -> Result<String>;
}
