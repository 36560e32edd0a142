pub mod config;
pub mod openai;
pub mod provider;

pub use config::LlmConfig;
pub use openai::OpenAIProvider;
pub use provider::{LLMError, LLMProvider, Result};
