use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::config::LlmConfig;
use crate::provider::{LLMError, LLMProvider, Result};

/// Non-streaming client for any OpenAI-compatible `chat/completions` endpoint
/// (OpenAI, DeepSeek, local gateways).
pub struct OpenAIProvider {
    client: Client,
    config: LlmConfig,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIProvider {
    pub fn new(config: LlmConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn build_body(&self, prompt: &str, system_prompt: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": prompt },
            ],
            "stream": false,
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn generate(&self, prompt: &str, system_prompt: &str) -> Result<String> {
        let url = self.config.endpoint("chat/completions");
        log::debug!(
            "Calling model '{}' at {} ({} prompt chars)",
            self.config.model,
            url,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&self.build_body(prompt, system_prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    LLMError::Auth(format!("HTTP {}: {}", status, text))
                }
                _ => LLMError::Api(format!("HTTP {}: {}", status, text)),
            });
        }

        let body: ChatCompletionResponse = serde_json::from_str(&response.text().await?)?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                LLMError::EmptyResponse(format!("model '{}' returned no content", self.config.model))
            })?;

        log::debug!("Model responded with {} chars", content.len());
        Ok(content)
    }
}
