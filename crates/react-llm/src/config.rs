use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::provider::{LLMError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Connection settings handed to a provider at construction time.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("api_key", self.api_key.as_str()),
            ("base_url", self.base_url.as_str()),
            ("model", self.model.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(LLMError::Config(format!(
                "missing {}",
                missing.join(", ")
            )));
        }
        if self.timeout_secs == 0 {
            return Err(LLMError::Config("timeout must be positive".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_complete_config() {
        let config = LlmConfig::new("sk-test", DEFAULT_BASE_URL, DEFAULT_MODEL);
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn validate_lists_missing_fields() {
        let config = LlmConfig::new("", "  ", "gpt-4o");
        let error = config.validate().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Configuration error: missing api_key, base_url"
        );
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = LlmConfig::new("sk", DEFAULT_BASE_URL, DEFAULT_MODEL).with_timeout_secs(0);
        assert!(matches!(config.validate(), Err(LLMError::Config(_))));
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let config = LlmConfig::new("sk", "https://api.deepseek.com/v1/", "deepseek-chat");
        assert_eq!(
            config.endpoint("chat/completions"),
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn debug_masks_api_key() {
        let config = LlmConfig::new("sk-1234567890", DEFAULT_BASE_URL, DEFAULT_MODEL);
        let debug = format!("{config:?}");
        assert!(debug.contains("sk-1****"));
        assert!(!debug.contains("567890"));
    }

    #[test]
    fn timeout_defaults_when_missing_from_json() {
        let config: LlmConfig = serde_json::from_str(
            r#"{"api_key":"sk","base_url":"http://localhost","model":"m"}"#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
