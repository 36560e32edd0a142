use std::path::{Path, PathBuf};

use react_llm::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use react_llm::LlmConfig;
use react_tools::ToolsConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_PATH: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings resolved from, in increasing priority: the config file,
/// environment variables (including `.env`) and command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub tavily_api_key: Option<String>,
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

pub fn react_agent_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".react-agent")
}

fn config_json_path() -> PathBuf {
    react_agent_dir().join("config.json")
}

impl Config {
    /// `~/.react-agent/config.json`, else `./config.toml`, then the process
    /// environment.
    pub fn load() -> Result<Self> {
        Self::load_from(
            &config_json_path(),
            Path::new(CONFIG_FILE_PATH),
            |name| std::env::var(name).ok(),
        )
    }

    pub fn load_from<F>(json_path: &Path, toml_path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if json_path.exists() {
            log::debug!("Loading config from {}", json_path.display());
            let content = read(json_path)?;
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: json_path.to_path_buf(),
                source,
            })?
        } else if toml_path.exists() {
            log::debug!("Loading config from {}", toml_path.display());
            let content = read(toml_path)?;
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: toml_path.to_path_buf(),
                source,
            })?
        } else {
            Config::default()
        };

        config.apply_env(env)?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = var("LLM_API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Some(base_url) = var("LLM_BASE_URL") {
            self.base_url = Some(base_url);
        }
        if let Some(model) = var("LLM_MODEL_ID") {
            self.model = Some(model);
        }
        if let Some(timeout) = var("LLM_TIMEOUT") {
            self.timeout_secs = Some(parse_positive("LLM_TIMEOUT", &timeout)?);
        }
        if let Some(tavily_api_key) = var("TAVILY_API_KEY") {
            self.tavily_api_key = Some(tavily_api_key);
        }
        Ok(())
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig::new(
            self.api_key.clone().unwrap_or_default(),
            self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            self.model.as_deref().unwrap_or(DEFAULT_MODEL),
        )
        .with_timeout_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn tools_config(&self) -> ToolsConfig {
        ToolsConfig {
            tavily_api_key: self.tavily_api_key.clone(),
            ..ToolsConfig::default()
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}
