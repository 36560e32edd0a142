//! Built-in tools for the travel assistant agent.
//!
//! `get_weather` queries wttr.in and `get_attraction` queries Tavily search.
//! Both share one HTTP client built from [`ToolsConfig`].

pub mod attraction;
pub mod weather;

use std::sync::Arc;
use std::time::Duration;

use react_core::tools::{RegistryError, ToolRegistry};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use attraction::{AttractionTool, DEFAULT_TAVILY_BASE_URL};
pub use weather::{WeatherTool, DEFAULT_WTTR_BASE_URL};

pub const BUILTIN_TOOL_NAMES: [&str; 2] = ["get_weather", "get_attraction"];

#[derive(Error, Debug)]
pub enum BuiltinToolsError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_wttr_base_url() -> String {
    DEFAULT_WTTR_BASE_URL.to_string()
}

fn default_tavily_base_url() -> String {
    DEFAULT_TAVILY_BASE_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_wttr_base_url")]
    pub wttr_base_url: String,
    #[serde(default = "default_tavily_base_url")]
    pub tavily_base_url: String,
    #[serde(default, skip_serializing)]
    pub tavily_api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            wttr_base_url: default_wttr_base_url(),
            tavily_base_url: default_tavily_base_url(),
            tavily_api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Registers `get_weather` and `get_attraction` into `registry`.
pub fn register_builtin_tools(
    registry: &mut ToolRegistry,
    config: &ToolsConfig,
) -> Result<(), BuiltinToolsError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs.max(1)))
        .build()?;

    registry.register_shared(Arc::new(
        WeatherTool::new(client.clone()).with_base_url(config.wttr_base_url.clone()),
    ))?;
    registry.register_shared(Arc::new(
        AttractionTool::new(client, config.tavily_api_key.clone())
            .with_base_url(config.tavily_base_url.clone()),
    ))?;

    if config.tavily_api_key.is_none() {
        log::warn!("TAVILY_API_KEY is not set; get_attraction will report an error when called");
    }
    Ok(())
}

pub fn builtin_registry(config: &ToolsConfig) -> Result<ToolRegistry, BuiltinToolsError> {
    let mut registry = ToolRegistry::new();
    register_builtin_tools(&mut registry, config)?;
    Ok(registry)
}
