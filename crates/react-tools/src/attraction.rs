use async_trait::async_trait;
use react_core::tools::{Tool, ToolArguments, ToolError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Attraction recommendations for a city under given weather, via Tavily search.
pub struct AttractionTool {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

impl AttractionTool {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn query(city: &str, weather: &str) -> String {
        format!(
            "Best tourist attractions to visit in '{city}' when the weather is '{weather}', with reasons"
        )
    }

    fn summarize(response: SearchResponse) -> String {
        if let Some(answer) = response
            .answer
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
        {
            return answer;
        }

        let lines: Vec<String> = response
            .results
            .iter()
            .map(|result| format!("- {}: {}", result.title.trim(), result.content.trim()))
            .collect();

        if lines.is_empty() {
            "Sorry, no tourist attraction recommendations were found.".to_string()
        } else {
            format!("Search results:\n{}", lines.join("\n"))
        }
    }
}

#[async_trait]
impl Tool for AttractionTool {
    fn name(&self) -> &str {
        "get_attraction"
    }

    fn description(&self) -> &str {
        "Search for recommended tourist attractions in the given city that suit the given weather."
    }

    fn parameters(&self) -> &[&str] {
        &["city", "weather"]
    }

    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ToolError::Execution("TAVILY_API_KEY is not configured".to_string()))?;
        let city = args.get("city").map(String::as_str).unwrap_or_default();
        let weather = args.get("weather").map(String::as_str).unwrap_or_default();

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        log::debug!("Searching attractions for '{}' ({})", city, weather);

        let search_error = |error: reqwest::Error| {
            ToolError::Execution(format!("attraction search failed - {error}"))
        };

        let response: SearchResponse = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&json!({
                "api_key": api_key,
                "query": Self::query(city, weather),
                "search_depth": "basic",
                "include_answer": true,
            }))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(search_error)?
            .json()
            .await
            .map_err(search_error)?;

        Ok(Self::summarize(response))
    }
}
