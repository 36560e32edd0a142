use async_trait::async_trait;
use react_core::tools::{Tool, ToolArguments, ToolError};
use reqwest::{Client, Url};
use serde::Deserialize;

pub const DEFAULT_WTTR_BASE_URL: &str = "https://wttr.in";

/// Current weather for a city, from the wttr.in JSON API.
pub struct WeatherTool {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct WttrResponse {
    #[serde(default)]
    current_condition: Vec<CurrentCondition>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

impl WeatherTool {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_WTTR_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// `{base_url}/{city}` with the city as one escaped path segment.
    fn city_url(&self, city: &str) -> Result<Url, ToolError> {
        let invalid = || {
            ToolError::Execution(format!("invalid weather service URL '{}'", self.base_url))
        };

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(city);
        Ok(url)
    }

    fn summarize(city: &str, body: &str) -> Result<String, ToolError> {
        let parse_error = |detail: String| {
            ToolError::Execution(format!(
                "failed to parse weather data, the city name may be invalid - {detail}"
            ))
        };

        let response: WttrResponse =
            serde_json::from_str(body).map_err(|error| parse_error(error.to_string()))?;
        let current = response
            .current_condition
            .first()
            .ok_or_else(|| parse_error("missing current_condition".to_string()))?;
        let description = current
            .weather_desc
            .first()
            .map(|desc| desc.value.trim())
            .ok_or_else(|| parse_error("missing weatherDesc".to_string()))?;

        Ok(format!(
            "{city} current weather: {description}, {}C",
            current.temp_c
        ))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Look up the current weather of the given city."
    }

    fn parameters(&self) -> &[&str] {
        &["city"]
    }

    async fn execute(&self, args: &ToolArguments) -> Result<String, ToolError> {
        let city = args
            .get("city")
            .map(|city| city.trim())
            .filter(|city| !city.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("city must not be empty".to_string()))?;

        let url = self.city_url(city)?;
        log::debug!("Querying weather for '{}' at {}", city, url);

        let network_error = |error: reqwest::Error| {
            ToolError::Execution(format!(
                "network problem while querying the weather - {error}"
            ))
        };

        let body = self
            .client
            .get(url)
            .query(&[("format", "j1")])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(network_error)?
            .text()
            .await
            .map_err(network_error)?;

        Self::summarize(city, &body)
    }
}
