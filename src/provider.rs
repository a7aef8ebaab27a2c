//! Weather provider abstraction and the OpenWeatherMap implementation.
//!
//! [`OpenWeatherMapProvider`] calls the current-weather endpoint:
//!
//! ```text
//! GET {base_url}/data/2.5/weather?q={city}&appid={key}
//! ```
//!
//! and extracts `name`, `main.temp`, `main.feels_like`, `weather[0].main`
//! and `dt`. Temperatures are returned in Kelvin, untouched.
//!
//! # Failure policy
//!
//! Network errors, non-2xx statuses and malformed payloads are all returned
//! as errors; there is no retry. Requests are bounded by the configured
//! timeout. Error messages never include the request URL, which carries the
//! API key.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::models::Observation;

/// A source of current weather observations.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provider identifier used in logs.
    fn name(&self) -> &str;

    /// Fetch the current observation for `city`.
    async fn current(&self, city: &str) -> Result<Observation>;
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    main: MainBlock,
    weather: Vec<ConditionBlock>,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    main: String,
}

/// Parse a current-weather JSON body into an [`Observation`].
pub fn parse_current_weather(body: &str) -> Result<Observation> {
    let resp: CurrentWeatherResponse =
        serde_json::from_str(body).context("Invalid weather response")?;

    let condition = resp
        .weather
        .into_iter()
        .next()
        .map(|w| w.main)
        .ok_or_else(|| anyhow!("Invalid weather response: empty weather array"))?;

    Ok(Observation {
        name: resp.name,
        temp_kelvin: resp.main.temp,
        feels_like_kelvin: resp.main.feels_like,
        condition,
        observed_at: resp.dt,
    })
}

/// Client for the OpenWeatherMap current-weather API.
pub struct OpenWeatherMapProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherMapProvider {
    /// Create a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client
    /// cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapProvider {
    fn name(&self) -> &str {
        "openweathermap"
    }

    async fn current(&self, city: &str) -> Result<Observation> {
        let response = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| anyhow!("OpenWeatherMap request failed: {}", e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("OpenWeatherMap body read failed: {}", e.without_url()))?;

        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            bail!("OpenWeatherMap API error {}: {}", status, snippet);
        }

        parse_current_weather(&body)
    }
}
