use std::fmt;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{TraceContext, convert::strip_accents, error::TemperatureError, provider::truncate_body};

use super::TemperatureProvider;

/// Default WeatherAPI.com current-conditions endpoint.
pub const DEFAULT_URL: &str = "http://api.weatherapi.com/v1/current.json";

/// Temperature provider backed by WeatherAPI.com.
#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: Option<String>,
    url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: Option<String>, url: String, http: Client) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        Self { api_key, url, http }
    }
}

impl fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[async_trait]
impl TemperatureProvider for WeatherApiProvider {
    async fn current_celsius(
        &self,
        cx: &TraceContext,
        city: &str,
    ) -> Result<f64, TemperatureError> {
        let api_key = self.api_key.as_deref().ok_or(TemperatureError::MissingApiKey)?;

        // The query endpoint does not reliably match accented names.
        let query = strip_accents(city);
        tracing::info!(%city, %query, "querying temperature provider");

        let res = self
            .http
            .get(&self.url)
            .headers(cx.headers())
            .query(&[("key", api_key), ("q", query.as_str()), ("aqi", "no")])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com (current)")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read WeatherAPI current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "WeatherAPI current request failed with status {}: {}",
                status,
                truncate_body(&body),
            )
            .into());
        }

        let parsed: WaResponse =
            serde_json::from_str(&body).context("Failed to parse WeatherAPI current JSON")?;

        Ok(parsed.current.temp_c)
    }
}
