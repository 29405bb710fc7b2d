use crate::{
    Cep, OrchestratorConfig, TraceContext,
    error::TemperatureError,
    provider::{viacep::ViaCepResolver, weatherapi::WeatherApiProvider},
};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod viacep;
pub mod weatherapi;

/// Temperature reported in test mode, in Celsius.
pub const TEST_MODE_CELSIUS: f64 = 25.0;

/// Maps a CEP to the name of its city.
///
/// Every error, whether transport failure or an unknown code, is treated by the
/// caller as "not found".
#[async_trait]
pub trait CityResolver: Send + Sync + Debug {
    async fn resolve_city(&self, cx: &TraceContext, cep: &Cep) -> anyhow::Result<String>;
}

/// Maps a city name to its current temperature in Celsius.
#[async_trait]
pub trait TemperatureProvider: Send + Sync + Debug {
    async fn current_celsius(&self, cx: &TraceContext, city: &str)
    -> Result<f64, TemperatureError>;
}

/// Resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownCityResolver;

#[async_trait]
impl CityResolver for UnknownCityResolver {
    async fn resolve_city(&self, _cx: &TraceContext, cep: &Cep) -> anyhow::Result<String> {
        Err(anyhow!("CEP {cep} not found (simulated)"))
    }
}

/// Provider that always reports the same reading without any I/O.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTemperature(pub f64);

impl Default for FixedTemperature {
    fn default() -> Self {
        Self(TEST_MODE_CELSIUS)
    }
}

#[async_trait]
impl TemperatureProvider for FixedTemperature {
    async fn current_celsius(
        &self,
        _cx: &TraceContext,
        city: &str,
    ) -> Result<f64, TemperatureError> {
        tracing::debug!(%city, celsius = self.0, "using fixed temperature");
        Ok(self.0)
    }
}

/// Build the shared outbound HTTP client.
pub fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Construct the city resolver selected by config.
pub fn city_resolver_from_config(
    config: &OrchestratorConfig,
    http: Client,
) -> Arc<dyn CityResolver> {
    if config.simulate_cep_not_found {
        tracing::warn!("simulating CEP not found for every request");
        return Arc::new(UnknownCityResolver);
    }

    Arc::new(ViaCepResolver::new(config.city_resolver_url.clone(), http))
}

/// Construct the temperature provider selected by config.
///
/// A missing API key is not rejected here; the provider reports it per request.
pub fn temperature_provider_from_config(
    config: &OrchestratorConfig,
    http: Client,
) -> Arc<dyn TemperatureProvider> {
    if config.test_mode {
        tracing::info!(celsius = TEST_MODE_CELSIUS, "test mode: temperature provider disabled");
        return Arc::new(FixedTemperature::default());
    }

    Arc::new(WeatherApiProvider::new(
        config.weather_api_key.clone(),
        config.weather_api_url.clone(),
        http,
    ))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_owned(),
    }
}
