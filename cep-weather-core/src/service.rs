//! The lookup orchestrator: CEP → city → temperature → result.

use std::sync::Arc;

use anyhow::anyhow;
use reqwest::Client;
use tracing::{Instrument, Span, field, info_span};

use crate::{
    Cep, OrchestratorConfig, TraceContext, WeatherResult,
    error::LookupError,
    provider::{self, CityResolver, TemperatureProvider},
};

/// Runs the two sequential lookups behind injected capabilities.
#[derive(Debug, Clone)]
pub struct WeatherService {
    resolver: Arc<dyn CityResolver>,
    temperature: Arc<dyn TemperatureProvider>,
}

impl WeatherService {
    pub fn new(resolver: Arc<dyn CityResolver>, temperature: Arc<dyn TemperatureProvider>) -> Self {
        Self { resolver, temperature }
    }

    /// Wire the live (or test-mode) lookups selected by config.
    pub fn from_config(config: &OrchestratorConfig, http: Client) -> Self {
        Self::new(
            provider::city_resolver_from_config(config, http.clone()),
            provider::temperature_provider_from_config(config, http),
        )
    }

    /// Validate `raw_cep`, resolve its city, then fetch that city's temperature.
    ///
    /// Any resolver failure becomes [`LookupError::CityNotFound`] and the
    /// temperature provider is then never called.
    pub async fn weather_for(
        &self,
        cx: &TraceContext,
        raw_cep: &str,
    ) -> Result<WeatherResult, LookupError> {
        let cep = Cep::parse(raw_cep)?;
        let city = self.resolve_city(cx, &cep).await?;
        let temp_c = self.current_celsius(cx, &city).await?;

        Ok(WeatherResult::from_celsius(city, temp_c))
    }

    async fn resolve_city(&self, cx: &TraceContext, cep: &Cep) -> Result<String, LookupError> {
        let span = info_span!("get-city-by-cep", cep = %cep, city = field::Empty);
        let cx = cx.child(&span);

        async {
            match self.resolver.resolve_city(&cx, cep).await {
                Ok(city) if !city.trim().is_empty() => {
                    Span::current().record("city", city.as_str());
                    tracing::info!(%city, "city resolved");
                    Ok(city)
                }
                Ok(_) => {
                    tracing::warn!("city resolver returned an empty city name");
                    Err(LookupError::CityNotFound(anyhow!("empty city name for CEP {cep}")))
                }
                Err(err) => {
                    tracing::warn!("city resolution failed: {err:#}");
                    Err(LookupError::CityNotFound(err))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn current_celsius(&self, cx: &TraceContext, city: &str) -> Result<f64, LookupError> {
        let span = info_span!("get-temperature", city = %city, temperature_c = field::Empty);
        let cx = cx.child(&span);

        async {
            match self.temperature.current_celsius(&cx, city).await {
                Ok(celsius) => {
                    Span::current().record("temperature_c", celsius);
                    Ok(celsius)
                }
                Err(err) => {
                    tracing::error!("temperature lookup failed: {err:#}");
                    Err(err.into())
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::TemperatureError,
        provider::{FixedTemperature, UnknownCityResolver},
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct StaticCity(&'static str);

    #[async_trait]
    impl CityResolver for StaticCity {
        async fn resolve_city(&self, _cx: &TraceContext, _cep: &Cep) -> anyhow::Result<String> {
            Ok(self.0.to_owned())
        }
    }

    #[derive(Debug, Default)]
    struct CountingTemperature {
        calls: AtomicUsize,
        seen: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TemperatureProvider for CountingTemperature {
        async fn current_celsius(
            &self,
            _cx: &TraceContext,
            city: &str,
        ) -> Result<f64, TemperatureError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(city.to_owned());
            Ok(0.0)
        }
    }

    #[derive(Debug)]
    struct FailingTemperature;

    #[async_trait]
    impl TemperatureProvider for FailingTemperature {
        async fn current_celsius(
            &self,
            _cx: &TraceContext,
            _city: &str,
        ) -> Result<f64, TemperatureError> {
            Err(anyhow!("connection refused").into())
        }
    }

    fn cx() -> TraceContext {
        TraceContext::default()
    }

    #[tokio::test]
    async fn composes_result_in_test_mode() {
        let service =
            WeatherService::new(Arc::new(StaticCity("Linhares")), Arc::new(FixedTemperature::default()));

        let result = service.weather_for(&cx(), "29902555").await.unwrap();

        assert_eq!(result.city, "Linhares");
        assert_eq!(result.temp_c, 25.0);
        assert_eq!(result.temp_f, 77.0);
        assert_eq!(result.temp_k, 298.0);
    }

    #[tokio::test]
    async fn passes_resolved_city_to_temperature_provider() {
        let temperature = Arc::new(CountingTemperature::default());
        let service = WeatherService::new(Arc::new(StaticCity("São Paulo")), temperature.clone());

        let result = service.weather_for(&cx(), "01001000").await.unwrap();

        assert_eq!(result.city, "São Paulo");
        assert_eq!(result.temp_f, 32.0);
        assert_eq!(result.temp_k, 273.0);
        assert_eq!(*temperature.seen.lock().unwrap(), vec!["São Paulo".to_owned()]);
    }

    #[tokio::test]
    async fn invalid_cep_stops_before_any_lookup() {
        let temperature = Arc::new(CountingTemperature::default());
        let service = WeatherService::new(Arc::new(UnknownCityResolver), temperature.clone());

        for raw in ["", "1234567", "123456789", "abcdefgh", "29902-55"] {
            let err = service.weather_for(&cx(), raw).await.unwrap_err();
            assert!(matches!(err, LookupError::InvalidCep(_)), "{raw:?}");
            assert_eq!(err.to_string(), "invalid zipcode");
        }

        assert_eq!(temperature.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unresolved_city_never_reaches_temperature_provider() {
        let temperature = Arc::new(CountingTemperature::default());
        let service = WeatherService::new(Arc::new(UnknownCityResolver), temperature.clone());

        let err = service.weather_for(&cx(), "29902555").await.unwrap_err();

        assert!(matches!(err, LookupError::CityNotFound(_)));
        assert_eq!(err.to_string(), "can not find zipcode");
        assert_eq!(temperature.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_city_counts_as_not_found() {
        let temperature = Arc::new(CountingTemperature::default());
        let service = WeatherService::new(Arc::new(StaticCity("")), temperature.clone());

        let err = service.weather_for(&cx(), "29902555").await.unwrap_err();

        assert!(matches!(err, LookupError::CityNotFound(_)));
        assert_eq!(temperature.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn temperature_failure_is_not_a_not_found() {
        let service = WeatherService::new(Arc::new(StaticCity("Linhares")), Arc::new(FailingTemperature));

        let err = service.weather_for(&cx(), "29902555").await.unwrap_err();

        assert!(matches!(err, LookupError::Temperature(TemperatureError::Lookup(_))));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_temperature_error() {
        let config = OrchestratorConfig::default();
        let service = WeatherService::new(
            Arc::new(StaticCity("Linhares")),
            provider::temperature_provider_from_config(&config, Client::new()),
        );

        let err = service.weather_for(&cx(), "29902555").await.unwrap_err();

        assert!(matches!(err, LookupError::Temperature(TemperatureError::MissingApiKey)));
    }

    #[tokio::test]
    async fn simulated_not_found_from_config() {
        let config = OrchestratorConfig {
            test_mode: true,
            simulate_cep_not_found: true,
            ..OrchestratorConfig::default()
        };
        let service = WeatherService::from_config(&config, Client::new());

        let err = service.weather_for(&cx(), "29902555").await.unwrap_err();
        assert!(matches!(err, LookupError::CityNotFound(_)));
    }
}
