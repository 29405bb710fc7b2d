use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fmt, fs, path::Path, time::Duration};

use crate::provider::{viacep, weatherapi};

/// Settings of the edge validator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub port: u16,

    /// Base URL of the lookup orchestrator.
    pub orchestrator_url: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            orchestrator_url: "http://service-b:8082/".to_owned(),
        }
    }
}

/// Settings of the lookup orchestrator.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub port: u16,

    /// WeatherAPI.com key. Only required when `test_mode` is off.
    pub weather_api_key: Option<String>,

    /// Report a fixed 25 °C instead of calling the temperature provider.
    pub test_mode: bool,

    /// Treat every CEP as unknown without calling the city resolver.
    pub simulate_cep_not_found: bool,

    /// City resolver URL; `{cep}` is replaced with the code.
    pub city_resolver_url: String,

    pub weather_api_url: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            port: 8082,
            weather_api_key: None,
            test_mode: false,
            simulate_cep_not_found: false,
            city_resolver_url: viacep::DEFAULT_URL_TEMPLATE.to_owned(),
            weather_api_url: weatherapi::DEFAULT_URL.to_owned(),
        }
    }
}

impl fmt::Debug for OrchestratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrchestratorConfig")
            .field("port", &self.port)
            .field("weather_api_key", &self.weather_api_key.as_ref().map(|_| "<redacted>"))
            .field("test_mode", &self.test_mode)
            .field("simulate_cep_not_found", &self.simulate_cep_not_found)
            .field("city_resolver_url", &self.city_resolver_url)
            .field("weather_api_url", &self.weather_api_url)
            .finish()
    }
}

/// Span export settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,

    /// OTLP/HTTP traces endpoint of the collector.
    pub collector_endpoint: String,

    /// Overrides the per-service default name.
    pub service_name: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            collector_endpoint: "http://otel-collector:4318/v1/traces".to_owned(),
            service_name: None,
        }
    }
}

/// Process-wide configuration, read once at startup.
///
/// Example TOML:
/// ```toml
/// http_timeout_secs = 5
///
/// [orchestrator]
/// test_mode = true
///
/// [telemetry]
/// collector_endpoint = "http://localhost:4318/v1/traces"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub edge: EdgeConfig,
    pub orchestrator: OrchestratorConfig,
    pub telemetry: TelemetryConfig,

    /// Timeout for every outbound HTTP call.
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            edge: EdgeConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            telemetry: TelemetryConfig::default(),
            http_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load defaults, then the optional TOML file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        cfg.apply_env_with(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env_with<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = var("PORT") {
            let port: u16 = port.trim().parse().with_context(|| format!("Invalid PORT '{port}'"))?;
            self.edge.port = port;
            self.orchestrator.port = port;
        }

        if let Some(url) = var("ORCHESTRATOR_URL") {
            self.edge.orchestrator_url = url;
        }

        if let Some(key) = var("WEATHER_API_KEY") {
            self.orchestrator.weather_api_key = Some(key).filter(|k| !k.is_empty());
        }

        if let Some(flag) = var("TEST_MODE") {
            self.orchestrator.test_mode = parse_flag(&flag);
        }

        if let Some(flag) = var("SIMULATE_CEP_NOT_FOUND") {
            self.orchestrator.simulate_cep_not_found = parse_flag(&flag);
        }

        if let Some(url) = var("CITY_RESOLVER_URL") {
            self.orchestrator.city_resolver_url = url;
        }

        if let Some(url) = var("WEATHER_API_URL") {
            self.orchestrator.weather_api_url = url;
        }

        if let Some(endpoint) = var("OTEL_EXPORTER_OTLP_ENDPOINT") {
            self.telemetry.collector_endpoint = endpoint;
        }

        if let Some(name) = var("OTEL_SERVICE_NAME") {
            self.telemetry.service_name = Some(name).filter(|n| !n.is_empty());
        }

        if let Some(flag) = var("OTEL_SDK_DISABLED") {
            self.telemetry.enabled = !parse_flag(&flag);
        }

        if let Some(secs) = var("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid HTTP_TIMEOUT_SECS '{secs}'"))?;
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}
