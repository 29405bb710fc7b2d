//! Core library for the CEP weather services.
//!
//! This crate defines:
//! - Configuration loading (defaults, TOML file, environment)
//! - CEP validation and the request/response models
//! - Unit conversion and accent stripping helpers
//! - Abstractions over the city resolver and temperature provider
//! - The lookup orchestrator and the client the edge uses to reach it
//!
//! It is used by the `cep-weather` binary, which serves both the edge validator
//! and the lookup orchestrator over HTTP.

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod trace;

pub use client::{HttpOrchestratorClient, OrchestratorClient};
pub use config::{Config, EdgeConfig, OrchestratorConfig, TelemetryConfig};
pub use error::{ForwardError, InvalidCep, LookupError, TemperatureError};
pub use model::{Cep, CepRequest, WeatherResult};
pub use provider::{CityResolver, TemperatureProvider};
pub use service::WeatherService;
pub use trace::TraceContext;
