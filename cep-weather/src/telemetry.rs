//! Logging and span export bootstrap.

use anyhow::{Context, bail};
use cep_weather_core::TelemetryConfig;
use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::{Resource, propagation::TraceContextPropagator, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Owns the tracer provider; flushes and shuts it down once when dropped.
#[must_use = "dropping the guard shuts span export down"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(err) = provider.shutdown()
        {
            tracing::warn!("failed to shut down tracer provider: {err}");
        }
    }
}

/// Install the global subscriber (fmt + `RUST_LOG` filter) and, when enabled,
/// an OTLP/HTTP span exporter with W3C trace context propagation.
pub fn init(cfg: &TelemetryConfig, default_service_name: &str) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer());

    if !cfg.enabled {
        registry.try_init().context("Failed to install tracing subscriber")?;
        tracing::info!("span export disabled");
        return Ok(TelemetryGuard { provider: None });
    }

    if cfg.collector_endpoint.trim().is_empty() {
        bail!("No trace collector endpoint configured (OTEL_EXPORTER_OTLP_ENDPOINT)");
    }

    let service_name = cfg.service_name.as_deref().unwrap_or(default_service_name).to_owned();

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(cfg.collector_endpoint.clone())
        .build()
        .context("Failed to build OTLP span exporter")?;

    let resource = Resource::builder_empty()
        .with_attributes([
            KeyValue::new("service.name", service_name.clone()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    global::set_text_map_propagator(TraceContextPropagator::new());

    let tracer = provider.tracer(service_name.clone());
    registry
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(%service_name, endpoint = %cfg.collector_endpoint, "span export enabled");
    Ok(TelemetryGuard { provider: Some(provider) })
}
