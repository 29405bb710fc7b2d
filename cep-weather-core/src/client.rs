//! Client the edge validator uses to reach the lookup orchestrator.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt::Debug;
use tracing::{Instrument, Span, field, info_span};

use crate::{
    Cep, CepRequest, TraceContext, WeatherResult, error::ForwardError, provider::truncate_body,
};

/// Forwards a validated CEP downstream and reports the outcome.
#[async_trait]
pub trait OrchestratorClient: Send + Sync + Debug {
    async fn weather_for(&self, cx: &TraceContext, cep: &Cep)
    -> Result<WeatherResult, ForwardError>;
}

/// [`OrchestratorClient`] speaking JSON over HTTP, carrying `traceparent`.
#[derive(Debug, Clone)]
pub struct HttpOrchestratorClient {
    base_url: String,
    http: Client,
}

impl HttpOrchestratorClient {
    pub fn new(base_url: String, http: Client) -> Self {
        Self { base_url, http }
    }

    async fn post(&self, cx: &TraceContext, cep: &Cep) -> Result<WeatherResult, ForwardError> {
        let res = self
            .http
            .post(&self.base_url)
            .headers(cx.headers())
            .json(&CepRequest::new(cep.as_str()))
            .send()
            .await
            .context("Failed to send request to orchestrator")
            .map_err(ForwardError::Transport)?;

        let status = res.status();
        Span::current().record("http.status_code", status.as_u16());

        let body = res
            .text()
            .await
            .context("Failed to read orchestrator response body")
            .map_err(ForwardError::Transport)?;

        match status {
            StatusCode::NOT_FOUND => Err(ForwardError::NotFound),
            StatusCode::UNPROCESSABLE_ENTITY => Err(ForwardError::InvalidCep),
            StatusCode::OK => serde_json::from_str(&body)
                .context("Failed to parse orchestrator JSON")
                .map_err(ForwardError::Transport),
            s => Err(ForwardError::Upstream { status: s, body: truncate_body(&body) }),
        }
    }
}

#[async_trait]
impl OrchestratorClient for HttpOrchestratorClient {
    async fn weather_for(
        &self,
        cx: &TraceContext,
        cep: &Cep,
    ) -> Result<WeatherResult, ForwardError> {
        let span = info_span!("call-orchestrator", cep = %cep, http.status_code = field::Empty);
        let cx = cx.child(&span);

        self.post(&cx, cep).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TRACEPARENT;
    use httpmock::prelude::*;
    use opentelemetry::{global, trace::TracerProvider as _};
    use opentelemetry_sdk::{propagation::TraceContextPropagator, trace::SdkTracerProvider};
    use reqwest::header::{HeaderMap, HeaderValue};
    use serde_json::json;
    use tracing_subscriber::layer::SubscriberExt as _;

    const PARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn client(server: &MockServer) -> HttpOrchestratorClient {
        HttpOrchestratorClient::new(format!("{}/", server.base_url()), Client::new())
    }

    fn cep() -> Cep {
        Cep::parse("29902555").unwrap()
    }

    async fn respond(status: u16, body: &str) -> Result<WeatherResult, ForwardError> {
        let server = MockServer::start_async().await;
        let body = body.to_owned();
        server
            .mock_async(move |when, then| {
                when.method(Method::POST).path("/");
                then.status(status).body(body);
            })
            .await;

        client(&server).weather_for(&TraceContext::default(), &cep()).await
    }

    #[tokio::test]
    async fn posts_cep_and_decodes_result() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(Method::POST).path("/").json_body(json!({ "cep": "29902555" }));
                then.status(200).json_body(json!({
                    "city": "Linhares", "temp_C": 25, "temp_F": 77, "temp_K": 298
                }));
            })
            .await;

        let result = client(&server).weather_for(&TraceContext::default(), &cep()).await.unwrap();

        m.assert_async().await;
        assert_eq!(result, WeatherResult::from_celsius("Linhares", 25.0));
    }

    #[tokio::test]
    async fn carries_caller_trace_into_traceparent_header() {
        global::set_text_map_propagator(TraceContextPropagator::new());
        let provider = SdkTracerProvider::builder().build();
        let subscriber = tracing_subscriber::registry()
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer("client-tests")));
        let _guard = tracing::subscriber::set_default(subscriber);

        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(Method::POST)
                    .path("/")
                    .header_exists(TRACEPARENT)
                    .header_prefix(TRACEPARENT, "00-4bf92f3577b34da6a3ce929d0e0e4736-")
                    .header_excludes(TRACEPARENT, "00f067aa0ba902b7");
                then.status(200).json_body(json!({
                    "city": "Linhares", "temp_C": 25, "temp_F": 77, "temp_K": 298
                }));
            })
            .await;

        let mut inbound = HeaderMap::new();
        inbound.insert(TRACEPARENT, HeaderValue::from_static(PARENT));
        let cx = TraceContext::extract(&inbound);

        client(&server).weather_for(&cx, &cep()).await.unwrap();

        m.assert_async().await;
    }

    #[tokio::test]
    async fn maps_not_found() {
        let err = respond(404, "can not find zipcode").await.unwrap_err();
        assert!(matches!(err, ForwardError::NotFound));
    }

    #[tokio::test]
    async fn maps_unprocessable() {
        let err = respond(422, "invalid zipcode").await.unwrap_err();
        assert!(matches!(err, ForwardError::InvalidCep));
    }

    #[tokio::test]
    async fn other_failures_are_upstream_errors() {
        let err = respond(500, "Error getting temperature").await.unwrap_err();

        match err {
            ForwardError::Upstream { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "Error getting temperature");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn only_200_counts_as_success() {
        let body = r#"{"city":"Linhares","temp_C":25,"temp_F":77,"temp_K":298}"#;
        let err = respond(201, body).await.unwrap_err();

        assert!(
            matches!(err, ForwardError::Upstream { status, .. } if status == StatusCode::CREATED)
        );
    }

    #[tokio::test]
    async fn undecodable_success_is_a_transport_error() {
        let err = respond(200, "not json").await.unwrap_err();
        assert!(matches!(err, ForwardError::Transport(_)));
    }

    #[tokio::test]
    async fn unreachable_orchestrator_is_a_transport_error() {
        let client = HttpOrchestratorClient::new("http://127.0.0.1:1/".into(), Client::new());

        let err = client.weather_for(&TraceContext::default(), &cep()).await.unwrap_err();
        assert!(matches!(err, ForwardError::Transport(_)));
    }
}
