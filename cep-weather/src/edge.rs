//! Edge validator: checks the CEP shape and delegates to the orchestrator.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::HeaderMap,
};
use cep_weather_core::{Cep, ForwardError, OrchestratorClient, TraceContext, WeatherResult};
use tracing::{Instrument, Span, field, info_span};

use crate::{
    error::ApiError,
    routes::{parse_cep_request, service_router},
};

#[derive(Debug, Clone)]
pub struct EdgeState {
    orchestrator: Arc<dyn OrchestratorClient>,
}

pub fn router(orchestrator: Arc<dyn OrchestratorClient>) -> Router {
    service_router(handle_cep_request).with_state(EdgeState { orchestrator })
}

async fn handle_cep_request(
    State(state): State<EdgeState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<WeatherResult>, ApiError> {
    let body = body?;
    let span = info_span!("handle-cep-request", cep = field::Empty);
    let cx = TraceContext::extract(&headers).child(&span);

    forward(state.orchestrator.as_ref(), &cx, &body).instrument(span).await
}

async fn forward(
    orchestrator: &dyn OrchestratorClient,
    cx: &TraceContext,
    body: &[u8],
) -> Result<Json<WeatherResult>, ApiError> {
    let request = parse_cep_request(body)?;
    Span::current().record("cep", request.cep.as_str());

    let cep = Cep::parse(&request.cep)?;

    match orchestrator.weather_for(cx, &cep).await {
        Ok(result) => Ok(Json(result)),
        Err(err @ (ForwardError::NotFound | ForwardError::InvalidCep)) => Err(err.into()),
        Err(err) => {
            tracing::error!("orchestrator call failed: {:#}", anyhow::Error::new(err));
            Err(ApiError::Internal("Error calling orchestrator"))
        }
    }
}
