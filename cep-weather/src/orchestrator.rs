//! Lookup orchestrator: re-validates the CEP, then runs the city and
//! temperature lookups.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::HeaderMap,
};
use cep_weather_core::{TraceContext, WeatherResult, WeatherService};
use tracing::{Instrument, Span, field, info_span};

use crate::{
    error::ApiError,
    routes::{parse_cep_request, service_router},
};

pub fn router(service: Arc<WeatherService>) -> Router {
    service_router(handle_weather_request).with_state(service)
}

async fn handle_weather_request(
    State(service): State<Arc<WeatherService>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<WeatherResult>, ApiError> {
    let body = body?;
    let span = info_span!("handle-weather-request", cep = field::Empty);
    let cx = TraceContext::extract(&headers).child(&span);

    lookup(&service, &cx, &body).instrument(span).await
}

async fn lookup(
    service: &WeatherService,
    cx: &TraceContext,
    body: &[u8],
) -> Result<Json<WeatherResult>, ApiError> {
    let request = parse_cep_request(body)?;
    Span::current().record("cep", request.cep.as_str());

    let result = service.weather_for(cx, &request.cep).await?;
    Ok(Json(result))
}
