//! Pieces shared by the edge and orchestrator routers.

use axum::{
    Json, Router,
    handler::Handler,
    routing::{get, post},
};
use cep_weather_core::CepRequest;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// Liveness probe; independent of any downstream service.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Decode `{"cep": "..."}` regardless of the declared content type.
pub fn parse_cep_request(body: &[u8]) -> Result<CepRequest, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::debug!("rejecting request body: {err}");
        ApiError::BadRequest
    })
}

/// `POST /` served by `handler`, any other method on `/` answered with 405,
/// plus `GET /health`.
pub fn service_router<H, T, S>(handler: H) -> Router<S>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(handler).fallback(method_not_allowed))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cep_field() {
        let req = parse_cep_request(br#"{"cep":"29902555"}"#).unwrap();
        assert_eq!(req.cep, "29902555");
    }

    #[test]
    fn ignores_unknown_fields() {
        let req = parse_cep_request(br#"{"cep":"29902555","extra":1}"#).unwrap();
        assert_eq!(req.cep, "29902555");
    }

    #[test]
    fn malformed_bodies_are_bad_requests() {
        let bodies: [&[u8]; 4] = [b"", b"cep=29902555", b"{\"cep\":", b"{\"cep\":29902555}"];
        for body in bodies {
            assert_eq!(parse_cep_request(body).unwrap_err(), ApiError::BadRequest);
        }
    }
}
