//! HTTP error responses shared by both services.
//!
//! Every error body is plain text. Internal causes are logged where they occur
//! and never written to the response.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cep_weather_core::{ForwardError, InvalidCep, LookupError};

pub const INVALID_ZIPCODE: &str = "invalid zipcode";
pub const ZIPCODE_NOT_FOUND: &str = "can not find zipcode";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 405 - only POST is served on `/`
    MethodNotAllowed,
    /// 400 - body is not `{"cep": "<string>"}`
    BadRequest,
    /// 422 - CEP is not exactly 8 digits
    InvalidCep,
    /// 404 - the CEP could not be resolved to a city
    NotFound,
    /// 500 - generic message only
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::InvalidCep => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::BadRequest => "invalid request format",
            ApiError::InvalidCep => INVALID_ZIPCODE,
            ApiError::NotFound => ZIPCODE_NOT_FOUND,
            ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

impl From<InvalidCep> for ApiError {
    fn from(_: InvalidCep) -> Self {
        ApiError::InvalidCep
    }
}

/// Unreadable or oversized bodies are malformed requests, not 413s.
impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::debug!("rejected request body: {rejection}");
        ApiError::BadRequest
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidCep(_) => ApiError::InvalidCep,
            LookupError::CityNotFound(_) => ApiError::NotFound,
            LookupError::Temperature(_) => ApiError::Internal("Error getting temperature"),
        }
    }
}

impl From<ForwardError> for ApiError {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::NotFound => ApiError::NotFound,
            ForwardError::InvalidCep => ApiError::InvalidCep,
            ForwardError::Upstream { .. } | ForwardError::Transport(_) => {
                ApiError::Internal("Error calling orchestrator")
            }
        }
    }
}
