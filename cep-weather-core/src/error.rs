use reqwest::StatusCode;

/// The CEP is not exactly 8 ASCII digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid zipcode")]
pub struct InvalidCep;

/// Failure of a temperature lookup.
#[derive(Debug, thiserror::Error)]
pub enum TemperatureError {
    #[error("no API key configured for the temperature provider")]
    MissingApiKey,

    #[error(transparent)]
    Lookup(#[from] anyhow::Error),
}

/// Failure of the orchestrator pipeline, one variant per response class.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    InvalidCep(#[from] InvalidCep),

    /// Any city resolver failure, including transport errors.
    #[error("can not find zipcode")]
    CityNotFound(#[source] anyhow::Error),

    #[error("temperature lookup failed: {0}")]
    Temperature(#[from] TemperatureError),
}

/// Failure while forwarding a CEP from the edge to the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("orchestrator could not find the zipcode")]
    NotFound,

    #[error("orchestrator rejected the zipcode")]
    InvalidCep,

    #[error("orchestrator returned status {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("failed to reach the orchestrator")]
    Transport(#[source] anyhow::Error),
}
