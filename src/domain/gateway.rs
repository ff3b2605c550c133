use {
    derive_more::Display,
    serde::{Deserialize, Serialize},
    std::time::Duration,
    thiserror::Error,
};

/// Machine-readable rejection codes the gateway returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    #[display("invalid_request")]
    InvalidRequest,
    #[display("not_supported")]
    NotSupported,
    #[display("invalid_credentials")]
    InvalidCredentials,
    #[display("forbidden")]
    Forbidden,
    #[display("not_found")]
    NotFound,
    #[display("too_many_requests")]
    TooManyRequests,
    #[display("internal_server_error")]
    InternalServerError,
    #[serde(other)]
    #[display("unknown")]
    Unknown,
}

/// Structured business-level rejection, propagated verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error(
    "code: {code} param: {} desc: {description} (id: {id})",
    .parameter.as_deref().unwrap_or("")
)]
pub struct GatewayError {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub code: ErrorCode,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/// "Accepted, not done yet": poll again after `retry_after` milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Processing {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    pub retry_after: u64,
}

impl Processing {
    pub fn retry_after_duration(&self) -> Duration {
        Duration::from_millis(self.retry_after)
    }
}

/// Successful result of one gateway round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    Processing(Processing),
}

impl<T> Outcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(resource) => Some(resource),
            Self::Processing(_) => None,
        }
    }

    pub fn processing(&self) -> Option<&Processing> {
        match self {
            Self::Ready(_) => None,
            Self::Processing(p) => Some(p),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
