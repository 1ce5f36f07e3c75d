//! Error taxonomy shared by the gateway and the resolver.
//!
//! Every failure is terminal for its request and maps to exactly one status
//! code and one short plain-text body. The gateway relays resolver bodies
//! untouched, so both services speak the same contract.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Request-level errors, one per HTTP outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Client-supplied body or postal code is malformed.
    #[error("invalid zipcode")]
    InvalidInput,

    /// Directory lookup failed or rejected the postal code.
    #[error("invalid zipcode")]
    InvalidZipCode,

    /// Locality was resolved but the weather lookup failed.
    #[error("can not find zipcode")]
    CityNotFound,

    /// The next hop could not be reached (refused, DNS, timeout).
    #[error("error contacting resolver")]
    UpstreamUnreachable,

    /// The next hop answered but its body could not be read.
    #[error("error reading response")]
    UpstreamReadError,

    /// Wrong HTTP verb for the endpoint.
    #[error("invalid method")]
    MethodNotAllowed,
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::InvalidInput | PipelineError::InvalidZipCode => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PipelineError::CityNotFound => StatusCode::NOT_FOUND,
            PipelineError::UpstreamUnreachable | PipelineError::UpstreamReadError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PipelineError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Failure talking to an external lookup collaborator.
///
/// Carries the detail for logs; the resolver collapses it into the
/// [`PipelineError`] of the step that failed.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("lookup rejected: {0}")]
    Rejected(String),
}

impl LookupError {
    /// Short label used as a metrics dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            LookupError::Transport(_) => "transport",
            LookupError::Timeout => "timeout",
            LookupError::Status(_) => "status",
            LookupError::Decode(_) => "decode",
            LookupError::Rejected(_) => "rejected",
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Timeout
        } else if e.is_decode() {
            LookupError::Decode(e.to_string())
        } else {
            LookupError::Transport(e)
        }
    }
}
