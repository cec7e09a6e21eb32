//! Response envelope — the uniform success/failure wrapper around a fetch.
//!
//! The outcome set is closed: a fetch either produced a JSON payload or it
//! failed for a typed reason. Failure details are rendered from the cause, so a
//! detail string can never be mistaken for the outcome discriminator.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Outcome discriminator of a [`ResponseEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchStatus {
    Success,
    Failed,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Success => write!(f, "Success"),
            FetchStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Why a fetch did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureCause {
    /// The server answered with something other than HTTP 200.
    #[error("failed with status code: {code}")]
    Status { code: u16 },

    /// DNS, connect, timeout or other transport-level error.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// HTTP 200 but the body was not valid JSON.
    #[error("undecodable response body: {message}")]
    Decode { message: String },
}

/// Result of one fetch: `Success` always carries a payload, `Failed` never does.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum ResponseEnvelope {
    Success { payload: Value },
    Failed { cause: FailureCause },
}

impl ResponseEnvelope {
    pub fn success(payload: Value) -> Self {
        ResponseEnvelope::Success { payload }
    }

    pub fn failed(cause: FailureCause) -> Self {
        ResponseEnvelope::Failed { cause }
    }

    pub fn status(&self) -> FetchStatus {
        match self {
            ResponseEnvelope::Success { .. } => FetchStatus::Success,
            ResponseEnvelope::Failed { .. } => FetchStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseEnvelope::Success { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            ResponseEnvelope::Success { payload } => Some(payload),
            ResponseEnvelope::Failed { .. } => None,
        }
    }

    pub fn into_payload(self) -> Option<Value> {
        match self {
            ResponseEnvelope::Success { payload } => Some(payload),
            ResponseEnvelope::Failed { .. } => None,
        }
    }

    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            ResponseEnvelope::Success { .. } => None,
            ResponseEnvelope::Failed { cause } => Some(cause),
        }
    }

    /// Human-readable failure detail (`None` on success).
    pub fn detail(&self) -> Option<String> {
        self.cause().map(|c| c.to_string())
    }
}
