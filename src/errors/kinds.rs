//! Error types handlers raise to pick a response rule.

use thiserror::Error;

/// Request rejected as malformed.
///
/// The response message is the reason declared on the type, not the detail
/// carried by an individual value.
#[derive(Debug, Clone, Default, Error)]
#[error("{}", .detail.as_deref().unwrap_or(Self::REASON))]
pub struct BadRequestError {
    detail: Option<String>,
}

impl BadRequestError {
    pub const REASON: &'static str = "error.bad";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}

/// User-level domain failure; its message is shown to the client as-is
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct UserError(pub String);

impl UserError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A caller-supplied argument was rejected
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct InvalidArgument(pub String);

impl InvalidArgument {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
