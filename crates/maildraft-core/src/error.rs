//! Error types shared by the form guard and the completion client.

use thiserror::Error;

/// Message shown when the input guard rejects a generation request.
pub const MISSING_INPUT_WARNING: &str =
    "Please provide a purpose and at least one key point to generate the email.";

/// Why the form is not ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{}", MISSING_INPUT_WARNING)]
    MissingPurpose,

    #[error("{}", MISSING_INPUT_WARNING)]
    MissingKeyPoints,
}

/// Failure of a single completion call.
///
/// Every variant produces the same user-visible outcome (the failure draft);
/// the split exists so logs and the CLI can say what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("authentication failed (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl DraftError {
    /// Short class name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DraftError::Transport(_) => "transport",
            DraftError::Unauthorized { .. } => "unauthorized",
            DraftError::Api { .. } => "api",
            DraftError::MalformedResponse(_) => "malformed_response",
        }
    }
}
