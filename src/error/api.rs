//! Ring API call errors.

use thiserror::Error;

use crate::traits::HttpError;

/// Failures of a single Ring API request.
///
/// During a poll these only ever skip one device (or the cycle, for the
/// roster request); they are never fatal.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("API transport error: {0}")]
    Transport(#[from] HttpError),

    /// Ring answered with a non-2xx status.
    #[error("API request failed ({status}): {body}")]
    Status { status: u16, body: String },

    /// The body could not be decoded.
    #[error("API response could not be decoded: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Whether the failure is an authorization problem with the stored token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "E_API_TRANSPORT",
            ApiError::Status { .. } => "E_API_STATUS",
            ApiError::Decode { .. } => "E_API_DECODE",
        }
    }
}
