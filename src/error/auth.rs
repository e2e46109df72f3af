//! Authentication error types.
//!
//! Every variant is terminal to the startup sequence: the exporter never
//! enters its poll loop without an authorized session, and nothing in the
//! grant flow retries on its own.

use std::fmt;

use crate::traits::{CredentialsError, HttpError};

/// Failures of the password / two-factor grant flow.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No stored credential and no interactive authenticator to obtain one.
    NoCredentialNoAuthenticator,

    /// The password grant was refused with a status other than the 2FA signal.
    GrantRejected { status: u16, message: String },

    /// The grant retried with a 2FA code was refused.
    TwoFactorGrantRejected { status: u16, message: String },

    /// Network-level failure while talking to the token endpoint.
    Transport(HttpError),

    /// The token endpoint answered 2xx but the body was not a usable token.
    InvalidTokenResponse { message: String },

    /// The authenticator could not produce credentials or a code.
    PromptFailed { message: String },

    /// The credential store could not be read.
    CredentialStore(CredentialsError),
}

impl AuthError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NoCredentialNoAuthenticator => {
                "No stored token was found. Run `ring-exporter init` first.".to_string()
            }
            AuthError::GrantRejected { status, .. } => {
                format!("Ring rejected the username or password (HTTP {}).", status)
            }
            AuthError::TwoFactorGrantRejected { status, .. } => {
                format!("Ring rejected the two-factor code (HTTP {}).", status)
            }
            AuthError::Transport(e) => format!("Could not reach the Ring token endpoint: {}", e),
            AuthError::InvalidTokenResponse { .. } => {
                "Ring returned a token response that could not be understood.".to_string()
            }
            AuthError::PromptFailed { message } => format!("Could not read input: {}", message),
            AuthError::CredentialStore(e) => format!("Could not read the stored token: {}", e),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NoCredentialNoAuthenticator => "E_AUTH_NO_CREDENTIAL",
            AuthError::GrantRejected { .. } => "E_AUTH_GRANT",
            AuthError::TwoFactorGrantRejected { .. } => "E_AUTH_2FA",
            AuthError::Transport(_) => "E_AUTH_TRANSPORT",
            AuthError::InvalidTokenResponse { .. } => "E_AUTH_TOKEN_BODY",
            AuthError::PromptFailed { .. } => "E_AUTH_PROMPT",
            AuthError::CredentialStore(_) => "E_AUTH_STORE",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NoCredentialNoAuthenticator => {
                write!(f, "No token found and no authenticator was provided")
            }
            AuthError::GrantRejected { status, message } => {
                write!(f, "Password grant rejected ({}): {}", status, message)
            }
            AuthError::TwoFactorGrantRejected { status, message } => {
                write!(f, "Two-factor grant rejected ({}): {}", status, message)
            }
            AuthError::Transport(e) => write!(f, "Token endpoint transport error: {}", e),
            AuthError::InvalidTokenResponse { message } => {
                write!(f, "Invalid token response: {}", message)
            }
            AuthError::PromptFailed { message } => write!(f, "Prompt failed: {}", message),
            AuthError::CredentialStore(e) => write!(f, "Credential store error: {}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Transport(e) => Some(e),
            AuthError::CredentialStore(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HttpError> for AuthError {
    fn from(e: HttpError) -> Self {
        AuthError::Transport(e)
    }
}

impl From<CredentialsError> for AuthError {
    fn from(e: CredentialsError) -> Self {
        AuthError::CredentialStore(e)
    }
}
