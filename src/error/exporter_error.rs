//! Unified error type for the exporter.
//!
//! `ExporterError` wraps every domain error so command handlers can return a
//! single type, while still classifying failures for the final report.

use std::fmt;

use super::api::ApiError;
use super::auth::AuthError;
use super::category::ErrorCategory;
use super::ledger::LedgerError;
use crate::config::ConfigError;

/// Unified error type for the exporter.
#[derive(Debug)]
pub enum ExporterError {
    /// Config file could not be read, parsed or written.
    Config(ConfigError),

    /// No authorized session could be opened.
    Auth(AuthError),

    /// A Ring API request failed.
    Api(ApiError),

    /// Ledger snapshot or timestamp problems.
    Ledger(LedgerError),

    /// The metrics server or signal handler could not be set up.
    Io(std::io::Error),

    /// The gauge registry could not be built or encoded.
    Metrics(prometheus::Error),

    /// Wrapped error with the operation that produced it.
    WithContext {
        error: Box<ExporterError>,
        operation: &'static str,
    },
}

impl ExporterError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExporterError::Config(ConfigError::Write { .. }) => ErrorCategory::Storage,
            ExporterError::Config(_) => ErrorCategory::Configuration,
            ExporterError::Auth(err) => match err {
                AuthError::Transport(_) => ErrorCategory::Network,
                AuthError::PromptFailed { .. } => ErrorCategory::User,
                AuthError::CredentialStore(_) => ErrorCategory::Storage,
                _ => ErrorCategory::Auth,
            },
            ExporterError::Api(err) => match err {
                ApiError::Transport(_) => ErrorCategory::Network,
                err if err.is_unauthorized() => ErrorCategory::Auth,
                _ => ErrorCategory::Server,
            },
            ExporterError::Ledger(_) => ErrorCategory::Storage,
            ExporterError::Io(_) | ExporterError::Metrics(_) => ErrorCategory::Configuration,
            ExporterError::WithContext { error, .. } => error.category(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ExporterError::Config(err) => err.to_string(),
            ExporterError::Auth(err) => err.user_message(),
            ExporterError::Api(err) => format!("Ring API request failed: {}", err),
            ExporterError::Ledger(err) => err.to_string(),
            ExporterError::Io(err) => err.to_string(),
            ExporterError::Metrics(err) => format!("Metrics registry error: {}", err),
            ExporterError::WithContext { error, operation } => {
                format!("Failed to {}: {}", operation, error.user_message())
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExporterError::Config(_) => "E_CONFIG",
            ExporterError::Auth(err) => err.error_code(),
            ExporterError::Api(err) => err.error_code(),
            ExporterError::Ledger(err) => err.error_code(),
            ExporterError::Io(_) => "E_IO",
            ExporterError::Metrics(_) => "E_METRICS",
            ExporterError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Attach the failing operation to this error.
    pub fn with_context(self, operation: &'static str) -> Self {
        ExporterError::WithContext {
            error: Box::new(self),
            operation,
        }
    }
}

impl fmt::Display for ExporterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExporterError::Config(err) => write!(f, "{}", err),
            ExporterError::Auth(err) => write!(f, "{}", err),
            ExporterError::Api(err) => write!(f, "{}", err),
            ExporterError::Ledger(err) => write!(f, "{}", err),
            ExporterError::Io(err) => write!(f, "{}", err),
            ExporterError::Metrics(err) => write!(f, "{}", err),
            ExporterError::WithContext { error, operation } => {
                write!(f, "{}: {}", operation, error)
            }
        }
    }
}

impl std::error::Error for ExporterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExporterError::Config(err) => Some(err),
            ExporterError::Auth(err) => Some(err),
            ExporterError::Api(err) => Some(err),
            ExporterError::Ledger(err) => Some(err),
            ExporterError::Io(err) => Some(err),
            ExporterError::Metrics(err) => Some(err),
            ExporterError::WithContext { error, .. } => Some(error.as_ref()),
        }
    }
}

impl From<ConfigError> for ExporterError {
    fn from(err: ConfigError) -> Self {
        ExporterError::Config(err)
    }
}

impl From<AuthError> for ExporterError {
    fn from(err: AuthError) -> Self {
        ExporterError::Auth(err)
    }
}

impl From<ApiError> for ExporterError {
    fn from(err: ApiError) -> Self {
        ExporterError::Api(err)
    }
}

impl From<LedgerError> for ExporterError {
    fn from(err: LedgerError) -> Self {
        ExporterError::Ledger(err)
    }
}

impl From<prometheus::Error> for ExporterError {
    fn from(err: prometheus::Error) -> Self {
        ExporterError::Metrics(err)
    }
}

impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err)
    }
}
