//! Error category classification.
//!
//! Categories drive how the exporter reacts to a failure: startup failures in
//! the `Auth` or `Configuration` categories are terminal, while `Network` and
//! `Server` failures during a poll only cost one cycle.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout.
    Network,

    /// Token grant or credential problems.
    Auth,

    /// The vendor API answered with an error status or a body we could not read.
    Server,

    /// State snapshot or config file could not be read or written.
    Storage,

    /// Invalid or missing configuration.
    Configuration,

    /// Interactive input was required and could not be obtained.
    User,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Storage => "storage",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::User => "user",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check network connectivity to the Ring API",
            ErrorCategory::Auth => "Run `ring-exporter init` to authorize a new token",
            ErrorCategory::Server => "The Ring API may be unavailable. The next poll will retry",
            ErrorCategory::Storage => "Check permissions on the config directory",
            ErrorCategory::Configuration => "Check the JSON config file",
            ErrorCategory::User => "Run the command from an interactive terminal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
