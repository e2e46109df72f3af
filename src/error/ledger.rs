//! Event ledger errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the [`Ledger`](crate::ledger::Ledger).
///
/// None of these are fatal to the poll loop: a failed absorb leaves the
/// entry untouched and a failed save is retried on the next save tick.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A non-empty batch in which no timestamp could be parsed.
    #[error("No parsable timestamp among {rejected} events for device {device_id}")]
    ParseAllFailed { device_id: u64, rejected: usize },

    /// The snapshot could not be serialized.
    #[error("Failed to serialize ledger snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The snapshot could not be written to disk.
    #[error("Failed to write ledger snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LedgerError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::ParseAllFailed { .. } => "E_LEDGER_TIMESTAMPS",
            LedgerError::Serialize(_) => "E_LEDGER_SERIALIZE",
            LedgerError::Write { .. } => "E_LEDGER_WRITE",
        }
    }

    /// Whether the error concerns durable storage rather than input data.
    pub fn is_persistence(&self) -> bool {
        !matches!(self, LedgerError::ParseAllFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_failed_display() {
        let err = LedgerError::ParseAllFailed {
            device_id: 42,
            rejected: 3,
        };
        assert_eq!(
            err.to_string(),
            "No parsable timestamp among 3 events for device 42"
        );
        assert!(!err.is_persistence());
    }

    #[test]
    fn test_write_error_is_persistence() {
        let err = LedgerError::Write {
            path: PathBuf::from("/tmp/ring-state.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_persistence());
        assert_eq!(err.error_code(), "E_LEDGER_WRITE");
    }
}
