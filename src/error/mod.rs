//! Error handling for the exporter.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **Domain-specific Errors**: Auth, API and ledger errors (config errors
//!   live in [`crate::config`])
//! - **Unified Error Type**: `ExporterError` consolidates all error types
//! - **Result Type Alias**: `ExporterResult<T>` for command handlers
//!
//! # Error Categories
//!
//! | Category | Description |
//! |----------|-------------|
//! | Network | Connection, DNS, timeout |
//! | Auth | Grant rejected, missing token |
//! | Server | Ring API error status or bad body |
//! | Storage | State or config file I/O |
//! | Configuration | Invalid config, port in use, metrics registry |
//! | User | Interactive input unavailable |

mod api;
mod auth;
mod category;
mod exporter_error;
mod ledger;
mod result;

pub use crate::config::ConfigError;
pub use api::ApiError;
pub use auth::AuthError;
pub use category::ErrorCategory;
pub use exporter_error::ExporterError;
pub use ledger::LedgerError;
pub use result::{ExporterResult, ResultExt};
