//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST)
//! - [`CredentialStore`] - Bearer credential storage and retrieval
//! - [`Authenticator`] - Interactive username/password and 2FA prompts
//! - [`DeviceApi`] - Ring endpoints read by a poll cycle

pub mod authenticator;
pub mod credentials;
pub mod device_api;
pub mod http;

pub use authenticator::{Authenticator, UserCredentials};
pub use credentials::{CredentialStore, CredentialsError};
pub use device_api::DeviceApi;
pub use http::{Headers, HttpClient, HttpError, Response};
