//! Mock implementations for testing.
//!
//! These let the grant flow, the session and the poller be exercised without
//! network access or a terminal.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`InMemoryCredentialStore`] - In-memory credential storage
//! - [`ScriptedAuthenticator`] - Authenticator with fixed answers
//! - [`MockDeviceApi`] - Device API with scripted results

pub mod authenticator;
pub mod credentials;
pub mod device_api;
pub mod http;

pub use authenticator::ScriptedAuthenticator;
pub use credentials::InMemoryCredentialStore;
pub use device_api::MockDeviceApi;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
