//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`BearerHttpClient`] - Attaches the bearer credential to every request
//! - [`TwoFactorHttpClient`] - Adds Ring's 2FA headers to the retried grant
//! - [`CliAuthenticator`] - Terminal prompts for username, password and code
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::InMemoryCredentialStore`] - In-memory credential storage
//! - [`mock::ScriptedAuthenticator`] - Fixed prompt answers
//! - [`mock::MockDeviceApi`] - Scripted roster, health and history

pub mod bearer_http;
pub mod cli_authenticator;
pub mod mock;
pub mod reqwest_http;
pub mod two_factor_http;

pub use bearer_http::{BearerHttpClient, AUTHORIZATION_HEADER};
pub use cli_authenticator::CliAuthenticator;
pub use reqwest_http::ReqwestHttpClient;
pub use two_factor_http::{TwoFactorHttpClient, TWO_FACTOR_CODE_HEADER, TWO_FACTOR_SUPPORT_HEADER};
