//! Authentication for the Ring API.
//!
//! This module provides:
//! - The stored bearer credential
//! - Ring's password grant with two-factor escalation
//! - Session acquisition from a credential store

pub mod broker;
pub mod credentials;
pub mod grant;

pub use broker::{open_authorized_session, open_authorized_session_with_client};
pub use credentials::{Credential, TokenResponse};
pub use grant::{request_password_grant, GrantOutcome};
