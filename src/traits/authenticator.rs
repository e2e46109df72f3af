//! Interactive authenticator trait.
//!
//! Only consulted when no credential is stored. Prompts block until the user
//! answers, so an authenticator is only ever driven at startup, never from a
//! poll tick.

use async_trait::async_trait;

use crate::error::AuthError;

/// Username and password pair returned by [`Authenticator::prompt_credentials`].
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}

impl UserCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of the secrets needed for a fresh grant.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Ask for the account username and password.
    async fn prompt_credentials(&self) -> Result<UserCredentials, AuthError>;

    /// Ask for the one-time code Ring sent after the first grant attempt.
    async fn prompt_2fa_code(&self) -> Result<String, AuthError>;
}
