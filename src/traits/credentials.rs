//! Credential store trait abstraction.
//!
//! The store holds exactly one opaque bearer credential. The production
//! implementation is the [`crate::ledger::Ledger`], which persists the
//! credential in the same snapshot as the event counters.

use async_trait::async_trait;

use crate::auth::Credential;

/// Credential store errors.
#[derive(Debug, Clone)]
pub enum CredentialsError {
    /// Failed to load the credential
    LoadFailed(String),
    /// Failed to persist the credential
    SaveFailed(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::LoadFailed(msg) => write!(f, "Failed to load credential: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credential: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Durable storage for one bearer credential.
///
/// Implementations must be safe to call from several tasks at once.
///
/// # Example
///
/// ```ignore
/// use ring_exporter::traits::CredentialStore;
///
/// async fn has_token<S: CredentialStore>(store: &S) -> bool {
///     matches!(store.fetch().await, Ok(Some(_)))
/// }
/// ```
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the stored credential.
    ///
    /// # Returns
    /// - `Ok(Some(credential))` if one is stored
    /// - `Ok(None)` if the store is empty
    /// - `Err(error)` if the store could not be read
    async fn fetch(&self) -> Result<Option<Credential>, CredentialsError>;

    /// Replace the stored credential.
    async fn store(&self, credential: &Credential) -> Result<(), CredentialsError>;
}
