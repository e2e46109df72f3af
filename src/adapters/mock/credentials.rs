//! In-memory credential store for testing.
//!
//! Stores the credential in memory and counts writes, so tests can assert
//! how many times the grant flow persisted a credential.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::auth::Credential;
use crate::traits::{CredentialStore, CredentialsError};

/// In-memory credential store for testing.
///
/// # Example
///
/// ```ignore
/// use ring_exporter::adapters::mock::InMemoryCredentialStore;
/// use ring_exporter::traits::CredentialStore;
/// use ring_exporter::auth::Credential;
///
/// let store = InMemoryCredentialStore::new();
/// assert!(store.fetch().await?.is_none());
///
/// store.store(&Credential::new("token")).await?;
/// assert_eq!(store.store_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryCredentialStore {
    /// Stored credential
    credential: Arc<Mutex<Option<Credential>>>,
    /// Every credential passed to `store`, in order
    writes: Arc<Mutex<Vec<Credential>>>,
    /// Whether fetch should fail
    fetch_should_fail: Arc<Mutex<bool>>,
    /// Whether store should fail
    store_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            credential: Arc::new(Mutex::new(None)),
            writes: Arc::new(Mutex::new(Vec::new())),
            fetch_should_fail: Arc::new(Mutex::new(false)),
            store_should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Create a store holding an initial credential.
    pub fn with_credential(credential: Credential) -> Self {
        let store = Self::new();
        *store.credential.lock().unwrap() = Some(credential);
        store
    }

    /// Configure whether fetch should fail.
    pub fn set_fetch_should_fail(&self, should_fail: bool) {
        *self.fetch_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether store should fail.
    pub fn set_store_should_fail(&self, should_fail: bool) {
        *self.store_should_fail.lock().unwrap() = should_fail;
    }

    /// Current credential, read synchronously.
    pub fn get_credential(&self) -> Option<Credential> {
        self.credential.lock().unwrap().clone()
    }

    /// Number of `store` calls, including failed ones.
    pub fn store_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// Every credential passed to `store`.
    pub fn writes(&self) -> Vec<Credential> {
        self.writes.lock().unwrap().clone()
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn fetch(&self) -> Result<Option<Credential>, CredentialsError> {
        if *self.fetch_should_fail.lock().unwrap() {
            return Err(CredentialsError::LoadFailed("Mock fetch failure".to_string()));
        }
        Ok(self.credential.lock().unwrap().clone())
    }

    async fn store(&self, credential: &Credential) -> Result<(), CredentialsError> {
        self.writes.lock().unwrap().push(credential.clone());
        if *self.store_should_fail.lock().unwrap() {
            return Err(CredentialsError::SaveFailed("Mock store failure".to_string()));
        }
        *self.credential.lock().unwrap() = Some(credential.clone());
        Ok(())
    }
}
