//! Scripted authenticator for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::AuthError;
use crate::traits::{Authenticator, UserCredentials};

/// Authenticator returning fixed answers and counting how often it was asked.
#[derive(Debug, Clone)]
pub struct ScriptedAuthenticator {
    credentials: Option<UserCredentials>,
    code: Option<String>,
    credential_prompts: Arc<AtomicUsize>,
    code_prompts: Arc<AtomicUsize>,
}

impl ScriptedAuthenticator {
    /// Answer credential prompts with `username`/`password` and 2FA prompts with `code`.
    pub fn new(username: &str, password: &str, code: &str) -> Self {
        Self {
            credentials: Some(UserCredentials::new(username, password)),
            code: Some(code.to_string()),
            credential_prompts: Arc::new(AtomicUsize::new(0)),
            code_prompts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// An authenticator whose every prompt fails, as if stdin were closed.
    pub fn unanswered() -> Self {
        Self {
            credentials: None,
            code: None,
            credential_prompts: Arc::new(AtomicUsize::new(0)),
            code_prompts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `prompt_credentials` calls.
    pub fn credential_prompts(&self) -> usize {
        self.credential_prompts.load(Ordering::SeqCst)
    }

    /// Number of `prompt_2fa_code` calls.
    pub fn code_prompts(&self) -> usize {
        self.code_prompts.load(Ordering::SeqCst)
    }

    /// Total prompts of either kind.
    pub fn total_prompts(&self) -> usize {
        self.credential_prompts() + self.code_prompts()
    }
}

#[async_trait]
impl Authenticator for ScriptedAuthenticator {
    async fn prompt_credentials(&self) -> Result<UserCredentials, AuthError> {
        self.credential_prompts.fetch_add(1, Ordering::SeqCst);
        self.credentials.clone().ok_or_else(|| AuthError::PromptFailed {
            message: "no scripted credentials".to_string(),
        })
    }

    async fn prompt_2fa_code(&self) -> Result<String, AuthError> {
        self.code_prompts.fetch_add(1, Ordering::SeqCst);
        self.code.clone().ok_or_else(|| AuthError::PromptFailed {
            message: "no scripted code".to_string(),
        })
    }
}
