//! Terminal authenticator used by `ring-exporter init`.
//!
//! Username and 2FA code are read from stdin; the password is read without
//! echo via `rpassword`. Each prompt runs on a blocking thread so the async
//! runtime is not stalled while waiting for the user.

use async_trait::async_trait;
use std::io::{self, BufRead, Write};

use crate::error::AuthError;
use crate::traits::{Authenticator, UserCredentials};

/// Interactive authenticator reading from the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliAuthenticator;

impl CliAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

fn prompt_failed(context: &str, e: impl std::fmt::Display) -> AuthError {
    AuthError::PromptFailed {
        message: format!("{}: {}", context, e),
    }
}

fn read_line(prompt: &str) -> Result<String, AuthError> {
    print!("{}", prompt);
    io::stdout()
        .flush()
        .map_err(|e| prompt_failed("Failed to flush stdout", e))?;

    let mut input = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut input)
        .map_err(|e| prompt_failed("Failed to read input", e))?;
    if read == 0 {
        return Err(prompt_failed("Failed to read input", "end of input"));
    }
    Ok(input.trim().to_string())
}

fn read_secret(prompt: &str) -> Result<String, AuthError> {
    print!("{}", prompt);
    io::stdout()
        .flush()
        .map_err(|e| prompt_failed("Failed to flush stdout", e))?;

    rpassword::read_password()
        .map(|password| password.trim().to_string())
        .map_err(|e| prompt_failed("Failed to read password", e))
}

async fn blocking<T, F>(f: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| prompt_failed("Prompt task failed", e))?
}

#[async_trait]
impl Authenticator for CliAuthenticator {
    async fn prompt_credentials(&self) -> Result<UserCredentials, AuthError> {
        blocking(|| {
            let username = read_line("Ring username: ")?;
            let password = read_secret("Ring password: ")?;
            Ok(UserCredentials::new(username, password))
        })
        .await
    }

    async fn prompt_2fa_code(&self) -> Result<String, AuthError> {
        blocking(|| read_line("Two-factor code: ")).await
    }
}
