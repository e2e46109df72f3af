//! Session acquisition.
//!
//! Turns a stored credential, or an interactive password / two-factor grant,
//! into an authorized [`Session`]. Nothing here retries: every failure is
//! returned to the caller, which decides whether to abort startup.

use chrono::Utc;
use std::sync::Arc;

use super::credentials::Credential;
use super::grant::{request_password_grant, GrantOutcome};
use crate::adapters::{BearerHttpClient, ReqwestHttpClient, TwoFactorHttpClient};
use crate::api::Session;
use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::traits::{Authenticator, CredentialStore, HttpClient};

/// Open a session using the production HTTP client.
///
/// With a stored credential the authenticator is never consulted. Without
/// one, `authenticator` is required and drives the password grant,
/// escalating to a 2FA code when Ring asks for one.
pub async fn open_authorized_session(
    config: &ApiConfig,
    store: &dyn CredentialStore,
    authenticator: Option<&dyn Authenticator>,
) -> Result<Session, AuthError> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    open_authorized_session_with_client(config, store, authenticator, http).await
}

/// Same as [`open_authorized_session`] with an injected HTTP client.
///
/// The client is used for the grant requests and is wrapped as the
/// session's transport.
pub async fn open_authorized_session_with_client(
    config: &ApiConfig,
    store: &dyn CredentialStore,
    authenticator: Option<&dyn Authenticator>,
    http: Arc<dyn HttpClient>,
) -> Result<Session, AuthError> {
    let credential = match store.fetch().await? {
        Some(credential) => {
            if credential.is_expired_at(Utc::now()) {
                tracing::warn!(
                    "Stored token expired at {:?}; API calls may be rejected until `init` is run again",
                    credential.expiry
                );
            } else {
                tracing::debug!("Using stored credential");
            }
            credential
        }
        None => {
            let authenticator = authenticator.ok_or(AuthError::NoCredentialNoAuthenticator)?;
            let credential = acquire_credential(config, authenticator, http.clone()).await?;

            // Not fatal: the session below is still valid.
            if let Err(e) = store.store(&credential).await {
                tracing::warn!("Failed to persist new credential: {}", e);
            }
            credential
        }
    };

    let client = BearerHttpClient::new(http, &credential);
    Ok(Session::new(client, config.clone()))
}

async fn acquire_credential(
    config: &ApiConfig,
    authenticator: &dyn Authenticator,
    http: Arc<dyn HttpClient>,
) -> Result<Credential, AuthError> {
    let user = authenticator.prompt_credentials().await?;

    match request_password_grant(http.as_ref(), &config.oauth_url, &user).await? {
        GrantOutcome::Granted(credential) => {
            tracing::info!("Password grant succeeded");
            Ok(credential)
        }
        GrantOutcome::Rejected { status, message } => {
            Err(AuthError::GrantRejected { status, message })
        }
        GrantOutcome::TwoFactorRequired => {
            tracing::info!("Two-factor authentication required");
            let code = authenticator.prompt_2fa_code().await?;
            let two_factor = TwoFactorHttpClient::new(http, code);

            match request_password_grant(&two_factor, &config.oauth_url, &user).await? {
                GrantOutcome::Granted(credential) => {
                    tracing::info!("Two-factor grant succeeded");
                    Ok(credential)
                }
                GrantOutcome::Rejected { status, message } => {
                    Err(AuthError::TwoFactorGrantRejected { status, message })
                }
                GrantOutcome::TwoFactorRequired => Err(AuthError::TwoFactorGrantRejected {
                    status: super::grant::TWO_FACTOR_REQUIRED_STATUS,
                    message: "code not accepted".to_string(),
                }),
            }
        }
    }
}
