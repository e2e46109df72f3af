//! Ring's OAuth2 password grant.
//!
//! Only the single vendor-specific grant is supported: client id and scope
//! travel in the form body, and HTTP 412 from the token endpoint means the
//! account has two-factor authentication enabled.

use chrono::Utc;

use super::credentials::{Credential, TokenResponse};
use crate::error::AuthError;
use crate::traits::{Headers, HttpClient, UserCredentials};

/// Default token endpoint.
pub const OAUTH_URL: &str = "https://oauth.ring.com/oauth/token";

/// Client id of the official Android app, which Ring accepts for this grant.
pub const CLIENT_ID: &str = "ring_official_android";

/// Scope requested with every grant.
pub const SCOPE: &str = "client";

/// Status Ring uses to ask for a 2FA code.
pub const TWO_FACTOR_REQUIRED_STATUS: u16 = 412;

/// Result of one password grant attempt that reached the server.
#[derive(Debug)]
pub enum GrantOutcome {
    /// The endpoint issued a token.
    Granted(Credential),
    /// The endpoint answered 412; retry with a 2FA code.
    TwoFactorRequired,
    /// Any other non-success status.
    Rejected { status: u16, message: String },
}

/// Build the url-encoded body for a password grant.
pub fn password_grant_body(credentials: &UserCredentials) -> String {
    [
        ("grant_type", "password"),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
        ("client_id", CLIENT_ID),
        ("scope", SCOPE),
    ]
    .iter()
    .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
    .collect::<Vec<_>>()
    .join("&")
}

fn grant_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert(
        "Content-Type".to_string(),
        "application/x-www-form-urlencoded".to_string(),
    );
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}

/// Issue one password grant through `client`.
///
/// Transport failures are returned as [`AuthError::Transport`]; every HTTP
/// answer is classified into a [`GrantOutcome`].
pub async fn request_password_grant(
    client: &dyn HttpClient,
    token_url: &str,
    credentials: &UserCredentials,
) -> Result<GrantOutcome, AuthError> {
    tracing::debug!("Requesting password grant from {}", token_url);

    let response = client
        .post(token_url, &password_grant_body(credentials), &grant_headers())
        .await?;

    if response.is_success() {
        let token: TokenResponse =
            response
                .json()
                .map_err(|e| AuthError::InvalidTokenResponse {
                    message: e.to_string(),
                })?;
        if token.access_token.is_empty() {
            return Err(AuthError::InvalidTokenResponse {
                message: "empty access_token".to_string(),
            });
        }
        return Ok(GrantOutcome::Granted(Credential::from_token_response(
            token,
            Utc::now(),
        )));
    }

    if response.status == TWO_FACTOR_REQUIRED_STATUS {
        return Ok(GrantOutcome::TwoFactorRequired);
    }

    Ok(GrantOutcome::Rejected {
        status: response.status,
        message: response.text(),
    })
}
