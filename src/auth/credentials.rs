//! The bearer credential produced by a password grant.
//!
//! The serialized shape matches a plain OAuth2 token document
//! (`access_token`, `token_type`, `refresh_token`, `expiry`) so snapshots
//! written by older exporters load unchanged.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token type assumed when the grant response omits one.
const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Opaque bearer credential plus the metadata needed to attach it.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credential {
    /// OAuth access token sent on every API request.
    pub access_token: String,
    /// Token type as reported by the grant (usually `bearer`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_type: String,
    /// Refresh token. Stored but never used; no refresh flow exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Absolute expiry computed from `expires_in` at grant time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential with only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    /// Build a credential from a token endpoint response received at `now`.
    pub fn from_token_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let expiry = response
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| now + Duration::seconds(secs));
        Self {
            access_token: response.access_token,
            token_type: response.token_type.unwrap_or_default(),
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            expiry,
        }
    }

    /// Normalized token type for the `Authorization` header.
    pub fn header_type(&self) -> &str {
        if self.token_type.is_empty()
            || self.token_type.eq_ignore_ascii_case("bearer")
        {
            DEFAULT_TOKEN_TYPE
        } else {
            &self.token_type
        }
    }

    /// Value of the `Authorization` header carrying this credential.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.header_type(), self.access_token)
    }

    /// Whether the recorded expiry has passed.
    ///
    /// Informational only: a stored credential is used as-is and an invalid
    /// one surfaces as failing API calls.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.map(|expiry| now >= expiry).unwrap_or(false)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Successful body of the password grant endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}
