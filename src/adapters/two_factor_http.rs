//! Decorator that injects Ring's two-factor headers.
//!
//! Ring completes 2FA by replaying the password grant with two extra
//! headers. The decorator wraps only the client used for that single retried
//! grant; the session client never carries them.

use async_trait::async_trait;
use std::sync::Arc;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// Flag header telling Ring the client supports 2FA.
pub const TWO_FACTOR_SUPPORT_HEADER: &str = "2fa-support";

/// Header carrying the one-time code.
pub const TWO_FACTOR_CODE_HEADER: &str = "2fa-code";

/// HTTP client that adds the 2FA flag and code to every request it issues.
pub struct TwoFactorHttpClient {
    inner: Arc<dyn HttpClient>,
    code: String,
}

impl TwoFactorHttpClient {
    pub fn new(inner: Arc<dyn HttpClient>, code: impl Into<String>) -> Self {
        Self {
            inner,
            code: code.into(),
        }
    }

    fn with_code(&self, headers: &Headers) -> Headers {
        let mut headers = headers.clone();
        headers.insert(TWO_FACTOR_SUPPORT_HEADER.to_string(), "true".to_string());
        headers.insert(TWO_FACTOR_CODE_HEADER.to_string(), self.code.clone());
        headers
    }
}

#[async_trait]
impl HttpClient for TwoFactorHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.inner.get(url, &self.with_code(headers)).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.inner.post(url, body, &self.with_code(headers)).await
    }
}
