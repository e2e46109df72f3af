//! HTTP transport seam.
//!
//! The grant flow and the API session only need GET and POST with string
//! headers, so that is all [`HttpClient`] offers. Decorators in
//! [`crate::adapters`] layer bearer and 2FA headers on top of any client.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use thiserror::Error;

/// Request headers, name to value.
pub type Headers = HashMap<String, String>;

/// Status and body of a completed request. Any status, 2xx or not.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text; invalid UTF-8 is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// A request that produced no response at all.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request timeout: {0}")]
    Timeout(String),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Minimal async HTTP client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// POST `body` as-is; callers set `Content-Type` through `headers`.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(Response::new(200, Bytes::new()).is_success());
        assert!(Response::new(299, Bytes::new()).is_success());
        assert!(!Response::new(412, Bytes::new()).is_success());
        assert!(!Response::new(503, Bytes::new()).is_success());
    }

    #[test]
    fn test_text_is_lossy() {
        let response = Response::new(200, Bytes::from_static(b"ok\xff"));
        assert_eq!(response.text(), "ok\u{fffd}");
    }

    #[test]
    fn test_json_ignores_extra_fields() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Token {
            access_token: String,
        }

        let response = Response::new(200, r#"{"access_token":"abc","scope":"client"}"#.to_string());
        let token: Token = response.json().unwrap();
        assert_eq!(token.access_token, "abc");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(HttpError::Cancelled.to_string(), "Request cancelled");
    }
}
