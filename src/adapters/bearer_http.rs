//! Decorator that attaches a bearer credential to every request.

use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::Credential;
use crate::traits::{Headers, HttpClient, HttpError, Response};

/// Header carrying the credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// HTTP client that adds `Authorization: <type> <token>` to each call.
///
/// This is the long-lived client inside an authorized
/// [`Session`](crate::api::Session).
#[derive(Clone)]
pub struct BearerHttpClient {
    inner: Arc<dyn HttpClient>,
    authorization: String,
}

impl BearerHttpClient {
    pub fn new(inner: Arc<dyn HttpClient>, credential: &Credential) -> Self {
        Self {
            inner,
            authorization: credential.authorization_header(),
        }
    }

    fn with_authorization(&self, headers: &Headers) -> Headers {
        let mut headers = headers.clone();
        headers.insert(AUTHORIZATION_HEADER.to_string(), self.authorization.clone());
        headers
    }
}

#[async_trait]
impl HttpClient for BearerHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.inner.get(url, &self.with_authorization(headers)).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.inner
            .post(url, body, &self.with_authorization(headers))
            .await
    }
}
