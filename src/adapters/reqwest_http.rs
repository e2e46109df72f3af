//! Production [`HttpClient`] backed by reqwest.

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// Timeout applied to every request issued by [`ReqwestHttpClient::new`].
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self { client }
    }

    /// Wrap an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn execute(
        &self,
        mut request: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(Response::new(status, body))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn transport_error(err: reqwest::Error) -> HttpError {
    let message = err.to_string();
    if err.is_timeout() {
        HttpError::Timeout(message)
    } else if err.is_connect() {
        HttpError::ConnectionFailed(message)
    } else if err.is_builder() {
        HttpError::InvalidUrl(message)
    } else {
        HttpError::Other(message)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.execute(self.client.get(url), headers).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.execute(self.client.post(url).body(body.to_owned()), headers)
            .await
    }
}
