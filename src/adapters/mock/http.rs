//! Scripted HTTP transport for the grant flow, the decorators and the session.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// One request as the client received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// `None` for GET.
    pub body: Option<String>,
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(Response),
    Error(HttpError),
}

impl MockResponse {
    /// A response with `status` and a text body.
    pub fn json(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, body.to_string()))
    }
}

#[derive(Debug, Default)]
struct Script {
    queued: HashMap<String, VecDeque<MockResponse>>,
    fixed: HashMap<String, MockResponse>,
    fallback: Option<MockResponse>,
    requests: Vec<RecordedRequest>,
}

impl Script {
    /// Queued answer for `url`, else the longest fixed prefix, else the fallback.
    fn answer(&mut self, url: &str) -> Option<MockResponse> {
        if let Some(response) = self.queued.get_mut(url).and_then(VecDeque::pop_front) {
            return Some(response);
        }
        self.fixed
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, response)| response.clone())
            .or_else(|| self.fallback.clone())
    }
}

/// Scripted [`HttpClient`] that records every request.
///
/// ```ignore
/// use ring_exporter::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.push_response("https://oauth/token", MockResponse::json(412, "{}"));
/// client.push_response("https://oauth/token", MockResponse::json(200, r#"{"access_token":"t"}"#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    script: Arc<Mutex<Script>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client answering every request with an empty 200.
    pub fn always_ok() -> Self {
        let client = Self::new();
        client.set_default_response(MockResponse::json(200, ""));
        client
    }

    /// Answer every request whose URL starts with `url`.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.script.lock().unwrap().fixed.insert(url.to_string(), response);
    }

    /// Answer the next request to exactly `url` once, ahead of fixed answers.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        self.script
            .lock()
            .unwrap()
            .queued
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn set_default_response(&self, response: MockResponse) {
        self.script.lock().unwrap().fallback = Some(response);
    }

    /// Requests seen so far, oldest first.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    fn handle(
        &self,
        method: &str,
        url: &str,
        headers: &Headers,
        body: Option<&str>,
    ) -> Result<Response, HttpError> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(str::to_string),
        });

        match script.answer(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.handle("GET", url, headers, None)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.handle("POST", url, headers, Some(body))
    }
}
