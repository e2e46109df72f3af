//! Common test utilities for integration tests.
//!
//! Fixtures for a wiremock-backed Ring API and a temporary state directory.

#![allow(dead_code)]

use ring_exporter::config::ApiConfig;
use ring_exporter::ledger::Ledger;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token endpoint path served by the mock server.
pub const TOKEN_PATH: &str = "/oauth/token";

/// API config pointing both the token endpoint and the API at `server`.
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        hardware_id: "test-hardware-id".to_string(),
        oauth_url: format!("{}{}", server.uri(), TOKEN_PATH),
        api_base_url: server.uri(),
    }
}

/// A temporary directory holding `ring-state.json`.
pub struct StateDir {
    pub dir: TempDir,
}

impl StateDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("ring-state.json")
    }

    /// Load the ledger as a fresh process would.
    pub fn ledger(&self) -> Ledger {
        Ledger::load(self.state_path())
    }
}

/// Body of a successful password grant.
pub fn token_body(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "refresh_token": format!("{}-refresh", access_token),
        "expires_in": 3600,
        "scope": "client",
        "created_at": 1700000000
    })
}

/// RFC 3339 timestamp on 2024-05-01 at the given hour.
pub fn at_hour(hour: u32) -> String {
    format!("2024-05-01T{:02}:00:00.000Z", hour)
}

/// History body for a doorbot with one event per timestamp.
pub fn history_body(timestamps: &[String]) -> Value {
    Value::Array(
        timestamps
            .iter()
            .enumerate()
            .map(|(i, ts)| {
                json!({
                    "id": 7_000_000 + i as i64,
                    "created_at": ts,
                    "kind": "ding",
                    "answered": false
                })
            })
            .collect(),
    )
}

/// Serve `body` for GET `api_path` with the `api_version=9` query.
pub async fn mount_api_json(server: &MockServer, api_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(api_path))
        .and(query_param("api_version", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
