//! Authorized Ring API session.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::types::{DeviceEvent, DevicesResponse, HealthResponse, SessionResponse};
use crate::adapters::BearerHttpClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::traits::{DeviceApi, Headers, HttpClient, Response};

/// API version query parameter sent with every request.
pub const API_VERSION: &str = "9";

const URI_SESSION: &str = "/clients_api/session";
const URI_RING_DEVICES: &str = "/clients_api/ring_devices";
const URI_HEALTH: &str = "/health";
const URI_HISTORY: &str = "/history";

fn doorbot_uri(id: u64) -> String {
    format!("/clients_api/doorbots/{}", id)
}

fn chime_uri(id: u64) -> String {
    format!("/clients_api/chimes/{}", id)
}

/// An authenticated connection to the Ring clients API.
///
/// Obtain one through [`open_authorized_session`](crate::auth::open_authorized_session);
/// every request it issues carries the bearer credential.
pub struct Session {
    client: BearerHttpClient,
    config: ApiConfig,
}

impl Session {
    pub fn new(client: BearerHttpClient, config: ApiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, uri: &str) -> String {
        format!(
            "{}{}?api_version={}",
            self.config.api_base_url.trim_end_matches('/'),
            uri,
            API_VERSION
        )
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                body: response.text(),
            });
        }
        response.json().map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> Result<T, ApiError> {
        let response = self.client.get(&self.url(uri), &Headers::new()).await?;
        Self::decode(response)
    }

    /// Form describing this client to the session endpoint.
    fn session_form(&self) -> String {
        let fields = [
            ("api_version", API_VERSION),
            ("device[hardware_id]", self.config.hardware_id.as_str()),
            ("device[os]", "android"),
            ("device[app_brand]", "ring"),
            ("device[metadata][device_model]", ""),
            ("device[metadata][device_name]", ""),
            ("device[metadata][resolution]", ""),
            ("device[metadata][app_version]", ""),
            ("device[metadata][app_instalation_date]", ""),
            ("device[metadata][manufacturer]", ""),
            ("device[metadata][device_type]", "desktop"),
            ("device[metadata][architecture]", ""),
            ("device[metadata][language]", "en"),
        ];
        fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Register this client and fetch the account profile.
    pub async fn get_session_info(&self) -> Result<SessionResponse, ApiError> {
        let mut headers = Headers::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        let response = self
            .client
            .post(&self.url(URI_SESSION), &self.session_form(), &headers)
            .await?;
        Self::decode(response)
    }
}

#[async_trait]
impl DeviceApi for Session {
    async fn get_devices(&self) -> Result<DevicesResponse, ApiError> {
        self.get_json(URI_RING_DEVICES).await
    }

    async fn get_doorbot_health(&self, id: u64) -> Result<HealthResponse, ApiError> {
        self.get_json(&format!("{}{}", doorbot_uri(id), URI_HEALTH))
            .await
    }

    async fn get_chime_health(&self, id: u64) -> Result<HealthResponse, ApiError> {
        self.get_json(&format!("{}{}", chime_uri(id), URI_HEALTH))
            .await
    }

    async fn get_doorbot_history(&self, id: u64) -> Result<Vec<DeviceEvent>, ApiError> {
        self.get_json(&format!("{}{}", doorbot_uri(id), URI_HISTORY))
            .await
    }
}
