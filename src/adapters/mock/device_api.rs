//! Scripted device API for poller tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::types::{DeviceEvent, DeviceHealth, DevicesResponse, HealthResponse};
use crate::error::ApiError;
use crate::traits::DeviceApi;

#[derive(Debug, Default)]
struct Script {
    roster: Option<DevicesResponse>,
    roster_error: Option<ApiError>,
    health: HashMap<u64, Result<DeviceHealth, ApiError>>,
    history: HashMap<u64, Result<Vec<DeviceEvent>, ApiError>>,
    calls: Vec<String>,
}

/// Device API returning scripted roster, health and history per device id.
///
/// Doorbot and chime health share one table keyed by id. Unscripted
/// health or history lookups fail with a 404 status.
#[derive(Debug, Clone, Default)]
pub struct MockDeviceApi {
    script: Arc<Mutex<Script>>,
}

fn not_found(what: &str, id: u64) -> ApiError {
    ApiError::Status {
        status: 404,
        body: format!("no {} for {}", what, id),
    }
}

impl MockDeviceApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the roster returned by `get_devices`.
    pub fn set_roster(&self, roster: DevicesResponse) {
        let mut script = self.script.lock().unwrap();
        script.roster = Some(roster);
        script.roster_error = None;
    }

    /// Make `get_devices` fail.
    pub fn fail_roster(&self, error: ApiError) {
        self.script.lock().unwrap().roster_error = Some(error);
    }

    pub fn set_health(&self, id: u64, health: DeviceHealth) {
        self.script.lock().unwrap().health.insert(id, Ok(health));
    }

    pub fn fail_health(&self, id: u64, error: ApiError) {
        self.script.lock().unwrap().health.insert(id, Err(error));
    }

    pub fn set_history(&self, id: u64, events: Vec<DeviceEvent>) {
        self.script.lock().unwrap().history.insert(id, Ok(events));
    }

    pub fn fail_history(&self, id: u64, error: ApiError) {
        self.script.lock().unwrap().history.insert(id, Err(error));
    }

    /// Calls received so far, e.g. `"devices"`, `"doorbot_health:7"`.
    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) {
        self.script.lock().unwrap().calls.push(call);
    }

    fn health(&self, id: u64) -> Result<HealthResponse, ApiError> {
        match self.script.lock().unwrap().health.get(&id) {
            Some(Ok(health)) => Ok(HealthResponse {
                device_health: health.clone(),
            }),
            Some(Err(e)) => Err(e.clone()),
            None => Err(not_found("health", id)),
        }
    }
}

#[async_trait]
impl DeviceApi for MockDeviceApi {
    async fn get_devices(&self) -> Result<DevicesResponse, ApiError> {
        self.record("devices".to_string());
        let script = self.script.lock().unwrap();
        if let Some(e) = &script.roster_error {
            return Err(e.clone());
        }
        Ok(script.roster.clone().unwrap_or_default())
    }

    async fn get_doorbot_health(&self, id: u64) -> Result<HealthResponse, ApiError> {
        self.record(format!("doorbot_health:{}", id));
        self.health(id)
    }

    async fn get_chime_health(&self, id: u64) -> Result<HealthResponse, ApiError> {
        self.record(format!("chime_health:{}", id));
        self.health(id)
    }

    async fn get_doorbot_history(&self, id: u64) -> Result<Vec<DeviceEvent>, ApiError> {
        self.record(format!("history:{}", id));
        match self.script.lock().unwrap().history.get(&id) {
            Some(result) => result.clone(),
            None => Err(not_found("history", id)),
        }
    }
}
