//! Ring API payloads.
//!
//! Only the fields the exporter consumes are modelled; unknown fields are
//! ignored so additions on Ring's side never break decoding.

use serde::{Deserialize, Serialize};

/// A doorbell returned by the devices endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DoorBot {
    pub id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub battery_life: Option<serde_json::Value>,
}

/// A chime returned by the devices endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Chime {
    pub id: u64,
    #[serde(default)]
    pub description: String,
}

/// A stick-up camera. Served by the doorbot health and history endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Camera {
    pub id: u64,
    #[serde(default)]
    pub description: String,
}

/// Device roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DevicesResponse {
    #[serde(default)]
    pub doorbots: Vec<DoorBot>,
    #[serde(default)]
    pub chimes: Vec<Chime>,
    #[serde(default)]
    pub stickup_cams: Vec<Camera>,
}

impl DevicesResponse {
    pub fn device_count(&self) -> usize {
        self.doorbots.len() + self.chimes.len() + self.stickup_cams.len()
    }
}

/// Health details for one device.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceHealth {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub wifi_name: Option<String>,
    /// Ring sends the percentage as a string (or null).
    #[serde(default)]
    pub battery_percentage: Option<String>,
    #[serde(default)]
    pub battery_percentage_category: Option<String>,
    #[serde(default)]
    pub latest_signal_strength: Option<f64>,
    #[serde(default)]
    pub latest_signal_category: Option<String>,
    #[serde(default)]
    pub average_signal_strength: Option<f64>,
    #[serde(default)]
    pub firmware: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of the doorbot and chime health endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub device_health: DeviceHealth,
}

/// One entry of a device's event history ("ding").
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceEvent {
    #[serde(default)]
    pub id: i64,
    /// RFC 3339 creation time. Kept as text; the ledger parses it.
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub kind: String,
}

impl DeviceEvent {
    pub fn new(id: i64, created_at: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            created_at: created_at.into(),
            kind: kind.into(),
        }
    }
}

/// Account profile from the session endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Body of the session endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub profile: Profile,
}
