//! Read-only device API used by the poller.

use async_trait::async_trait;

use crate::api::types::{DeviceEvent, DevicesResponse, HealthResponse};
use crate::error::ApiError;

/// The Ring endpoints a poll cycle reads.
///
/// Implemented by the authorized [`Session`](crate::api::Session) and by
/// [`MockDeviceApi`](crate::adapters::mock::MockDeviceApi) in tests.
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Fetch the device roster.
    async fn get_devices(&self) -> Result<DevicesResponse, ApiError>;

    /// Fetch health for a doorbot or camera.
    async fn get_doorbot_health(&self, id: u64) -> Result<HealthResponse, ApiError>;

    /// Fetch health for a chime.
    async fn get_chime_health(&self, id: u64) -> Result<HealthResponse, ApiError>;

    /// Fetch the most recent events for a doorbot or camera.
    async fn get_doorbot_history(&self, id: u64) -> Result<Vec<DeviceEvent>, ApiError>;
}
