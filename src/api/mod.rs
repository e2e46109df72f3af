//! Ring clients API.
//!
//! - [`Session`] - authorized client for the device endpoints
//! - [`types`] - the JSON payloads the exporter consumes

pub mod session;
pub mod types;

pub use session::{Session, API_VERSION};
pub use types::{Camera, Chime, DeviceEvent, DeviceHealth, DevicesResponse, DoorBot, HealthResponse};
