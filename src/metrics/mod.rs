//! Device gauges and their exposition.
//!
//! The poller only hands `(metric, labels, value)` triples to a
//! [`MetricsSink`]; [`MetricsRegistry`] is the in-memory sink rendered by the
//! HTTP server in [`server`].

pub mod registry;
pub mod server;

pub use registry::MetricsRegistry;
pub use server::{start_metrics_server, start_metrics_server_on};

use std::fmt;

/// The gauges the exporter publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    BatteryPct,
    WifiStrengthDbm,
    DingsTotal,
}

impl Metric {
    /// All metrics in exposition order.
    pub const ALL: [Metric; 3] = [Metric::BatteryPct, Metric::WifiStrengthDbm, Metric::DingsTotal];

    pub fn name(self) -> &'static str {
        match self {
            Metric::BatteryPct => "ring_device_battery_pct",
            Metric::WifiStrengthDbm => "ring_device_wifi_strength_dbm",
            Metric::DingsTotal => "ring_device_dings_total",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Metric::BatteryPct => "Device battery level (percent)",
            Metric::WifiStrengthDbm => "Latest wifi strength reading (-dBm)",
            // A gauge over the ledger's counter, not a native counter.
            Metric::DingsTotal => "Best-effort count of total dings",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of the `type` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceKind {
    Doorbot,
    Chime,
    Camera,
}

impl DeviceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Doorbot => "doorbot",
            DeviceKind::Chime => "chime",
            DeviceKind::Camera => "camera",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label set of every device series. The description is sanitized on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceLabels {
    description: String,
    kind: DeviceKind,
}

impl DeviceLabels {
    pub fn new(description: &str, kind: DeviceKind) -> Self {
        Self {
            description: sanitize_label_value(description),
            kind,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }
}

/// Receiver of gauge readings.
pub trait MetricsSink: Send + Sync {
    /// Set one series to `value`, creating it if needed.
    fn set_gauge(&self, metric: Metric, labels: &DeviceLabels, value: f64);
}

/// Replace characters that would break a label value (`\n`, `\r`, `"`, `\`) with `_`.
pub fn sanitize_label_value(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '"' | '\\' => '_',
            c => c,
        })
        .collect()
}
