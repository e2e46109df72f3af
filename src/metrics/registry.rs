//! Prometheus registry holding the device gauges.

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use super::{DeviceLabels, Metric, MetricsSink};

/// Content type of [`MetricsRegistry::render`] output.
pub use prometheus::TEXT_FORMAT;

const LABEL_NAMES: [&str; 2] = ["description", "type"];

/// One `GaugeVec` per [`Metric`], registered in a private registry.
pub struct MetricsRegistry {
    registry: Registry,
    battery: GaugeVec,
    wifi: GaugeVec,
    dings: GaugeVec,
}

impl MetricsRegistry {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let battery = register_gauge_vec(&registry, Metric::BatteryPct)?;
        let wifi = register_gauge_vec(&registry, Metric::WifiStrengthDbm)?;
        let dings = register_gauge_vec(&registry, Metric::DingsTotal)?;
        Ok(Self {
            registry,
            battery,
            wifi,
            dings,
        })
    }

    fn vec(&self, metric: Metric) -> &GaugeVec {
        match metric {
            Metric::BatteryPct => &self.battery,
            Metric::WifiStrengthDbm => &self.wifi,
            Metric::DingsTotal => &self.dings,
        }
    }

    /// Current value of a series, if it was ever set.
    pub fn get(&self, metric: Metric, labels: &DeviceLabels) -> Option<f64> {
        let kind = labels.kind().as_str();
        self.registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == metric.name())
            .flat_map(|family| family.get_metric())
            .find(|series| {
                series.get_label().iter().all(|pair| match pair.get_name() {
                    "description" => pair.get_value() == labels.description(),
                    "type" => pair.get_value() == kind,
                    _ => false,
                })
            })
            .map(|series| series.get_gauge().get_value())
    }

    /// Number of series currently held.
    pub fn len(&self) -> usize {
        self.registry
            .gather()
            .iter()
            .map(|family: &MetricFamily| family.get_metric().len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode every series in the Prometheus text exposition format.
    ///
    /// Metrics without any series are omitted.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn register_gauge_vec(registry: &Registry, metric: Metric) -> prometheus::Result<GaugeVec> {
    let gauge = GaugeVec::new(Opts::new(metric.name(), metric.help()), &LABEL_NAMES)?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

impl MetricsSink for MetricsRegistry {
    fn set_gauge(&self, metric: Metric, labels: &DeviceLabels, value: f64) {
        self.vec(metric)
            .with_label_values(&[labels.description(), labels.kind().as_str()])
            .set(value);
    }
}
