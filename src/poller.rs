//! Periodic device polling.
//!
//! Each poll cycle reads the device roster, publishes health readings and
//! feeds doorbot and camera history into the [`Ledger`]. A separate save
//! tick flushes the ledger to disk. Per-device failures skip that device
//! for the current cycle only.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::api::types::DeviceHealth;
use crate::error::{ApiError, LedgerError};
use crate::ledger::Ledger;
use crate::metrics::{DeviceKind, DeviceLabels, Metric, MetricsSink};
use crate::traits::DeviceApi;

/// What one poll cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Devices in the roster.
    pub devices: usize,
    /// Devices skipped because a health or history fetch failed.
    pub skipped: usize,
}

/// Drives the poll and save timers.
pub struct Poller {
    api: Arc<dyn DeviceApi>,
    ledger: Arc<Ledger>,
    sink: Arc<dyn MetricsSink>,
    poll_interval: Duration,
    save_interval: Duration,
}

impl Poller {
    pub fn new(
        api: Arc<dyn DeviceApi>,
        ledger: Arc<Ledger>,
        sink: Arc<dyn MetricsSink>,
        poll_interval: Duration,
        save_interval: Duration,
    ) -> Self {
        Self {
            api,
            ledger,
            sink,
            poll_interval,
            save_interval,
        }
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Run one poll cycle.
    ///
    /// Only a failed roster fetch fails the cycle; anything that goes wrong
    /// for a single device is logged and counted in [`PollSummary::skipped`].
    pub async fn poll_once(&self) -> Result<PollSummary, ApiError> {
        let devices = self.api.get_devices().await?;
        let mut summary = PollSummary {
            devices: devices.device_count(),
            skipped: 0,
        };

        for doorbot in &devices.doorbots {
            if !self
                .poll_doorbot(doorbot.id, &doorbot.description, DeviceKind::Doorbot)
                .await
            {
                summary.skipped += 1;
            }
        }

        for camera in &devices.stickup_cams {
            if !self
                .poll_doorbot(camera.id, &camera.description, DeviceKind::Camera)
                .await
            {
                summary.skipped += 1;
            }
        }

        for chime in &devices.chimes {
            match self.api.get_chime_health(chime.id).await {
                Ok(health) => {
                    self.publish_health(&chime.description, DeviceKind::Chime, &health.device_health)
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping {} because of failed health fetch: {}",
                        chime.description,
                        e
                    );
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Health then history for a doorbot-like device. Returns false if skipped.
    async fn poll_doorbot(&self, id: u64, description: &str, kind: DeviceKind) -> bool {
        let health = match self.api.get_doorbot_health(id).await {
            Ok(health) => health,
            Err(e) => {
                tracing::warn!(
                    "Skipping {} because of failed health fetch: {}",
                    description,
                    e
                );
                return false;
            }
        };
        self.publish_health(description, kind, &health.device_health);

        let events = match self.api.get_doorbot_history(id).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(
                    "Skipping history of {} because of failed fetch: {}",
                    description,
                    e
                );
                return false;
            }
        };

        let count = match self.ledger.absorb_events(id, &events) {
            Ok(count) => count,
            Err(e) => {
                tracing::info!("{}: {}", description, e);
                self.ledger.count(id)
            }
        };
        let labels = DeviceLabels::new(description, kind);
        self.sink
            .set_gauge(Metric::DingsTotal, &labels, count as f64);
        tracing::info!("Device {} has current ding count {}", description, count);
        true
    }

    fn publish_health(&self, description: &str, kind: DeviceKind, health: &DeviceHealth) {
        let labels = DeviceLabels::new(description, kind);

        if let Some(battery) = &health.battery_percentage {
            let value = match battery.trim().parse::<f64>() {
                Ok(value) => {
                    tracing::info!("Device {} has battery pct {}", description, value);
                    value
                }
                Err(_) => {
                    tracing::info!(
                        "Failed to parse battery pct {:?} of {}",
                        battery,
                        description
                    );
                    f64::NAN
                }
            };
            self.sink.set_gauge(Metric::BatteryPct, &labels, value);
        }

        if let Some(signal) = health.latest_signal_strength {
            tracing::info!("Device {} has wifi strength {}", description, signal);
            self.sink.set_gauge(Metric::WifiStrengthDbm, &labels, signal);
        }
    }

    async fn poll_logged(&self) {
        match self.poll_once().await {
            Ok(summary) => tracing::debug!(
                "Poll complete: {} devices, {} skipped",
                summary.devices,
                summary.skipped
            ),
            Err(e) => tracing::warn!("Failed to retrieve device info: {}", e),
        }
    }

    /// Save the ledger, logging instead of failing.
    pub fn save(&self) -> Result<(), LedgerError> {
        let result = self.ledger.save();
        if let Err(e) = &result {
            tracing::error!("Failed to save state: {}", e);
        }
        result
    }

    /// Run the poll and save timers until `shutdown` flips to true or its
    /// sender is dropped, then save one last time.
    ///
    /// The first ticks fire one full period after the call; callers poll
    /// once beforehand (see [`Poller::start`]).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut poll_tick = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        poll_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut save_tick = interval_at(Instant::now() + self.save_interval, self.save_interval);
        save_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "Poller started (poll every {}s, save every {}s)",
            self.poll_interval.as_secs(),
            self.save_interval.as_secs()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = poll_tick.tick() => self.poll_logged().await,
                _ = save_tick.tick() => {
                    let _ = self.save();
                }
            }
        }

        let _ = self.save();
        tracing::info!("Poller stopped");
    }

    /// Poll once, then spawn the timer loop.
    ///
    /// The first poll completes before this returns, so published metrics are
    /// populated as soon as the server starts.
    pub async fn start(self: Arc<Self>, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        self.poll_logged().await;
        tokio::spawn(async move { self.run(shutdown).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockDeviceApi;
    use crate::api::types::{Camera, Chime, DeviceEvent, DevicesResponse, DoorBot};
    use crate::metrics::MetricsRegistry;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        api: MockDeviceApi,
        registry: Arc<MetricsRegistry>,
        poller: Poller,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let api = MockDeviceApi::new();
        let registry = Arc::new(MetricsRegistry::new().unwrap());
        let ledger = Arc::new(Ledger::new(dir.path().join("ring-state.json")));
        let poller = Poller::new(
            Arc::new(api.clone()),
            ledger,
            registry.clone(),
            Duration::from_secs(300),
            Duration::from_secs(300),
        );
        Fixture {
            _dir: dir,
            api,
            registry,
            poller,
        }
    }

    fn health(battery: Option<&str>, signal: Option<f64>) -> DeviceHealth {
        DeviceHealth {
            battery_percentage: battery.map(str::to_string),
            latest_signal_strength: signal,
            ..Default::default()
        }
    }

    fn doorbot(id: u64, description: &str) -> DoorBot {
        DoorBot {
            id,
            description: description.to_string(),
            ..Default::default()
        }
    }

    fn ding(at: &str) -> DeviceEvent {
        DeviceEvent::new(1, at, "ding")
    }

    #[tokio::test]
    async fn test_poll_publishes_health_and_dings() {
        let f = fixture();
        f.api.set_roster(DevicesResponse {
            doorbots: vec![doorbot(1, "Front")],
            chimes: vec![Chime {
                id: 2,
                description: "Hall".to_string(),
            }],
            stickup_cams: vec![Camera {
                id: 3,
                description: "Yard".to_string(),
            }],
        });
        f.api.set_health(1, health(Some("87"), Some(-52.0)));
        f.api.set_health(2, health(None, Some(-40.0)));
        f.api.set_health(3, health(Some("100"), None));
        f.api.set_history(
            1,
            vec![ding("2024-05-01T10:00:00Z"), ding("2024-05-01T11:00:00Z")],
        );
        f.api.set_history(3, vec![ding("2024-05-01T09:00:00Z")]);

        let summary = f.poller.poll_once().await.unwrap();
        assert_eq!(summary, PollSummary { devices: 3, skipped: 0 });

        let front = DeviceLabels::new("Front", DeviceKind::Doorbot);
        assert_eq!(f.registry.get(Metric::BatteryPct, &front), Some(87.0));
        assert_eq!(f.registry.get(Metric::WifiStrengthDbm, &front), Some(-52.0));
        assert_eq!(f.registry.get(Metric::DingsTotal, &front), Some(2.0));

        let hall = DeviceLabels::new("Hall", DeviceKind::Chime);
        assert_eq!(f.registry.get(Metric::WifiStrengthDbm, &hall), Some(-40.0));
        assert!(f.registry.get(Metric::BatteryPct, &hall).is_none());
        assert!(f.registry.get(Metric::DingsTotal, &hall).is_none());

        let yard = DeviceLabels::new("Yard", DeviceKind::Camera);
        assert_eq!(f.registry.get(Metric::DingsTotal, &yard), Some(1.0));
        assert!(!f.api.calls().contains(&"history:2".to_string()));
    }

    #[tokio::test]
    async fn test_unparsable_battery_publishes_nan() {
        let f = fixture();
        f.api.set_roster(DevicesResponse {
            doorbots: vec![doorbot(1, "Front")],
            ..Default::default()
        });
        f.api.set_health(1, health(Some("unknown"), None));
        f.api.set_history(1, vec![]);

        f.poller.poll_once().await.unwrap();

        let front = DeviceLabels::new("Front", DeviceKind::Doorbot);
        assert!(f.registry.get(Metric::BatteryPct, &front).unwrap().is_nan());
    }

    #[tokio::test]
    async fn test_health_failure_skips_only_that_device() {
        let f = fixture();
        f.api.set_roster(DevicesResponse {
            doorbots: vec![doorbot(1, "Broken"), doorbot(2, "Fine")],
            ..Default::default()
        });
        f.api.fail_health(
            1,
            ApiError::Status {
                status: 500,
                body: String::new(),
            },
        );
        f.api.set_health(2, health(Some("50"), None));
        f.api.set_history(2, vec![ding("2024-05-01T10:00:00Z")]);

        let summary = f.poller.poll_once().await.unwrap();

        assert_eq!(summary.skipped, 1);
        assert!(!f.api.calls().contains(&"history:1".to_string()));
        let fine = DeviceLabels::new("Fine", DeviceKind::Doorbot);
        assert_eq!(f.registry.get(Metric::DingsTotal, &fine), Some(1.0));
    }

    #[tokio::test]
    async fn test_history_failure_keeps_health_and_ledger() {
        let f = fixture();
        f.api.set_roster(DevicesResponse {
            doorbots: vec![doorbot(1, "Front")],
            ..Default::default()
        });
        f.api.set_health(1, health(Some("60"), None));
        f.api.set_history(1, vec![ding("2024-05-01T10:00:00Z")]);
        f.poller.poll_once().await.unwrap();

        f.api.fail_history(
            1,
            ApiError::Decode {
                message: "truncated".to_string(),
            },
        );
        let summary = f.poller.poll_once().await.unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(f.poller.ledger().count(1), 1);
        let front = DeviceLabels::new("Front", DeviceKind::Doorbot);
        assert_eq!(f.registry.get(Metric::BatteryPct, &front), Some(60.0));
    }

    #[tokio::test]
    async fn test_unparsable_history_publishes_current_count() {
        let f = fixture();
        f.api.set_roster(DevicesResponse {
            doorbots: vec![doorbot(1, "Front")],
            ..Default::default()
        });
        f.api.set_health(1, health(None, None));
        f.api.set_history(1, vec![ding("garbage")]);

        let summary = f.poller.poll_once().await.unwrap();

        assert_eq!(summary.skipped, 0);
        let front = DeviceLabels::new("Front", DeviceKind::Doorbot);
        assert_eq!(f.registry.get(Metric::DingsTotal, &front), Some(0.0));
    }

    #[tokio::test]
    async fn test_roster_failure_fails_cycle() {
        let f = fixture();
        f.api.fail_roster(ApiError::Status {
            status: 401,
            body: String::new(),
        });
        assert!(f.poller.poll_once().await.is_err());
        assert!(f.registry.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_polls_do_not_double_count() {
        let f = fixture();
        f.api.set_roster(DevicesResponse {
            doorbots: vec![doorbot(1, "Front")],
            ..Default::default()
        });
        f.api.set_health(1, health(None, None));
        f.api.set_history(
            1,
            vec![ding("2024-05-01T10:00:00Z"), ding("2024-05-01T11:00:00Z")],
        );

        f.poller.poll_once().await.unwrap();
        f.poller.poll_once().await.unwrap();

        let front = DeviceLabels::new("Front", DeviceKind::Doorbot);
        assert_eq!(f.registry.get(Metric::DingsTotal, &front), Some(2.0));
    }

    #[tokio::test]
    async fn test_start_polls_before_returning_and_saves_on_shutdown() {
        let f = fixture();
        f.api.set_roster(DevicesResponse {
            doorbots: vec![doorbot(1, "Front")],
            ..Default::default()
        });
        f.api.set_health(1, health(Some("90"), None));
        f.api.set_history(1, vec![ding("2024-05-01T10:00:00Z")]);

        let state_path = f.poller.ledger().path().to_path_buf();
        let registry = f.registry.clone();
        let poller = Arc::new(f.poller);
        let (tx, rx) = watch::channel(false);

        let handle = poller.clone().start(rx).await;
        let front = DeviceLabels::new("Front", DeviceKind::Doorbot);
        assert_eq!(registry.get(Metric::BatteryPct, &front), Some(90.0));
        assert!(!state_path.exists());

        tx.send(true).unwrap();
        handle.await.unwrap();

        let reloaded = Ledger::load(&state_path);
        assert_eq!(reloaded.count(1), 1);
    }
}
