//! `ring-exporter monitor`: poll devices and serve metrics until Ctrl-C.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

use crate::auth::open_authorized_session;
use crate::config::{load_config, state_file_for, Config};
use crate::error::{ExporterError, ExporterResult, ResultExt};
use crate::ledger::Ledger;
use crate::metrics::{start_metrics_server, MetricsRegistry};
use crate::poller::Poller;
use crate::traits::DeviceApi;

/// Handle the `monitor` command.
pub async fn handle_monitor_command(config_path: &Path) -> ExporterResult<()> {
    let config = load_config(config_path).context("load config")?;
    let ledger = Arc::new(Ledger::load(state_file_for(config_path)));

    let session = open_authorized_session(&config.api_config, ledger.as_ref(), None)
        .await
        .context("open session")?;

    run_monitor(&config, Arc::new(session), ledger, tokio::signal::ctrl_c()).await
}

/// Poll once, serve metrics, and run the timers until `shutdown` resolves.
///
/// The poller is stopped and the ledger saved on every exit path, including
/// a metrics server that fails to bind.
pub async fn run_monitor<F>(
    config: &Config,
    api: Arc<dyn DeviceApi>,
    ledger: Arc<Ledger>,
    shutdown: F,
) -> ExporterResult<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    let registry = Arc::new(MetricsRegistry::new().context("create metrics registry")?);
    let poller = Arc::new(Poller::new(
        api,
        ledger,
        registry.clone(),
        config.poll_interval(),
        config.save_interval(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller_handle = poller.start(shutdown_rx).await;

    let result = match start_metrics_server(&config.web_config, registry).await {
        Ok((server_handle, _addr)) => {
            let signal = shutdown.await.context("wait for shutdown signal");
            tracing::info!("Shutting down");
            server_handle.abort();
            signal
        }
        Err(e) => Err(ExporterError::from(e).with_context("start metrics server")),
    };

    let _ = shutdown_tx.send(true);
    if let Err(e) = poller_handle.await {
        tracing::error!("Poller task failed: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockDeviceApi;
    use crate::api::types::{DeviceEvent, DevicesResponse, DoorBot};
    use tempfile::TempDir;

    fn front_door_api() -> MockDeviceApi {
        let api = MockDeviceApi::new();
        api.set_roster(DevicesResponse {
            doorbots: vec![DoorBot {
                id: 1,
                description: "Front".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        });
        api.set_health(1, Default::default());
        api.set_history(
            1,
            vec![
                DeviceEvent::new(1, "2024-05-01T10:00:00Z", "ding"),
                DeviceEvent::new(2, "2024-05-01T11:00:00Z", "ding"),
            ],
        );
        api
    }

    #[tokio::test]
    async fn test_bind_failure_still_saves_ledger() {
        let dir = TempDir::new().unwrap();
        let state = dir.path().join("ring-state.json");
        let taken = std::net::TcpListener::bind("0.0.0.0:0").unwrap();

        let mut config = Config::with_defaults();
        config.web_config.port = taken.local_addr().unwrap().port();

        let result = run_monitor(
            &config,
            Arc::new(front_door_api()),
            Arc::new(Ledger::new(&state)),
            std::future::pending(),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ExporterError::WithContext {
                operation: "start metrics server",
                ..
            }
        ));
        assert_eq!(Ledger::load(&state).count(1), 2);
    }

    #[tokio::test]
    async fn test_shutdown_signal_saves_ledger() {
        let dir = TempDir::new().unwrap();
        let state = dir.path().join("ring-state.json");
        let free_port = std::net::TcpListener::bind("0.0.0.0:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let mut config = Config::with_defaults();
        config.web_config.port = free_port;

        run_monitor(
            &config,
            Arc::new(front_door_api()),
            Arc::new(Ledger::new(&state)),
            async { Ok(()) },
        )
        .await
        .unwrap();

        assert_eq!(Ledger::load(&state).count(1), 2);
    }
}
