//! HTTP exposition of the metrics registry.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::task::JoinHandle;

use super::registry::{MetricsRegistry, TEXT_FORMAT};
use crate::config::WebConfig;

/// Start the metrics server on all interfaces at `config.port`.
pub async fn start_metrics_server(
    config: &WebConfig,
    registry: Arc<MetricsRegistry>,
) -> std::io::Result<(JoinHandle<()>, SocketAddr)> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    start_metrics_server_on(addr, &config.metrics_route, registry).await
}

/// Start the metrics server on a specific address.
///
/// Returns the server task and the bound address, which differs from
/// `addr` when binding port 0 in tests.
pub async fn start_metrics_server_on(
    addr: SocketAddr,
    route: &str,
    registry: Arc<MetricsRegistry>,
) -> std::io::Result<(JoinHandle<()>, SocketAddr)> {
    let app = Router::new()
        .route(route, get(metrics_handler))
        .with_state(registry);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Serving metrics on http://{}{}", actual_addr, route);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Metrics server error: {}", e);
        }
    });

    Ok((handle, actual_addr))
}

async fn metrics_handler(State(registry): State<Arc<MetricsRegistry>>) -> Response {
    match registry.render() {
        Ok(text) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], text).into_response(),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
