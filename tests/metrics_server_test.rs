//! HTTP exposition of the metrics registry.

use ring_exporter::metrics::{
    start_metrics_server_on, DeviceKind, DeviceLabels, Metric, MetricsRegistry, MetricsSink,
};
use std::net::SocketAddr;
use std::sync::Arc;

async fn serve(route: &str, registry: Arc<MetricsRegistry>) -> SocketAddr {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let (_handle, bound) = start_metrics_server_on(addr, route, registry)
        .await
        .expect("bind metrics server");
    bound
}

#[tokio::test]
async fn test_scrape_returns_text_format() {
    let registry = Arc::new(MetricsRegistry::new().unwrap());
    let labels = DeviceLabels::new("Front \"Door\"", DeviceKind::Doorbot);
    registry.set_gauge(Metric::BatteryPct, &labels, 87.0);
    registry.set_gauge(Metric::DingsTotal, &labels, 4.0);

    let addr = serve("/metrics", registry.clone()).await;
    let response = reqwest::get(format!("http://{}/metrics", addr)).await.unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = response.text().await.unwrap();
    assert!(body.contains("# TYPE ring_device_battery_pct gauge"));
    assert!(body.contains("ring_device_battery_pct{description=\"Front _Door_\",type=\"doorbot\"} 87"));
    assert!(body.contains("ring_device_dings_total{description=\"Front _Door_\",type=\"doorbot\"} 4"));
    assert!(!body.contains("ring_device_wifi_strength_dbm"));
}

#[tokio::test]
async fn test_scrape_reflects_later_updates() {
    let registry = Arc::new(MetricsRegistry::new().unwrap());
    let addr = serve("/metrics", registry.clone()).await;
    let url = format!("http://{}/metrics", addr);

    assert_eq!(reqwest::get(&url).await.unwrap().text().await.unwrap(), "");

    registry.set_gauge(
        Metric::WifiStrengthDbm,
        &DeviceLabels::new("Hall", DeviceKind::Chime),
        -40.0,
    );
    let body = reqwest::get(&url).await.unwrap().text().await.unwrap();
    assert!(body.contains("ring_device_wifi_strength_dbm{description=\"Hall\",type=\"chime\"} -40"));
}

#[tokio::test]
async fn test_custom_route_only() {
    let registry = Arc::new(MetricsRegistry::new().unwrap());
    let addr = serve("/ring", registry).await;

    let ok = reqwest::get(format!("http://{}/ring", addr)).await.unwrap();
    assert_eq!(ok.status(), 200);

    let missing = reqwest::get(format!("http://{}/metrics", addr)).await.unwrap();
    assert_eq!(missing.status(), 404);
}
