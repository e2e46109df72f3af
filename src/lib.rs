//! Ring exporter - republishes Ring device health and doorbell event counts
//! as Prometheus metrics.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod poller;
pub mod traits;
