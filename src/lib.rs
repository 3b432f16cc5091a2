//! price-monitor: cross-checks a bank price feed against a company price feed
//!
//! This library provides:
//! - Feed source and listener traits, plus an in-process feed and script replay
//! - The reconciliation monitor with sequence-guarded deferred checks
//! - Alert kinds, message rendering, and alert sinks
//! - TOML configuration
//! - Logging and Prometheus metrics

pub mod alert;
pub mod cli;
pub mod config;
pub mod feed;
pub mod monitor;
pub mod telemetry;
