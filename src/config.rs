//! Configuration types for price-monitor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Reconciliation monitor configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Time budget for the company feed to match a bank update (milliseconds)
    pub throttle_ms: u64,

    /// Extra delay added to bank checks to absorb scheduler jitter (milliseconds)
    #[serde(default = "default_guard_ms")]
    pub guard_ms: u64,

    /// Worker threads executing check tasks
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Upper bound on the shutdown drain wait (seconds)
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

fn default_guard_ms() -> u64 {
    100
}
fn default_workers() -> usize {
    2
}
fn default_shutdown_timeout_secs() -> u64 {
    60 * 60
}

impl MonitorConfig {
    /// Create a config with the given throttle and default everything else
    pub fn with_throttle(throttle: Duration) -> Self {
        Self {
            throttle_ms: throttle.as_millis() as u64,
            guard_ms: default_guard_ms(),
            workers: default_workers(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn guard(&self) -> Duration {
        Duration::from_millis(self.guard_ms)
    }

    /// Delay before a bank check runs: throttle plus guard interval
    pub fn bank_check_delay(&self) -> Duration {
        self.throttle() + self.guard()
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Reject values the monitor cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.throttle_ms == 0 {
            anyhow::bail!("monitor.throttle_ms must be greater than zero");
        }
        if self.workers < 2 {
            anyhow::bail!(
                "monitor.workers must be at least 2, got {}",
                self.workers
            );
        }
        if self.shutdown_timeout_secs == 0 {
            anyhow::bail!("monitor.shutdown_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; metrics are not exported when unset
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.monitor.validate()
    }
}
