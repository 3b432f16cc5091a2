//! Run command implementation

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::alert::LogAlertSink;
use crate::config::MonitorConfig;
use crate::feed::{LocalFeed, ReplayScript};
use crate::monitor::ReconciliationMonitor;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON-lines feed script to replay
    #[arg(short, long)]
    pub script: PathBuf,

    /// Override the configured throttle (milliseconds)
    #[arg(long)]
    pub throttle_ms: Option<u64>,
}

impl RunArgs {
    /// Monitor config with command-line overrides applied
    pub fn effective_config(&self, base: &MonitorConfig) -> anyhow::Result<MonitorConfig> {
        let mut config = base.clone();
        if let Some(throttle_ms) = self.throttle_ms {
            config.throttle_ms = throttle_ms;
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn execute(&self, base: &MonitorConfig) -> anyhow::Result<()> {
        let config = self.effective_config(base)?;
        let script = ReplayScript::load(&self.script)?;
        tracing::info!(
            script = %self.script.display(),
            events = script.len(),
            throttle_ms = config.throttle_ms,
            "Replaying feed script"
        );

        let feed = Arc::new(LocalFeed::new());
        let monitor = ReconciliationMonitor::new(feed.clone(), Arc::new(LogAlertSink::new()), config);
        monitor.start().await?;

        tokio::select! {
            played = script.play(&feed) => {
                tracing::info!(played, "Feed script finished");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted, stopping replay");
            }
        }

        monitor.stop().await?;
        Ok(())
    }
}
