//! Alert sink implementations

use std::sync::Mutex;
use tokio::sync::mpsc;

use super::AlertSink;

/// Writes alerts to the log
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl LogAlertSink {
    pub fn new() -> Self {
        Self
    }
}

impl AlertSink for LogAlertSink {
    fn alert(&self, message: &str) {
        tracing::error!(target: "price_monitor::alerts", "{}", message);
    }
}

/// Keeps every alert message in memory
#[derive(Debug, Default)]
pub struct RecordingAlertSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far, in arrival order
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Number of messages starting with `prefix`
    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.lock().iter().filter(|m| m.starts_with(prefix)).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AlertSink for RecordingAlertSink {
    fn alert(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}

/// Forwards alert messages into a tokio channel
#[derive(Debug, Clone)]
pub struct ChannelAlertSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelAlertSink {
    /// Create a sink and the receiver its messages arrive on
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertSink for ChannelAlertSink {
    fn alert(&self, message: &str) {
        if self.tx.send(message.to_string()).is_err() {
            tracing::warn!("Alert receiver dropped, discarding alert");
        }
    }
}
