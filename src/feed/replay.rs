//! Scripted feed replay
//!
//! Scripts are JSON lines, one update per line:
//!
//! ```text
//! {"feed":"bank","symbol":"1.HK","price":91.0}
//! {"feed":"company","symbol":"1.HK","price":91.0,"delay_ms":250}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::{FeedKind, LocalFeed};

/// One scripted update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayEvent {
    pub feed: FeedKind,
    pub symbol: String,
    pub price: f64,
    /// Pause before publishing this event
    #[serde(default)]
    pub delay_ms: u64,
}

/// Ordered list of scripted updates
#[derive(Debug, Clone, Default)]
pub struct ReplayScript {
    pub events: Vec<ReplayEvent>,
}

impl ReplayScript {
    /// Parse a JSON-lines script
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let mut events = Vec::new();
        for (index, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let event: ReplayEvent = serde_json::from_str(line)
                .with_context(|| format!("invalid replay event on line {}", index + 1))?;
            events.push(event);
        }
        Ok(Self { events })
    }

    /// Load a script from disk
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read replay script {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Publish every event through `feed`, honoring delays; returns events played
    pub async fn play(&self, feed: &LocalFeed) -> usize {
        for event in &self.events {
            if event.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(event.delay_ms)).await;
            }
            let delivered = feed.publish(event.feed, &event.symbol, event.price);
            tracing::trace!(
                feed = %event.feed,
                symbol = %event.symbol,
                price = event.price,
                delivered,
                "Replayed event"
            );
        }
        self.events.len()
    }
}
