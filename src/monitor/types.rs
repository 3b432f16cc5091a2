//! Reconciliation monitor types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::feed::FeedKind;

/// One accepted price update on one feed
///
/// Immutable once constructed. `observed_at` is monotonic and drives all
/// elapsed-time decisions; `received_at` is wall-clock and only rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceObservation {
    pub symbol: String,
    pub price: f64,
    #[serde(skip)]
    pub observed_at: Instant,
    pub received_at: DateTime<Utc>,
    /// Process-wide sequence shared by both feeds
    pub sequence: u64,
}

impl PriceObservation {
    /// Create an observation stamped with the current time
    pub fn new(symbol: impl Into<String>, price: f64, sequence: u64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            observed_at: Instant::now(),
            received_at: Utc::now(),
            sequence,
        }
    }

    /// Create an observation with an explicit monotonic timestamp (for testing)
    pub fn at(symbol: impl Into<String>, price: f64, sequence: u64, observed_at: Instant) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            observed_at,
            received_at: Utc::now(),
            sequence,
        }
    }

    /// Whether `price` matches the stored price exactly
    pub fn same_price(&self, price: f64) -> bool {
        self.price == price
    }
}

impl fmt::Display for PriceObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sequence[{}], time[{}], symbol[{}], price[{:.6}]",
            self.sequence,
            self.received_at.timestamp_millis(),
            self.symbol,
            self.price
        )
    }
}

/// When a check task runs relative to its scheduling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Run after the given delay
    Deferred(Duration),
    /// Run as soon as a worker is free
    Immediate,
}

/// Descriptor of one consistency check
///
/// `side` is the feed whose update scheduled the check; `sequence` is that
/// update's sequence, captured at schedule time. The check only evaluates
/// while the stored observation still carries this sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTask {
    pub symbol: String,
    pub sequence: u64,
    pub side: FeedKind,
    pub timing: Timing,
}

impl CheckTask {
    /// Bank check, deferred by throttle plus guard
    pub fn bank(symbol: impl Into<String>, sequence: u64, delay: Duration) -> Self {
        Self {
            symbol: symbol.into(),
            sequence,
            side: FeedKind::Bank,
            timing: Timing::Deferred(delay),
        }
    }

    /// Company check, run immediately
    pub fn company(symbol: impl Into<String>, sequence: u64) -> Self {
        Self {
            symbol: symbol.into(),
            sequence,
            side: FeedKind::Company,
            timing: Timing::Immediate,
        }
    }
}

/// Outcome of handling a single feed update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Stored and a check was scheduled
    Accepted,
    /// Same price as stored; nothing changed
    Duplicate,
    /// Monitor is stopped
    Rejected,
}

impl UpdateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOutcome::Accepted => "accepted",
            UpdateOutcome::Duplicate => "duplicate",
            UpdateOutcome::Rejected => "rejected",
        }
    }
}

/// Monitor lifecycle errors
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The feed source refused a subscription
    #[error("Feed subscription failed: {0}")]
    Subscription(anyhow::Error),
    /// `start` was called on a running monitor
    #[error("Monitor already started")]
    AlreadyStarted,
    /// Outstanding checks did not finish within the shutdown wait
    #[error("Shutdown timed out after {timeout:?} with checks still pending")]
    ShutdownTimedOut { timeout: Duration },
}
