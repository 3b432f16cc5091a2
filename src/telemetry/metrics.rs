//! Prometheus metrics
//!
//! Without an installed recorder every call here is a no-op.

use crate::alert::AlertKind;
use crate::feed::FeedKind;
use crate::monitor::{UpdateOutcome, Verdict};

const UPDATES_TOTAL: &str = "price_monitor_updates_total";
const CHECKS_TOTAL: &str = "price_monitor_checks_total";
const ALERTS_TOTAL: &str = "price_monitor_alerts_total";
const TRACKED_SYMBOLS: &str = "price_monitor_tracked_symbols";

/// Count a handled feed update
pub fn record_update(feed: FeedKind, outcome: UpdateOutcome) {
    metrics::counter!(UPDATES_TOTAL, "feed" => feed.as_str(), "outcome" => outcome.as_str())
        .increment(1);
}

/// Count an evaluated check
pub fn record_check(side: FeedKind, verdict: Verdict) {
    metrics::counter!(CHECKS_TOTAL, "side" => side.as_str(), "verdict" => verdict.as_str())
        .increment(1);
}

/// Count a raised alert
pub fn record_alert(kind: AlertKind) {
    metrics::counter!(ALERTS_TOTAL, "kind" => kind.as_str()).increment(1);
}

/// Set the number of symbols seen on a feed
pub fn set_tracked_symbols(feed: FeedKind, count: usize) {
    metrics::gauge!(TRACKED_SYMBOLS, "feed" => feed.as_str()).set(count as f64);
}
