//! Consistency check routine
//!
//! Bank and company checks share one routine parameterized by the feed that
//! scheduled the check. The two sides stay deliberately asymmetric:
//!
//! - A missing counterpart is `SLOW` for a bank check but `INVALID` for a
//!   company check (company price with no bank reference at all).
//! - A bank check only looks at elapsed time since the bank update. A
//!   company check also compares prices once the company answered in time.
//!
//! A check whose sequence no longer matches the stored observation has been
//! superseded by a newer update on the same feed and does nothing.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::book::PriceBook;
use super::types::{CheckTask, PriceObservation};
use crate::alert::{Alert, AlertKind, AlertSink};
use crate::feed::FeedKind;
use crate::telemetry;

/// Result of evaluating a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A newer update replaced the one this check belongs to
    Superseded,
    /// Feeds agree, or the counterpart has already moved past this update
    Clear,
    /// Feeds disagree
    Alert(AlertKind),
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Superseded => "superseded",
            Verdict::Clear => "clear",
            Verdict::Alert(_) => "alert",
        }
    }
}

/// Evaluate `task` against snapshots of both feeds
///
/// `now` is only consulted by bank checks.
pub fn evaluate(
    task: &CheckTask,
    bank: Option<&PriceObservation>,
    company: Option<&PriceObservation>,
    now: Instant,
    throttle: Duration,
) -> Verdict {
    let (own, other) = match task.side {
        FeedKind::Bank => (bank, company),
        FeedKind::Company => (company, bank),
    };

    let own = match own {
        Some(obs) if obs.sequence == task.sequence => obs,
        _ => return Verdict::Superseded,
    };

    let Some(other) = other else {
        return Verdict::Alert(match task.side {
            FeedKind::Bank => AlertKind::CompanyUpdateIsSlow,
            FeedKind::Company => AlertKind::CompanyUpdateIsInvalid,
        });
    };

    // The counterpart already moved after this update; its own check covers it.
    if own.sequence <= other.sequence {
        return Verdict::Clear;
    }

    match task.side {
        FeedKind::Bank => {
            if now.saturating_duration_since(own.observed_at) > throttle {
                Verdict::Alert(AlertKind::CompanyUpdateIsSlow)
            } else {
                Verdict::Clear
            }
        }
        FeedKind::Company => {
            if own.observed_at.saturating_duration_since(other.observed_at) > throttle {
                Verdict::Alert(AlertKind::CompanyUpdateIsSlow)
            } else if !own.same_price(other.price) {
                Verdict::Alert(AlertKind::CompanyUpdateIsInvalid)
            } else {
                Verdict::Clear
            }
        }
    }
}

/// Runs check tasks against the live price book and raises alerts
pub struct Checker {
    book: Arc<PriceBook>,
    sink: Arc<dyn AlertSink>,
    throttle: Duration,
}

impl Checker {
    pub fn new(book: Arc<PriceBook>, sink: Arc<dyn AlertSink>, throttle: Duration) -> Self {
        Self {
            book,
            sink,
            throttle,
        }
    }

    /// Evaluate `task` now; reads snapshots only, never mutates the book
    pub fn run(&self, task: &CheckTask) -> Verdict {
        let own = self.book.latest(task.side, &task.symbol);
        let other = self.book.latest(task.side.counterpart(), &task.symbol);
        let (bank, company) = match task.side {
            FeedKind::Bank => (own, other),
            FeedKind::Company => (other, own),
        };

        let verdict = evaluate(
            task,
            bank.as_ref(),
            company.as_ref(),
            Instant::now(),
            self.throttle,
        );
        telemetry::record_check(task.side, verdict);

        match verdict {
            Verdict::Superseded => {
                tracing::trace!(
                    symbol = %task.symbol,
                    side = %task.side,
                    sequence = task.sequence,
                    "Check superseded"
                );
            }
            Verdict::Clear => {
                tracing::trace!(
                    symbol = %task.symbol,
                    side = %task.side,
                    sequence = task.sequence,
                    "Check clear"
                );
            }
            Verdict::Alert(kind) => {
                self.raise(Alert::new(kind, task.symbol.clone(), bank, company));
            }
        }
        verdict
    }

    /// Log the alert and hand its message to the sink
    ///
    /// A panicking sink is contained here so it cannot take down a handler
    /// or a worker.
    pub fn raise(&self, alert: Alert) {
        let message = alert.message();
        tracing::error!(
            alert_id = %alert.id,
            kind = %alert.kind,
            symbol = %alert.symbol,
            "{}",
            message
        );
        telemetry::record_alert(alert.kind);

        if panic::catch_unwind(AssertUnwindSafe(|| self.sink.alert(&message))).is_err() {
            tracing::error!(alert_id = %alert.id, "Alert sink panicked, alert dropped");
        }
    }

    pub fn throttle(&self) -> Duration {
        self.throttle
    }
}
