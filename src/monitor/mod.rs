//! Reconciliation monitor module
//!
//! Keeps the latest bank and company observation per symbol and raises
//! alerts when the company feed disagrees with, or falls behind, the bank
//! feed.
//!
//! Every accepted update takes a process-wide sequence number and schedules
//! a check bound to it:
//!
//! 1. Bank updates schedule a check after `throttle + guard`
//! 2. Company updates schedule a check immediately
//! 3. A check whose update has since been replaced exits without alerting
//! 4. A repeated company price alerts straight away; a repeated bank price is ignored

mod book;
mod check;
mod reconciler;
mod scheduler;
mod sequence;
mod types;

pub use book::PriceBook;
pub use check::{evaluate, Checker, Verdict};
pub use reconciler::ReconciliationMonitor;
pub use scheduler::CheckScheduler;
pub use sequence::{AtomicSequence, SequenceSource};
pub use types::{CheckTask, MonitorError, PriceObservation, Timing, UpdateOutcome};
