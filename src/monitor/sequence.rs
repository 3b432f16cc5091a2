//! Sequence number generation
//!
//! One generator is owned per monitor instance so independent monitors in
//! the same process never share a sequence.

use std::sync::atomic::{AtomicU64, Ordering};

/// Strictly increasing, thread-safe tick generator
pub trait SequenceSource: Send + Sync {
    /// Next sequence number; never repeats and never decreases
    fn next(&self) -> u64;
}

/// Sequence backed by an atomic counter, starting at 1
#[derive(Debug, Default)]
pub struct AtomicSequence {
    counter: AtomicU64,
}

impl AtomicSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting after `last`
    pub fn starting_after(last: u64) -> Self {
        Self {
            counter: AtomicU64::new(last),
        }
    }

    /// Last issued value (0 if none)
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }
}

impl SequenceSource for AtomicSequence {
    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::AcqRel) + 1
    }
}
