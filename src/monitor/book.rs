//! Last-known observation per symbol, per feed

use dashmap::DashMap;

use super::types::PriceObservation;
use crate::feed::FeedKind;

/// Latest accepted observation for every symbol on both feeds
///
/// Entries are replaced whole; readers always get a cloned snapshot, never
/// a reference into the map.
#[derive(Debug, Default)]
pub struct PriceBook {
    bank: DashMap<String, PriceObservation>,
    company: DashMap<String, PriceObservation>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self, feed: FeedKind) -> &DashMap<String, PriceObservation> {
        match feed {
            FeedKind::Bank => &self.bank,
            FeedKind::Company => &self.company,
        }
    }

    /// Snapshot of the latest observation for `symbol` on `feed`
    pub fn latest(&self, feed: FeedKind, symbol: &str) -> Option<PriceObservation> {
        self.slots(feed).get(symbol).map(|entry| entry.value().clone())
    }

    /// Replace the stored observation for the observation's symbol
    ///
    /// Returns true when the symbol had never been seen on `feed`.
    pub fn store(&self, feed: FeedKind, observation: PriceObservation) -> bool {
        self.slots(feed)
            .insert(observation.symbol.clone(), observation)
            .is_none()
    }

    /// Number of symbols seen on `feed`
    pub fn symbol_count(&self, feed: FeedKind) -> usize {
        self.slots(feed).len()
    }
}
