//! In-process feed source

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::{FeedKind, FeedSource, PriceListener};

type Listeners = RwLock<Vec<Arc<dyn PriceListener>>>;

/// Feed source that fans published prices out to its subscribers
///
/// Publishing is synchronous and may happen from any thread.
#[derive(Default)]
pub struct LocalFeed {
    bank: Listeners,
    company: Listeners,
}

impl LocalFeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn listeners(&self, feed: FeedKind) -> &Listeners {
        match feed {
            FeedKind::Bank => &self.bank,
            FeedKind::Company => &self.company,
        }
    }

    fn subscribe(&self, feed: FeedKind, listener: Arc<dyn PriceListener>) {
        self.listeners(feed)
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(listener);
        tracing::debug!(%feed, "Listener subscribed");
    }

    /// Deliver a price to every listener on `feed`; returns how many were called
    pub fn publish(&self, feed: FeedKind, symbol: &str, price: f64) -> usize {
        // Clone out so listeners run without holding the lock
        let listeners: Vec<_> = self
            .listeners(feed)
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        for listener in &listeners {
            listener.price_update(symbol, price);
        }
        listeners.len()
    }

    pub fn publish_bank(&self, symbol: &str, price: f64) -> usize {
        self.publish(FeedKind::Bank, symbol, price)
    }

    pub fn publish_company(&self, symbol: &str, price: f64) -> usize {
        self.publish(FeedKind::Company, symbol, price)
    }

    pub fn subscriber_count(&self, feed: FeedKind) -> usize {
        self.listeners(feed)
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl FeedSource for LocalFeed {
    async fn subscribe_bank(&self, listener: Arc<dyn PriceListener>) -> anyhow::Result<()> {
        self.subscribe(FeedKind::Bank, listener);
        Ok(())
    }

    async fn subscribe_company(&self, listener: Arc<dyn PriceListener>) -> anyhow::Result<()> {
        self.subscribe(FeedKind::Company, listener);
        Ok(())
    }
}
