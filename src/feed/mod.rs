//! Price feed module
//!
//! Boundary to the upstream bank and company price feeds. A `FeedSource`
//! exposes two independent channels; each delivers `(symbol, price)` to a
//! subscribed `PriceListener` with no ordering between channels.

mod local;
mod replay;
mod types;

pub use local::LocalFeed;
pub use replay::{ReplayEvent, ReplayScript};
pub use types::FeedKind;

use async_trait::async_trait;
use std::sync::Arc;

/// Callback invoked for every price update on a feed channel
///
/// May be called concurrently from several delivery threads.
pub trait PriceListener: Send + Sync {
    fn price_update(&self, symbol: &str, price: f64);
}

impl<F> PriceListener for F
where
    F: Fn(&str, f64) + Send + Sync,
{
    fn price_update(&self, symbol: &str, price: f64) {
        self(symbol, price)
    }
}

/// Trait for feed source implementations
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Subscribe to bank price updates
    async fn subscribe_bank(&self, listener: Arc<dyn PriceListener>) -> anyhow::Result<()>;

    /// Subscribe to company price updates
    async fn subscribe_company(&self, listener: Arc<dyn PriceListener>) -> anyhow::Result<()>;
}
