//! Reconciliation monitor
//!
//! Ingests bank and company updates, keeps the latest observation per
//! symbol on each feed, and schedules the consistency checks that decide
//! whether to alert.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;

use super::book::PriceBook;
use super::check::Checker;
use super::scheduler::CheckScheduler;
use super::sequence::{AtomicSequence, SequenceSource};
use super::types::{CheckTask, MonitorError, PriceObservation, UpdateOutcome};
use crate::alert::{Alert, AlertKind, AlertSink};
use crate::config::MonitorConfig;
use crate::feed::{FeedKind, FeedSource, PriceListener};
use crate::telemetry;

/// State shared between the monitor, its listeners, and its check tasks
struct MonitorCore {
    book: Arc<PriceBook>,
    sequence: Arc<dyn SequenceSource>,
    checker: Arc<Checker>,
    scheduler: CheckScheduler,
    config: MonitorConfig,
    accepting: AtomicBool,
}

impl MonitorCore {
    fn on_update(&self, feed: FeedKind, symbol: &str, price: f64) -> UpdateOutcome {
        let outcome = match feed {
            FeedKind::Bank => self.on_bank_update(symbol, price),
            FeedKind::Company => self.on_company_update(symbol, price),
        };
        telemetry::record_update(feed, outcome);
        outcome
    }

    fn on_bank_update(&self, symbol: &str, price: f64) -> UpdateOutcome {
        if !self.accepting.load(Ordering::Acquire) {
            tracing::debug!(symbol, price, "Monitor stopped, bank update dropped");
            return UpdateOutcome::Rejected;
        }

        // Consumed even when the update turns out to be a duplicate
        let sequence = self.sequence.next();
        let observation = PriceObservation::new(symbol, price, sequence);

        if let Some(previous) = self.book.latest(FeedKind::Bank, symbol) {
            if previous.same_price(price) {
                tracing::debug!(symbol, price, sequence, "Duplicate bank price ignored");
                return UpdateOutcome::Duplicate;
            }
        }

        self.store(FeedKind::Bank, observation);
        self.scheduler.schedule(CheckTask::bank(
            symbol,
            sequence,
            self.config.bank_check_delay(),
        ));
        UpdateOutcome::Accepted
    }

    fn on_company_update(&self, symbol: &str, price: f64) -> UpdateOutcome {
        if !self.accepting.load(Ordering::Acquire) {
            tracing::debug!(symbol, price, "Monitor stopped, company update dropped");
            return UpdateOutcome::Rejected;
        }

        let sequence = self.sequence.next();
        let observation = PriceObservation::new(symbol, price, sequence);

        if let Some(previous) = self.book.latest(FeedKind::Company, symbol) {
            if previous.same_price(price) {
                // A repeated company price means the company feed has not progressed.
                let bank = self.book.latest(FeedKind::Bank, symbol);
                self.checker.raise(Alert::new(
                    AlertKind::CompanyUpdateIsInvalid,
                    symbol,
                    bank,
                    Some(observation),
                ));
                return UpdateOutcome::Duplicate;
            }
        }

        self.store(FeedKind::Company, observation);
        self.scheduler.schedule(CheckTask::company(symbol, sequence));
        UpdateOutcome::Accepted
    }

    fn store(&self, feed: FeedKind, observation: PriceObservation) {
        if self.book.store(feed, observation) {
            telemetry::set_tracked_symbols(feed, self.book.symbol_count(feed));
        }
    }
}

/// Listener handed to the feed source for one feed channel
struct FeedListener {
    core: Arc<MonitorCore>,
    feed: FeedKind,
}

impl PriceListener for FeedListener {
    fn price_update(&self, symbol: &str, price: f64) {
        let outcome = self.core.on_update(self.feed, symbol, price);
        tracing::debug!(
            feed = %self.feed,
            symbol,
            price,
            outcome = outcome.as_str(),
            bank = ?self.core.book.latest(FeedKind::Bank, symbol).map(|o| o.to_string()),
            company = ?self.core.book.latest(FeedKind::Company, symbol).map(|o| o.to_string()),
            "Price update handled"
        );
    }
}

/// Cross-checks the bank feed against the company feed
///
/// Update handlers are synchronous, never block, and may be called from any
/// thread. Check tasks run on the tokio runtime captured at construction.
pub struct ReconciliationMonitor {
    feed: Arc<dyn FeedSource>,
    core: Arc<MonitorCore>,
    bank_listener: Arc<dyn PriceListener>,
    company_listener: Arc<dyn PriceListener>,
    started: AtomicBool,
}

impl ReconciliationMonitor {
    /// Create a monitor that schedules checks on the current tokio runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(
        feed: Arc<dyn FeedSource>,
        sink: Arc<dyn AlertSink>,
        config: MonitorConfig,
    ) -> Self {
        Self::with_parts(
            feed,
            sink,
            config,
            Arc::new(AtomicSequence::new()),
            Handle::current(),
        )
    }

    /// Create a monitor with an explicit sequence source and runtime handle
    pub fn with_parts(
        feed: Arc<dyn FeedSource>,
        sink: Arc<dyn AlertSink>,
        config: MonitorConfig,
        sequence: Arc<dyn SequenceSource>,
        handle: Handle,
    ) -> Self {
        let book = Arc::new(PriceBook::new());
        let checker = Arc::new(Checker::new(Arc::clone(&book), sink, config.throttle()));
        let scheduler = CheckScheduler::new(handle, Arc::clone(&checker));

        let core = Arc::new(MonitorCore {
            book,
            sequence,
            checker,
            scheduler,
            config,
            accepting: AtomicBool::new(true),
        });

        let bank_listener: Arc<dyn PriceListener> = Arc::new(FeedListener {
            core: Arc::clone(&core),
            feed: FeedKind::Bank,
        });
        let company_listener: Arc<dyn PriceListener> = Arc::new(FeedListener {
            core: Arc::clone(&core),
            feed: FeedKind::Company,
        });

        Self {
            feed,
            core,
            bank_listener,
            company_listener,
            started: AtomicBool::new(false),
        }
    }

    /// Subscribe both listeners to the feed source
    pub async fn start(&self) -> Result<(), MonitorError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(MonitorError::AlreadyStarted);
        }

        self.feed
            .subscribe_bank(Arc::clone(&self.bank_listener))
            .await
            .map_err(MonitorError::Subscription)?;
        self.feed
            .subscribe_company(Arc::clone(&self.company_listener))
            .await
            .map_err(MonitorError::Subscription)?;

        tracing::info!(
            throttle_ms = self.core.config.throttle_ms,
            guard_ms = self.core.config.guard_ms,
            "Reconciliation monitor started"
        );
        Ok(())
    }

    /// Stop accepting updates and drain outstanding checks
    ///
    /// Waits at most the configured shutdown timeout. A timeout is logged
    /// and returned, never panicked on.
    pub async fn stop(&self) -> Result<(), MonitorError> {
        self.core.accepting.store(false, Ordering::Release);
        tracing::info!(
            pending = self.core.scheduler.pending(),
            "Stopping reconciliation monitor"
        );

        let result = self
            .core
            .scheduler
            .shutdown(self.core.config.shutdown_timeout())
            .await;

        match &result {
            Ok(()) => tracing::info!("Reconciliation monitor stopped"),
            Err(e) => tracing::error!(
                error = %e,
                pending = self.core.scheduler.pending(),
                "Reconciliation monitor shutdown incomplete"
            ),
        }
        result
    }

    /// Handle a bank price update
    pub fn on_bank_update(&self, symbol: &str, price: f64) -> UpdateOutcome {
        self.core.on_update(FeedKind::Bank, symbol, price)
    }

    /// Handle a company price update
    pub fn on_company_update(&self, symbol: &str, price: f64) -> UpdateOutcome {
        self.core.on_update(FeedKind::Company, symbol, price)
    }

    /// Listener subscribed to the bank feed by `start`
    pub fn bank_listener(&self) -> Arc<dyn PriceListener> {
        Arc::clone(&self.bank_listener)
    }

    /// Listener subscribed to the company feed by `start`
    pub fn company_listener(&self) -> Arc<dyn PriceListener> {
        Arc::clone(&self.company_listener)
    }

    /// Latest accepted bank observation for `symbol`
    pub fn last_bank(&self, symbol: &str) -> Option<PriceObservation> {
        self.core.book.latest(FeedKind::Bank, symbol)
    }

    /// Latest accepted company observation for `symbol`
    pub fn last_company(&self, symbol: &str) -> Option<PriceObservation> {
        self.core.book.latest(FeedKind::Company, symbol)
    }

    /// Check tasks scheduled or running
    pub fn pending_checks(&self) -> usize {
        self.core.scheduler.pending()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.core.config
    }
}
