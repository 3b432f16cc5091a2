//! Integration tests for the reconciliation monitor
//!
//! Scenario tests run on a paused tokio clock so throttle-sized waits are
//! instantaneous and deterministic.

use price_monitor::alert::{AlertKind, RecordingAlertSink};
use price_monitor::config::MonitorConfig;
use price_monitor::feed::LocalFeed;
use price_monitor::monitor::{MonitorError, ReconciliationMonitor};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

const THROTTLE: Duration = Duration::from_millis(5000);

struct Harness {
    feed: Arc<LocalFeed>,
    monitor: ReconciliationMonitor,
    sink: Arc<RecordingAlertSink>,
}

impl Harness {
    async fn start(config: MonitorConfig) -> Self {
        let feed = Arc::new(LocalFeed::new());
        let sink = Arc::new(RecordingAlertSink::new());
        let monitor = ReconciliationMonitor::new(feed.clone(), sink.clone(), config);
        monitor.start().await.unwrap();
        Self {
            feed,
            monitor,
            sink,
        }
    }

    async fn with_throttle(throttle: Duration) -> Self {
        Self::start(MonitorConfig::with_throttle(throttle)).await
    }

    fn bank(&self, symbol: &str, prices: &[f64]) {
        for price in prices {
            self.feed.publish_bank(symbol, *price);
        }
    }

    fn company(&self, symbol: &str, price: f64) {
        self.feed.publish_company(symbol, price);
    }

    fn slow_alerts(&self) -> usize {
        self.sink
            .count_starting_with(AlertKind::CompanyUpdateIsSlow.headline())
    }

    fn invalid_alerts(&self) -> usize {
        self.sink
            .count_starting_with(AlertKind::CompanyUpdateIsInvalid.headline())
    }
}

#[tokio::test(start_paused = true)]
async fn test_company_update_correct() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[91.0, 92.0, 93.0, 94.0]);
    h.company("1.HK", 94.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.sink.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_company_update_wrong_price() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[91.0, 92.0, 93.0, 94.0]);
    h.company("1.HK", 95.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.sink.count(), 1);
    assert_eq!(h.invalid_alerts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_price_alerts_without_waiting_for_throttle() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[94.0]);
    h.company("1.HK", 95.0);
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(h.invalid_alerts(), 1);
    assert_ok!(h.monitor.stop().await);
    assert_eq!(h.sink.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_bank_send_no_update() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.company("1.HK", 95.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.sink.count(), 1);
    assert_eq!(h.invalid_alerts(), 1);
    assert!(h.sink.messages()[0].contains("Bank [absent]"));
}

#[tokio::test(start_paused = true)]
async fn test_company_send_no_update() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[91.0, 92.0, 93.0, 94.0]);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.sink.count(), 1);
    assert_eq!(h.slow_alerts(), 1);
    let message = &h.sink.messages()[0];
    assert!(message.contains("price[94.000000]"));
    assert!(message.ends_with("vs Company [absent]."));
}

#[tokio::test(start_paused = true)]
async fn test_slow_alert_fires_after_throttle_and_guard() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[94.0]);
    tokio::time::sleep(Duration::from_millis(5050)).await;
    assert_eq!(h.sink.count(), 0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(h.slow_alerts(), 1);
    assert_ok!(h.monitor.stop().await);
}

#[tokio::test(start_paused = true)]
async fn test_company_update_after_throttle() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[91.0, 92.0, 93.0, 94.0]);
    h.company("1.HK", 94.0);

    h.bank("1.HK", &[95.0, 96.0, 97.0, 98.0]);
    tokio::time::sleep(THROTTLE + Duration::from_millis(1000)).await;
    h.company("1.HK", 98.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.sink.count(), 2);
    assert_eq!(h.slow_alerts(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_company_send_duplicate_update() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[91.0, 92.0, 93.0, 94.0]);
    h.company("1.HK", 94.0);
    tokio::time::sleep(THROTTLE + Duration::from_millis(1000)).await;
    h.bank("1.HK", &[94.0]);
    h.company("1.HK", 94.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.sink.count(), 1);
    assert_eq!(h.invalid_alerts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_handle_multiple_assets() {
    let h = Harness::with_throttle(THROTTLE).await;

    for price in [91.0, 92.0, 93.0, 94.0] {
        h.bank("1.HK", &[price]);
        h.bank("2.HK", &[price]);
    }
    h.company("1.HK", 94.0);
    h.company("2.HK", 94.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.sink.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_symbols_are_isolated() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[94.0]);
    h.bank("2.HK", &[50.0]);
    h.company("1.HK", 94.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.slow_alerts(), 1);
    assert!(h.sink.messages()[0].contains("symbol[2.HK]"));
}

#[tokio::test(start_paused = true)]
async fn test_superseded_bank_check_is_silent() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[91.0]);
    tokio::time::sleep(Duration::from_millis(3000)).await;
    h.bank("1.HK", &[92.0]);
    tokio::time::sleep(Duration::from_millis(3000)).await;

    // First check fired at 5100ms and found a newer bank update
    assert_eq!(h.sink.count(), 0);

    assert_ok!(h.monitor.stop().await);
    assert_eq!(h.slow_alerts(), 1);
    assert!(h.sink.messages()[0].contains("price[92.000000]"));
}

#[tokio::test(start_paused = true)]
async fn test_one_slow_alert_per_unsuperseded_bank_update() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[91.0]);
    tokio::time::sleep(Duration::from_millis(6000)).await;
    h.bank("1.HK", &[92.0]);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.slow_alerts(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_company_catches_up_within_budget() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[91.0]);
    tokio::time::sleep(Duration::from_millis(3000)).await;
    h.company("1.HK", 91.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.sink.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_late_matching_company_update_is_slow() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[91.0]);
    tokio::time::sleep(Duration::from_millis(5200)).await;
    // Bank check already alerted at 5100ms; the late answer alerts again
    h.company("1.HK", 91.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.slow_alerts(), 2);
    assert_eq!(h.invalid_alerts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_bank_update_schedules_nothing() {
    let h = Harness::with_throttle(THROTTLE).await;

    h.bank("1.HK", &[94.0]);
    h.company("1.HK", 94.0);
    tokio::time::sleep(Duration::from_millis(1)).await;
    let pending = h.monitor.pending_checks();

    h.bank("1.HK", &[94.0]);
    assert_eq!(h.monitor.pending_checks(), pending);
    assert_eq!(h.monitor.last_bank("1.HK").unwrap().sequence, 1);

    assert_ok!(h.monitor.stop().await);
    assert_eq!(h.sink.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_direct_listeners_feed_the_monitor() {
    let h = Harness::with_throttle(THROTTLE).await;

    let bank = h.monitor.bank_listener();
    let company = h.monitor.company_listener();
    bank.price_update("1.HK", 94.0);
    company.price_update("1.HK", 93.0);
    assert_ok!(h.monitor.stop().await);

    assert_eq!(h.invalid_alerts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_reports_timeout() {
    let mut config = MonitorConfig::with_throttle(THROTTLE);
    config.shutdown_timeout_secs = 1;
    let h = Harness::start(config).await;

    h.bank("1.HK", &[94.0]);
    let result = h.monitor.stop().await;

    assert!(matches!(
        result,
        Err(MonitorError::ShutdownTimedOut { timeout }) if timeout == Duration::from_secs(1)
    ));
    assert_eq!(h.sink.count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_feed_threads() {
    let h = Harness::with_throttle(Duration::from_millis(200)).await;
    let feed = h.feed.clone();

    let mut handles = Vec::new();
    for thread in 0..4 {
        let feed = Arc::clone(&feed);
        handles.push(tokio::task::spawn_blocking(move || {
            let agreed = format!("A{thread}.HK");
            let silent = format!("S{thread}.HK");
            for i in 0..50 {
                let price = 100.0 + i as f64;
                feed.publish_bank(&agreed, price);
                feed.publish_company(&agreed, price);
                feed.publish_bank(&silent, price);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_ok!(h.monitor.stop().await);

    // Only the last bank update per silent symbol survives to alert
    assert_eq!(h.slow_alerts(), 4);
    assert_eq!(h.invalid_alerts(), 0);
    for thread in 0..4 {
        let symbol = format!("S{thread}.HK");
        assert_eq!(h.monitor.last_bank(&symbol).unwrap().price, 149.0);
    }
}
