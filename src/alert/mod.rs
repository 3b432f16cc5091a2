//! Alert module
//!
//! Alert kinds, message rendering, and the sinks alerts are delivered to.

mod sink;
mod types;

pub use sink::{ChannelAlertSink, LogAlertSink, RecordingAlertSink};
pub use types::{Alert, AlertKind};

/// Destination for alert messages
///
/// Fire-and-forget: the monitor never retries and ignores delivery failures.
/// Implementations must not block.
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}
