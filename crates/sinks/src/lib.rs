//! dnseve - Event Sinks
//!
//! Delivery layer for rendered events. One facade, [`EventSink`], hides
//! five transports (file, unix stream/dgram socket, Redis, Kafka,
//! syslog) behind a single contract:
//!
//! - `write` takes a rendered event and returns a [`WriteOutcome`],
//!   never an error - a dead destination degrades to dropped events
//! - concurrent writers are serialized by a mutex inside the sink
//! - network destinations reconnect lazily, rate-limited by a
//!   [`ReconnectThrottle`]
//! - file sinks honor an externally raised rotation request before the
//!   next write

mod common;
mod file;
mod kafka;
mod redis;
mod sink;
mod socket;
mod syslog;
mod throttle;

pub use common::{MetricsSnapshot, SinkError, SinkMetrics, WriteOutcome};
pub use sink::{EventSink, SinkKind};
pub use throttle::{ReconnectThrottle, DEFAULT_RECONNECT_INTERVAL};
