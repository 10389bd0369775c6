//! Common types and utilities for sinks
//!
//! Shared functionality across all sink backends.

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Result of one event write
///
/// Writes never fail upward: a destination outage degrades to dropped
/// events, it never stops the workers feeding the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The event was handed to the destination (or its local queue)
    Written,
    /// The destination was unavailable and the event was discarded
    Dropped,
}

/// Metrics shared by all sink backends
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Total events successfully written
    pub events_written: AtomicU64,

    /// Total bytes written
    pub bytes_written: AtomicU64,

    /// Events discarded because the destination was unavailable
    pub events_dropped: AtomicU64,

    /// Reconnect attempts made
    pub reconnects: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            events_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            events_dropped: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
        }
    }

    /// Record a successfully written event
    #[inline]
    pub fn event_written(&self, bytes: u64) {
        self.events_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a dropped event
    #[inline]
    pub fn event_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a reconnect attempt
    #[inline]
    pub fn reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_written: self.events_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub events_written: u64,
    pub bytes_written: u64,
    pub events_dropped: u64,
    pub reconnects: u64,
}

/// Errors raised while setting up a sink
///
/// Only setup is fallible; the write path reports through `WriteOutcome`.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to open an output file
    #[error("failed to open '{path}': {source}")]
    Open {
        /// File or socket path
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Sink initialization failed
    #[error("failed to initialize sink: {0}")]
    Init(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl SinkError {
    /// Create an initialization error
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
