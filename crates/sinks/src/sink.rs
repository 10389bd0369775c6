//! Event sink facade
//!
//! One type hides every transport behind the same contract: callers hand
//! in a rendered event, the sink serializes concurrent writers with a
//! mutex, deals with rotation and reconnects, and answers with a
//! `WriteOutcome`. Workers never see transport errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::BytesMut;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{info, warn};

use dnseve_config::OutputConfig;

use crate::common::{MetricsSnapshot, SinkError, SinkMetrics, WriteOutcome};
use crate::file::FileBackend;
use crate::kafka::KafkaBackend;
use crate::redis::RedisBackend;
use crate::socket::{SocketBackend, SocketKind};
use crate::syslog::SyslogBackend;

/// Transport flavor of a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    File,
    UnixStream,
    UnixDgram,
    Redis,
    Kafka,
    Syslog,
}

impl SinkKind {
    /// Line-oriented transports get a trailing newline per event;
    /// message-oriented ones carry the payload as-is.
    pub fn appends_newline(self) -> bool {
        matches!(self, Self::File | Self::UnixStream | Self::UnixDgram)
    }

    /// Kind name for logging
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::UnixStream => "unix_stream",
            Self::UnixDgram => "unix_dgram",
            Self::Redis => "redis",
            Self::Kafka => "kafka",
            Self::Syslog => "syslog",
        }
    }
}

enum Backend {
    File(FileBackend),
    Socket(SocketBackend),
    Redis(RedisBackend),
    Kafka(KafkaBackend),
    Syslog(SyslogBackend),
}

/// Shared event destination.
///
/// Cheap to share behind an `Arc`; all mutable transport state lives
/// under the internal mutex.
pub struct EventSink {
    name: String,
    kind: SinkKind,
    backend: Mutex<Backend>,
    rotation_requested: AtomicBool,
    /// Shared with the backends so reconnect attempts are counted too
    metrics: Arc<SinkMetrics>,
}

impl EventSink {
    /// Build the sink a destination config describes.
    ///
    /// `runtime` is only consulted by destinations that can offload work
    /// onto the engine's event loop (async Redis).
    ///
    /// # Errors
    ///
    /// Local misconfiguration is fatal (unwritable file, bad producer
    /// settings, unknown syslog facility). A remote peer being down is
    /// not; those sinks start disconnected and retry on write.
    pub fn from_config(
        config: &OutputConfig,
        sensor_name: Option<&str>,
        runtime: Option<Handle>,
    ) -> Result<Self, SinkError> {
        let metrics = Arc::new(SinkMetrics::new());
        let (kind, backend) = match config {
            OutputConfig::File(c) => (SinkKind::File, Backend::File(FileBackend::open(c)?)),
            OutputConfig::UnixStream(c) => (
                SinkKind::UnixStream,
                Backend::Socket(SocketBackend::open(
                    c,
                    SocketKind::Stream,
                    Arc::clone(&metrics),
                )),
            ),
            OutputConfig::UnixDgram(c) => (
                SinkKind::UnixDgram,
                Backend::Socket(SocketBackend::open(
                    c,
                    SocketKind::Dgram,
                    Arc::clone(&metrics),
                )),
            ),
            OutputConfig::Redis(c) => (
                SinkKind::Redis,
                Backend::Redis(RedisBackend::open(c, runtime, Arc::clone(&metrics))?),
            ),
            OutputConfig::Kafka(c) => (
                SinkKind::Kafka,
                Backend::Kafka(KafkaBackend::open(c, sensor_name, Arc::clone(&metrics))?),
            ),
            OutputConfig::Syslog(c) => {
                (SinkKind::Syslog, Backend::Syslog(SyslogBackend::open(c)?))
            }
        };

        info!(sink = kind.as_str(), "event sink ready");

        Ok(Self {
            name: kind.as_str().to_string(),
            kind,
            backend: Mutex::new(backend),
            rotation_requested: AtomicBool::new(false),
            metrics,
        })
    }

    /// Write one rendered event.
    ///
    /// Appends the transport's framing to `buffer`, takes the sink lock,
    /// honors a pending rotation request, and hands the bytes to the
    /// backend. Never fails upward.
    pub fn write(&self, buffer: &mut BytesMut) -> WriteOutcome {
        if self.kind.appends_newline() {
            buffer.extend_from_slice(b"\n");
        }
        let bytes = buffer.len() as u64;

        let outcome = {
            let mut backend = self.backend.lock();

            // Rotation must happen under the lock, before the write,
            // so no event lands in the old file after the request
            if self.rotation_requested.swap(false, Ordering::AcqRel) {
                if let Backend::File(file) = &mut *backend {
                    if let Err(e) = file.reopen() {
                        warn!(sink = %self.name, error = %e, "rotation reopen failed");
                    }
                }
            }

            match &mut *backend {
                Backend::File(file) => match file.write(buffer) {
                    Ok(()) => WriteOutcome::Written,
                    Err(e) => {
                        warn!(sink = %self.name, error = %e, "file write failed");
                        WriteOutcome::Dropped
                    }
                },
                Backend::Socket(socket) => socket.write(buffer),
                Backend::Redis(redis) => redis.write(buffer),
                Backend::Kafka(kafka) => kafka.write(buffer),
                Backend::Syslog(syslog) => syslog.write(buffer),
            }
        };

        match outcome {
            WriteOutcome::Written => self.metrics.event_written(bytes),
            WriteOutcome::Dropped => self.metrics.event_dropped(),
        }
        outcome
    }

    /// Ask the sink to reopen its file before the next write.
    ///
    /// Called from a signal handler path, so it only flips a flag.
    pub fn request_rotation(&self) {
        self.rotation_requested.store(true, Ordering::Release);
    }

    /// Flush buffered state and release the destination.
    pub fn close(&self) {
        let mut backend = self.backend.lock();
        match &mut *backend {
            Backend::Redis(redis) => redis.close(),
            Backend::Kafka(kafka) => kafka.close(),
            _ => {}
        }
        info!(sink = %self.name, "event sink closed");
    }

    /// Sink name for logging
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transport flavor
    pub fn kind(&self) -> SinkKind {
        self.kind
    }

    /// Point-in-time metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;
