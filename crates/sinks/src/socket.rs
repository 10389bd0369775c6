//! Unix socket backend
//!
//! Stream and datagram unix sockets share one backend: both address a
//! filesystem path, both may come and go while the engine runs (the
//! consumer restarts, the socket file is recreated), so connect failures
//! are survivable and reconnects are throttled.

use std::io::{self, Write};
use std::os::unix::net::{UnixDatagram, UnixStream};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use dnseve_config::SocketOutputConfig;

use crate::common::{SinkMetrics, WriteOutcome};
use crate::throttle::ReconnectThrottle;

/// Socket flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    /// Connected stream socket
    Stream,
    /// Datagram socket, one event per datagram
    Dgram,
}

#[derive(Debug)]
enum SocketConn {
    Stream(UnixStream),
    Dgram(UnixDatagram),
}

/// Unix socket destination
#[derive(Debug)]
pub struct SocketBackend {
    path: PathBuf,
    kind: SocketKind,
    conn: Option<SocketConn>,
    throttle: ReconnectThrottle,
    metrics: Arc<SinkMetrics>,
}

impl SocketBackend {
    /// Set up the backend and try an initial connect.
    ///
    /// A missing consumer at startup is not fatal: the backend starts
    /// disconnected and the first writes drive throttled reconnects.
    pub fn open(
        config: &SocketOutputConfig,
        kind: SocketKind,
        metrics: Arc<SinkMetrics>,
    ) -> Self {
        let mut backend = Self {
            path: PathBuf::from(&config.path),
            kind,
            conn: None,
            throttle: ReconnectThrottle::new(config.reconnect_interval),
            metrics,
        };

        match backend.connect() {
            Ok(conn) => backend.conn = Some(conn),
            Err(e) => warn!(
                path = %backend.path.display(),
                error = %e,
                "unix socket unavailable, will retry on write"
            ),
        }
        backend
    }

    /// Write one event, reconnecting if the socket went away.
    ///
    /// On a send error the connection is dropped and, if the throttle
    /// allows it, re-established for a single retry. Anything beyond
    /// that drops the event.
    pub fn write(&mut self, payload: &[u8]) -> WriteOutcome {
        if self.conn.is_none() && !self.try_reconnect() {
            return WriteOutcome::Dropped;
        }

        match self.send(payload) {
            Ok(()) => WriteOutcome::Written,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "unix socket send failed");
                self.conn = None;
                if self.try_reconnect() && self.send(payload).is_ok() {
                    WriteOutcome::Written
                } else {
                    WriteOutcome::Dropped
                }
            }
        }
    }

    /// Reconnect attempts made so far
    pub fn reconnect_count(&self) -> u64 {
        self.metrics.snapshot().reconnects
    }

    fn send(&mut self, payload: &[u8]) -> io::Result<()> {
        match self.conn {
            Some(SocketConn::Stream(ref mut stream)) => stream.write_all(payload),
            Some(SocketConn::Dgram(ref socket)) => {
                socket.send(payload).map(|_| ())
            }
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "no socket")),
        }
    }

    fn try_reconnect(&mut self) -> bool {
        if !self.throttle.should_attempt() {
            return false;
        }
        self.metrics.reconnect();

        match self.connect() {
            Ok(conn) => {
                debug!(path = %self.path.display(), "unix socket reconnected");
                self.conn = Some(conn);
                self.throttle.reset();
                true
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "unix socket reconnect failed"
                );
                false
            }
        }
    }

    fn connect(&self) -> io::Result<SocketConn> {
        match self.kind {
            SocketKind::Stream => UnixStream::connect(&self.path).map(SocketConn::Stream),
            SocketKind::Dgram => {
                let socket = UnixDatagram::unbound()?;
                socket.connect(&self.path)?;
                Ok(SocketConn::Dgram(socket))
            }
        }
    }
}

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;
