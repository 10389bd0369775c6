//! DNS event logger
//!
//! `DnsLogContext` is built once at registration and shared read-only by
//! every packet worker; `DnsLoggerThread` is the per-worker handle that
//! owns a reusable render buffer. Workers call `on_transaction` for each
//! leg of each transaction and never see transport failures - a dead
//! destination degrades to `LogStatus::Failed`, it never stops packet
//! processing.

use std::sync::Arc;

use bytes::BytesMut;
use tracing::debug;

use dnseve_config::{ConfigError, DnsLogConfig, OutputMode};
use dnseve_protocol::{Direction, DnsTransaction, VisibilityFilter};
use dnseve_sinks::EventSink;

use crate::envelope::{build_envelope, FlowContext};
use crate::multiplexer::log_transaction;

/// Initial per-worker buffer capacity; grows to the largest event seen
const RENDER_BUFFER_CAPACITY: usize = 4096;

/// Result of logging one transaction leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    /// At least one event reached the destination
    Logged(usize),
    /// The leg produced no events (filtered out, or nothing to say)
    Skipped,
    /// Events were produced but the destination accepted none of them
    Failed,
}

/// Shared logger state: destination, filter and cardinality
pub struct DnsLogContext {
    sink: Arc<EventSink>,
    filter: VisibilityFilter,
    mode: OutputMode,
}

impl DnsLogContext {
    /// Resolve the configuration into a ready context.
    ///
    /// # Errors
    ///
    /// Fails when the record-type selection names an unknown mnemonic.
    pub fn new(sink: Arc<EventSink>, config: &DnsLogConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            sink,
            filter: config.build_filter()?,
            mode: config.mode,
        })
    }

    /// The destination events go to
    pub fn sink(&self) -> &Arc<EventSink> {
        &self.sink
    }

    /// Active visibility filter
    pub fn filter(&self) -> VisibilityFilter {
        self.filter
    }

    /// Active event cardinality
    pub fn mode(&self) -> OutputMode {
        self.mode
    }
}

/// Per-worker logging handle
pub struct DnsLoggerThread {
    ctx: Arc<DnsLogContext>,
    buffer: BytesMut,
    events_logged: u64,
}

impl DnsLoggerThread {
    /// Create a worker handle over the shared context
    pub fn new(ctx: Arc<DnsLogContext>) -> Self {
        Self {
            ctx,
            buffer: BytesMut::with_capacity(RENDER_BUFFER_CAPACITY),
            events_logged: 0,
        }
    }

    /// Log one leg of a transaction.
    ///
    /// Called on the request leg when the query is parsed and on the
    /// response leg when the transaction completes (or times out).
    pub fn on_transaction(
        &mut self,
        flow: &FlowContext,
        tx: &DnsTransaction,
        direction: Direction,
    ) -> LogStatus {
        let filter = self.ctx.filter;
        let eligible = match (self.ctx.mode, direction) {
            // Unified waits for the transaction to complete, then logs
            // whatever either direction flag lets through
            (OutputMode::Unified, Direction::ToServer) => false,
            (OutputMode::Unified, Direction::ToClient) => {
                filter.queries() || filter.answers()
            }
            (_, Direction::ToServer) => filter.queries(),
            (_, Direction::ToClient) => filter.answers(),
        };
        if !eligible {
            return LogStatus::Skipped;
        }

        let envelope = build_envelope(flow);
        let stats = log_transaction(
            &self.ctx.sink,
            &mut self.buffer,
            &envelope,
            tx,
            filter,
            self.ctx.mode,
            direction,
        );

        if stats.emitted == 0 {
            LogStatus::Skipped
        } else if stats.written == 0 {
            debug!(
                sink = %self.ctx.sink.name(),
                tx_id = tx.tx_id,
                "all events for transaction leg dropped"
            );
            LogStatus::Failed
        } else {
            self.events_logged += stats.written as u64;
            LogStatus::Logged(stats.written)
        }
    }

    /// Request-leg entry point, invoked when the query is parsed
    pub fn log_to_server(&mut self, flow: &FlowContext, tx: &DnsTransaction) -> LogStatus {
        self.on_transaction(flow, tx, Direction::ToServer)
    }

    /// Response-leg entry point, invoked when the transaction completes
    pub fn log_to_client(&mut self, flow: &FlowContext, tx: &DnsTransaction) -> LogStatus {
        self.on_transaction(flow, tx, Direction::ToClient)
    }

    /// Events this worker has gotten through to the destination
    pub fn events_logged(&self) -> u64 {
        self.events_logged
    }
}

#[cfg(test)]
#[path = "logger_test.rs"]
mod logger_test;
