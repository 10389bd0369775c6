//! Output-mode multiplexer
//!
//! Decides how many events one transaction leg becomes and writes them:
//!
//! - `discrete`: one event per surviving response fragment
//! - `split`: one event per leg, response fragments packed in an array
//! - `unified`: one event per transaction, emitted on the response leg
//!
//! In `discrete` and `split` the request leg is logged only when exactly
//! one question survives the filter, and it goes out alone as the body.
//!
//! Every emitted event is a fresh deep copy of the envelope; fragments
//! are never shared between events.

use bytes::{BufMut, BytesMut};
use serde_json::Value;
use tracing::warn;

use dnseve_config::OutputMode;
use dnseve_protocol::{Direction, DnsTransaction, VisibilityFilter};
use dnseve_sinks::{EventSink, WriteOutcome};

use crate::serializer::{
    answer_fragments, failure_fragments, fill_transaction, query_fragments,
};

/// Outcome of one multiplexed transaction leg
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    /// Events rendered for this leg
    pub emitted: usize,
    /// Events the sink accepted
    pub written: usize,
}

/// Render and write every event this transaction leg produces.
pub fn log_transaction(
    sink: &EventSink,
    buffer: &mut BytesMut,
    envelope: &Value,
    tx: &DnsTransaction,
    filter: VisibilityFilter,
    mode: OutputMode,
    direction: Direction,
) -> EmitStats {
    let mut stats = EmitStats::default();

    if mode == OutputMode::Unified {
        // The whole transaction goes out once, when the response leg
        // fires; the request leg emits nothing
        if direction == Direction::ToClient {
            let body = fill_transaction(tx, filter);
            if body.as_object().is_some_and(|o| !o.is_empty()) {
                emit(sink, buffer, envelope, body, &mut stats);
            }
        }
        return stats;
    }

    let (fragments, array_key) = match direction {
        Direction::ToServer => {
            if !filter.queries() {
                return stats;
            }
            // Historical per-record contract: the request leg is logged
            // only when exactly one question survives the filter, and
            // the fragment goes out alone in every mode
            let mut queries = query_fragments(tx, filter);
            if queries.len() == 1 {
                emit(sink, buffer, envelope, queries.remove(0), &mut stats);
            }
            return stats;
        }
        Direction::ToClient => {
            if !filter.answers() {
                return stats;
            }
            if !tx.answers.is_empty() {
                (answer_fragments(tx, filter), "answers")
            } else if tx.reply_lost {
                // The reply never arrived; the queries come back
                // answer-shaped so the flow still leaves a trace. A
                // replied transaction with no records emits nothing here,
                // only unified bodies carry the fail array.
                (failure_fragments(tx, filter), "fail")
            } else {
                return stats;
            }
        }
    };

    if fragments.is_empty() {
        return stats;
    }

    match mode {
        OutputMode::Discrete => {
            for fragment in fragments {
                emit(sink, buffer, envelope, fragment, &mut stats);
            }
        }
        OutputMode::Split => {
            let mut body = serde_json::Map::new();
            body.insert(array_key.into(), Value::Array(fragments));
            emit(sink, buffer, envelope, Value::Object(body), &mut stats);
        }
        OutputMode::Unified => unreachable!("handled above"),
    }
    stats
}

/// Attach `body` under `dns` on a copy of the envelope and write it.
fn emit(
    sink: &EventSink,
    buffer: &mut BytesMut,
    envelope: &Value,
    body: Value,
    stats: &mut EmitStats,
) {
    let mut event = envelope.clone();
    event["dns"] = body;

    buffer.clear();
    if let Err(e) = serde_json::to_writer((&mut *buffer).writer(), &event) {
        warn!(error = %e, "event serialization failed");
        return;
    }

    stats.emitted += 1;
    if sink.write(buffer) == WriteOutcome::Written {
        stats.written += 1;
    }
}

#[cfg(test)]
#[path = "multiplexer_test.rs"]
mod multiplexer_test;
