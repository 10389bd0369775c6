//! dnseve - Output
//!
//! Turns parsed DNS transactions into EVE-style JSON events and hands
//! them to an event sink. Three layers:
//!
//! - serializer: pure transaction-to-fragment rendering
//! - multiplexer: fragment packing per output mode (discrete, split,
//!   unified)
//! - logger: the per-worker entry point with direction gating and a
//!   reusable render buffer

mod envelope;
mod logger;
mod multiplexer;
mod serializer;

pub use envelope::{build_envelope, FlowContext};
pub use logger::{DnsLogContext, DnsLoggerThread, LogStatus};
pub use multiplexer::{log_transaction, EmitStats};
pub use serializer::{
    answer_json, failure_json, fill_transaction, query_json,
};
