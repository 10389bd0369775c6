//! Event envelope
//!
//! Every emitted event starts from the same header: timestamp, flow id
//! and the flow 5-tuple, then `"event_type": "dns"`. The transaction
//! body is attached under the `dns` key by the multiplexer.

use std::net::IpAddr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

/// Flow metadata supplied by the engine for each transaction
#[derive(Debug, Clone)]
pub struct FlowContext {
    /// When the triggering packet was seen
    pub timestamp: DateTime<Utc>,
    /// Engine-assigned flow identifier
    pub flow_id: u64,
    /// Client address
    pub src_ip: IpAddr,
    /// Client port
    pub src_port: u16,
    /// Server address
    pub dest_ip: IpAddr,
    /// Server port
    pub dest_port: u16,
    /// Transport protocol name ("UDP", "TCP")
    pub proto: String,
}

/// Build the event header for one flow.
///
/// Key order is part of the output contract: consumers diff event
/// streams byte for byte.
pub fn build_envelope(flow: &FlowContext) -> Value {
    json!({
        "timestamp": flow.timestamp.to_rfc3339_opts(SecondsFormat::Millis, false),
        "flow_id": flow.flow_id,
        "event_type": "dns",
        "src_ip": flow.src_ip.to_string(),
        "src_port": flow.src_port,
        "dest_ip": flow.dest_ip.to_string(),
        "dest_port": flow.dest_port,
        "proto": flow.proto,
    })
}
