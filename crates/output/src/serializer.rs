//! Transaction fragment serializer
//!
//! Pure functions from transaction entries to JSON fragments. Nothing in
//! here touches a sink; the multiplexer decides how fragments are packed
//! into events.
//!
//! Output shape is a contract: key order is fixed, text fields are
//! clamped to 255 bytes, and only address, text and SSHFP record types
//! carry a payload field.

use std::net::{Ipv4Addr, Ipv6Addr};

use serde_json::{json, Map, Value};

use dnseve_protocol::{
    rcode_string, type_string, AnswerEntry, DnsTransaction, QueryEntry, RecordType,
    VisibilityFilter,
};

/// Longest rendered text field; DNS names cannot exceed this anyway
const MAX_TEXT_LEN: usize = 255;

/// Render raw wire bytes as clamped, lossy text
fn text_field(bytes: &[u8]) -> String {
    let end = bytes.len().min(MAX_TEXT_LEN);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Fragment for one question entry
pub fn query_json(tx: &DnsTransaction, query: &QueryEntry) -> Value {
    json!({
        "type": "query",
        "id": tx.tx_id,
        "rrname": text_field(&query.name),
        "rrtype": type_string(query.rrtype),
        "tx_id": tx.tx_id,
    })
}

/// Fragment for one answer record
pub fn answer_json(tx: &DnsTransaction, answer: &AnswerEntry) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), "answer".into());
    obj.insert("id".into(), tx.tx_id.into());
    obj.insert("rcode".into(), rcode_string(tx.rcode).into());
    if !answer.name.is_empty() {
        obj.insert("rrname".into(), text_field(&answer.name).into());
    }
    obj.insert("rrtype".into(), type_string(answer.rrtype).into());
    obj.insert("ttl".into(), answer.ttl.into());
    if let Some((key, payload)) = rdata_json(answer) {
        obj.insert(key.into(), payload);
    }
    Value::Object(obj)
}

/// Answer-shaped fragment for a query that got no usable reply
pub fn failure_json(tx: &DnsTransaction, query: &QueryEntry) -> Value {
    json!({
        "type": "answer",
        "id": tx.tx_id,
        "rcode": rcode_string(tx.rcode),
        "rrname": text_field(&query.name),
        "rrtype": type_string(query.rrtype),
    })
}

/// Render record data according to its type, as `(key, payload)`.
///
/// Addresses become printable form under `rdata`; the textual types
/// become a clamped string, with zero-length rdata rendered as `""` so
/// consumers can tell "empty" from "absent"; SSHFP becomes a nested
/// object under `sshfp`. Every other type carries no payload field,
/// raw sub-record bytes are never emitted.
fn rdata_json(answer: &AnswerEntry) -> Option<(&'static str, Value)> {
    match RecordType::from_wire(answer.rrtype)? {
        RecordType::A if answer.rdata.len() == 4 => {
            let octets: [u8; 4] = answer.rdata[..4].try_into().ok()?;
            Some(("rdata", Ipv4Addr::from(octets).to_string().into()))
        }
        RecordType::Aaaa if answer.rdata.len() == 16 => {
            let octets: [u8; 16] = answer.rdata[..16].try_into().ok()?;
            Some(("rdata", Ipv6Addr::from(octets).to_string().into()))
        }
        RecordType::Txt
        | RecordType::Cname
        | RecordType::Mx
        | RecordType::Ptr
        | RecordType::Ns
        | RecordType::Soa => Some(("rdata", text_field(&answer.rdata).into())),
        RecordType::Sshfp if answer.rdata.len() > 2 => {
            let fingerprint = answer.rdata[2..]
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(":");
            Some((
                "sshfp",
                json!({
                    "fingerprint": fingerprint,
                    "algo": answer.rdata[0],
                    "type": answer.rdata[1],
                }),
            ))
        }
        _ => None,
    }
}

/// Query fragments surviving the visibility filter
pub fn query_fragments(tx: &DnsTransaction, filter: VisibilityFilter) -> Vec<Value> {
    tx.queries
        .iter()
        .filter(|q| filter.record_enabled(q.rrtype))
        .map(|q| query_json(tx, q))
        .collect()
}

/// Answer fragments surviving the visibility filter
pub fn answer_fragments(tx: &DnsTransaction, filter: VisibilityFilter) -> Vec<Value> {
    tx.answers
        .iter()
        .filter(|a| filter.record_enabled(a.rrtype))
        .map(|a| answer_json(tx, a))
        .collect()
}

/// Failure fragments (one per surviving query) for a failed transaction
pub fn failure_fragments(tx: &DnsTransaction, filter: VisibilityFilter) -> Vec<Value> {
    tx.queries
        .iter()
        .filter(|q| filter.record_enabled(q.rrtype))
        .map(|q| failure_json(tx, q))
        .collect()
}

/// Whole-transaction body for unified events.
///
/// Arrays appear only when non-empty. The `info` marker flags
/// transactions whose reply never arrived or arrived empty.
pub fn fill_transaction(tx: &DnsTransaction, filter: VisibilityFilter) -> Value {
    let mut body = Map::new();

    if filter.queries() {
        let queries = query_fragments(tx, filter);
        if !queries.is_empty() {
            body.insert("queries".into(), Value::Array(queries));
        }
    }

    if filter.answers() {
        if tx.reply_lost {
            body.insert("info".into(), "reply lost".into());
        }
        if tx.replied && tx.answers.is_empty() {
            body.insert("info".into(), "empty answer".into());
        }

        let answers = answer_fragments(tx, filter);
        if !answers.is_empty() {
            body.insert("answers".into(), Value::Array(answers));
        }

        if tx.rcode != 0 {
            let fail = failure_fragments(tx, filter);
            if !fail.is_empty() {
                body.insert("fail".into(), Value::Array(fail));
            }
        }
    }

    Value::Object(body)
}

#[cfg(test)]
#[path = "serializer_test.rs"]
mod serializer_test;
