use std::fs;

use bytes::BytesMut;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use dnseve_config::{FileOutputConfig, OutputConfig, OutputMode};
use dnseve_protocol::{
    AnswerEntry, Direction, DnsTransaction, QueryEntry, RecordType, VisibilityFilter,
};
use dnseve_sinks::EventSink;

use super::{log_transaction, EmitStats};
use crate::envelope::{build_envelope, FlowContext};

fn file_sink(dir: &tempfile::TempDir) -> (EventSink, std::path::PathBuf) {
    let path = dir.path().join("eve.json");
    let config = OutputConfig::File(FileOutputConfig {
        path: path.to_string_lossy().into_owned(),
        append: true,
    });
    (EventSink::from_config(&config, None, None).unwrap(), path)
}

fn envelope() -> Value {
    build_envelope(&FlowContext {
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap(),
        flow_id: 99,
        src_ip: "10.0.0.1".parse().unwrap(),
        src_port: 53241,
        dest_ip: "10.0.0.53".parse().unwrap(),
        dest_port: 53,
        proto: "UDP".to_string(),
    })
}

fn resolved_tx() -> DnsTransaction {
    let mut tx = DnsTransaction::new(42);
    tx.replied = true;
    tx.queries.push(QueryEntry {
        rrtype: 1,
        name: b"example.com".to_vec(),
    });
    tx.queries.push(QueryEntry {
        rrtype: 28,
        name: b"example.com".to_vec(),
    });
    for rdata in [[1u8, 1, 1, 1], [8, 8, 8, 8], [9, 9, 9, 9]] {
        tx.answers.push(AnswerEntry {
            rrtype: 1,
            ttl: 60,
            name: b"example.com".to_vec(),
            rdata: rdata.to_vec(),
        });
    }
    tx
}

fn events(path: &std::path::Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn log(
    sink: &EventSink,
    tx: &DnsTransaction,
    filter: VisibilityFilter,
    mode: OutputMode,
    direction: Direction,
) -> EmitStats {
    let mut buffer = BytesMut::new();
    log_transaction(sink, &mut buffer, &envelope(), tx, filter, mode, direction)
}

#[test]
fn test_discrete_one_event_per_answer() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let tx = resolved_tx();

    let stats = log(
        &sink,
        &tx,
        VisibilityFilter::all(),
        OutputMode::Discrete,
        Direction::ToClient,
    );
    assert_eq!(stats, EmitStats { emitted: 3, written: 3 });

    let events = events(&path);
    assert_eq!(events.len(), 3);
    for (event, rdata) in events.iter().zip(["1.1.1.1", "8.8.8.8", "9.9.9.9"]) {
        assert_eq!(event["event_type"], "dns");
        assert_eq!(event["dns"]["type"], "answer");
        assert_eq!(event["dns"]["rdata"], rdata);
    }
}

#[test]
fn test_split_one_event_with_answer_array() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let tx = resolved_tx();

    let stats = log(
        &sink,
        &tx,
        VisibilityFilter::all(),
        OutputMode::Split,
        Direction::ToClient,
    );
    assert_eq!(stats, EmitStats { emitted: 1, written: 1 });

    let events = events(&path);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["dns"]["answers"].as_array().unwrap().len(), 3);
}

#[test]
fn test_unified_one_event_per_transaction() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let tx = resolved_tx();
    let filter = VisibilityFilter::all();

    // Both legs fire, as they do in the engine; only the response leg
    // may produce output
    let request = log(&sink, &tx, filter, OutputMode::Unified, Direction::ToServer);
    let response = log(&sink, &tx, filter, OutputMode::Unified, Direction::ToClient);
    assert_eq!(request, EmitStats::default());
    assert_eq!(response, EmitStats { emitted: 1, written: 1 });

    let events = events(&path);
    assert_eq!(events.len(), 1);
    let dns = &events[0]["dns"];
    assert_eq!(dns["queries"].as_array().unwrap().len(), 2);
    assert_eq!(dns["answers"].as_array().unwrap().len(), 3);
}

#[test]
fn test_request_leg_logs_single_question_alone() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let mut tx = DnsTransaction::new(42);
    tx.queries.push(QueryEntry {
        rrtype: 1,
        name: b"example.com".to_vec(),
    });

    for mode in [OutputMode::Discrete, OutputMode::Split] {
        let stats = log(&sink, &tx, VisibilityFilter::all(), mode, Direction::ToServer);
        assert_eq!(stats, EmitStats { emitted: 1, written: 1 });
    }

    let events = events(&path);
    assert_eq!(events.len(), 2);
    // The lone fragment is the body itself in both modes
    assert_eq!(events[0]["dns"]["type"], "query");
    assert_eq!(events[0]["dns"]["rrtype"], "A");
    assert_eq!(events[1]["dns"], events[0]["dns"]);
}

#[test]
fn test_request_leg_with_multiple_questions_emits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let tx = resolved_tx();
    assert_eq!(tx.queries.len(), 2);

    for mode in [OutputMode::Discrete, OutputMode::Split] {
        let stats = log(&sink, &tx, VisibilityFilter::all(), mode, Direction::ToServer);
        assert_eq!(stats, EmitStats::default());
    }
    assert!(fs::read_to_string(&path).unwrap().is_empty());
}

#[test]
fn test_request_leg_filter_can_reduce_to_single_question() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let tx = resolved_tx();

    // Two questions on the wire, but only AAAA survives the filter
    let filter = VisibilityFilter::all().with_types([RecordType::Aaaa]);
    let stats = log(&sink, &tx, filter, OutputMode::Discrete, Direction::ToServer);
    assert_eq!(stats, EmitStats { emitted: 1, written: 1 });
    assert_eq!(events(&path)[0]["dns"]["rrtype"], "AAAA");
}

#[test]
fn test_reply_lost_emits_answer_shaped_failures() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let mut tx = DnsTransaction::new(42);
    tx.reply_lost = true;
    tx.queries.push(QueryEntry {
        rrtype: 1,
        name: b"lost.example.com".to_vec(),
    });

    let stats = log(
        &sink,
        &tx,
        VisibilityFilter::all(),
        OutputMode::Discrete,
        Direction::ToClient,
    );
    assert_eq!(stats, EmitStats { emitted: 1, written: 1 });

    let events = events(&path);
    assert_eq!(events[0]["dns"]["type"], "answer");
    assert_eq!(events[0]["dns"]["rcode"], "NOERROR");
    assert_eq!(events[0]["dns"]["rrname"], "lost.example.com");
}

#[test]
fn test_replied_nxdomain_without_answers_emits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let mut tx = DnsTransaction::new(42);
    tx.replied = true;
    tx.rcode = 3;
    tx.queries.push(QueryEntry {
        rrtype: 1,
        name: b"missing.example.com".to_vec(),
    });

    // An ordinary NXDOMAIN has a reply, just no records; the response
    // leg stays silent outside unified mode
    for mode in [OutputMode::Discrete, OutputMode::Split] {
        let stats = log(&sink, &tx, VisibilityFilter::all(), mode, Direction::ToClient);
        assert_eq!(stats, EmitStats::default());
    }
    assert!(fs::read_to_string(&path).unwrap().is_empty());
}

#[test]
fn test_empty_answer_without_failure_emits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let mut tx = DnsTransaction::new(42);
    tx.replied = true;
    tx.queries.push(QueryEntry {
        rrtype: 1,
        name: b"quiet.example.com".to_vec(),
    });

    let stats = log(
        &sink,
        &tx,
        VisibilityFilter::all(),
        OutputMode::Discrete,
        Direction::ToClient,
    );
    assert_eq!(stats, EmitStats::default());
    assert!(fs::read_to_string(&path).unwrap().is_empty());
}

#[test]
fn test_type_filter_suppresses_events() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let tx = resolved_tx();

    // Only MX enabled; the A/AAAA transaction renders nothing
    let filter = VisibilityFilter::all().with_types([RecordType::Mx]);
    for direction in [Direction::ToServer, Direction::ToClient] {
        let stats = log(&sink, &tx, filter, OutputMode::Discrete, direction);
        assert_eq!(stats, EmitStats::default());
    }
    assert!(fs::read_to_string(&path).unwrap().is_empty());
}

#[test]
fn test_direction_flags_gate_legs() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let tx = resolved_tx();

    let mut answers_only = VisibilityFilter::all();
    answers_only.set_queries(false);

    let request = log(
        &sink,
        &tx,
        answers_only,
        OutputMode::Discrete,
        Direction::ToServer,
    );
    let response = log(
        &sink,
        &tx,
        answers_only,
        OutputMode::Discrete,
        Direction::ToClient,
    );
    assert_eq!(request, EmitStats::default());
    assert_eq!(response.written, 3);
    assert_eq!(events(&path).len(), 3);
}

#[test]
fn test_events_reuse_one_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let tx = resolved_tx();
    let env = envelope();

    // One buffer across legs and transactions, cleared per event
    let mut buffer = BytesMut::new();
    for _ in 0..2 {
        log_transaction(
            &sink,
            &mut buffer,
            &env,
            &tx,
            VisibilityFilter::all(),
            OutputMode::Split,
            Direction::ToClient,
        );
    }

    let events = events(&path);
    assert_eq!(events.len(), 2);
    assert_eq!(
        serde_json::to_string(&events[0]).unwrap(),
        serde_json::to_string(&events[1]).unwrap()
    );
}
