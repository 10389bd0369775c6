use std::fs;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use dnseve_config::{
    DnsLogConfig, FileOutputConfig, OutputConfig, OutputMode, SocketOutputConfig,
};
use dnseve_protocol::{AnswerEntry, Direction, DnsTransaction, QueryEntry};
use dnseve_sinks::EventSink;

use super::{DnsLogContext, DnsLoggerThread, LogStatus};
use crate::envelope::FlowContext;

fn file_sink(dir: &tempfile::TempDir) -> (Arc<EventSink>, std::path::PathBuf) {
    let path = dir.path().join("eve.json");
    let config = OutputConfig::File(FileOutputConfig {
        path: path.to_string_lossy().into_owned(),
        append: true,
    });
    (
        Arc::new(EventSink::from_config(&config, None, None).unwrap()),
        path,
    )
}

fn flow() -> FlowContext {
    FlowContext {
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap(),
        flow_id: 7,
        src_ip: "192.0.2.10".parse().unwrap(),
        src_port: 40000,
        dest_ip: "192.0.2.53".parse().unwrap(),
        dest_port: 53,
        proto: "UDP".to_string(),
    }
}

fn tx() -> DnsTransaction {
    let mut tx = DnsTransaction::new(1);
    tx.replied = true;
    tx.queries.push(QueryEntry {
        rrtype: 1,
        name: b"example.com".to_vec(),
    });
    tx.answers.push(AnswerEntry {
        rrtype: 1,
        ttl: 60,
        name: b"example.com".to_vec(),
        rdata: vec![1, 2, 3, 4],
    });
    tx
}

fn logger(sink: Arc<EventSink>, config: DnsLogConfig) -> DnsLoggerThread {
    DnsLoggerThread::new(Arc::new(DnsLogContext::new(sink, &config).unwrap()))
}

#[test]
fn test_defaults_log_both_legs() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let mut logger = logger(sink, DnsLogConfig::default());

    assert_eq!(logger.log_to_server(&flow(), &tx()), LogStatus::Logged(1));
    assert_eq!(logger.log_to_client(&flow(), &tx()), LogStatus::Logged(1));
    assert_eq!(logger.events_logged(), 2);

    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[test]
fn test_unified_logs_once_per_transaction() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let config = DnsLogConfig {
        mode: OutputMode::Unified,
        ..Default::default()
    };
    let mut logger = logger(sink, config);

    assert_eq!(
        logger.on_transaction(&flow(), &tx(), Direction::ToServer),
        LogStatus::Skipped
    );
    assert_eq!(
        logger.on_transaction(&flow(), &tx(), Direction::ToClient),
        LogStatus::Logged(1)
    );
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
}

#[test]
fn test_direction_flags_skip_legs() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let config = DnsLogConfig {
        query: false,
        ..Default::default()
    };
    let mut logger = logger(sink, config);

    assert_eq!(
        logger.on_transaction(&flow(), &tx(), Direction::ToServer),
        LogStatus::Skipped
    );
    assert_eq!(
        logger.on_transaction(&flow(), &tx(), Direction::ToClient),
        LogStatus::Logged(1)
    );
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
}

#[test]
fn test_dead_destination_reports_failed() {
    let dir = tempfile::tempdir().unwrap();
    let config = OutputConfig::UnixStream(SocketOutputConfig {
        path: dir
            .path()
            .join("nobody-home.sock")
            .to_string_lossy()
            .into_owned(),
        reconnect_interval: Duration::from_secs(60),
    });
    let sink = Arc::new(EventSink::from_config(&config, None, None).unwrap());
    let mut logger = logger(sink, DnsLogConfig::default());

    assert_eq!(
        logger.on_transaction(&flow(), &tx(), Direction::ToServer),
        LogStatus::Failed
    );
    assert_eq!(logger.events_logged(), 0);
}

#[test]
fn test_rrtype_selection_skips_whole_legs() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let config = DnsLogConfig {
        rrtypes: Some(vec!["mx".to_string()]),
        ..Default::default()
    };
    let mut logger = logger(sink, config);

    assert_eq!(
        logger.on_transaction(&flow(), &tx(), Direction::ToServer),
        LogStatus::Skipped
    );
    assert_eq!(
        logger.on_transaction(&flow(), &tx(), Direction::ToClient),
        LogStatus::Skipped
    );
    assert!(fs::read_to_string(&path).unwrap().is_empty());
}

#[test]
fn test_workers_share_one_sink() {
    let dir = tempfile::tempdir().unwrap();
    let (sink, path) = file_sink(&dir);
    let ctx = Arc::new(DnsLogContext::new(Arc::clone(&sink), &DnsLogConfig::default()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            std::thread::spawn(move || {
                let mut logger = DnsLoggerThread::new(ctx);
                for _ in 0..25 {
                    logger.on_transaction(&flow(), &tx(), Direction::ToClient);
                }
                logger.events_logged()
            })
        })
        .collect();

    let total: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, 100);
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 100);
    assert_eq!(sink.metrics().events_written, 100);
}
