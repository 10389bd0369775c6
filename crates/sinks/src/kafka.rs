//! Kafka backend
//!
//! Fire-and-forget producer: events go into librdkafka's local queue and
//! delivery happens in the background. A full queue drops the event; a
//! broken producer is rebuilt from the retained `ClientConfig` under the
//! reconnect throttle.

use std::sync::Arc;
use std::time::Duration;

use rdkafka::config::{ClientConfig, RDKafkaLogLevel};
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::producer::{BaseProducer, BaseRecord, Producer};
use tracing::{debug, warn};

use dnseve_config::KafkaOutputConfig;

use crate::common::{SinkError, SinkMetrics, WriteOutcome};
use crate::throttle::ReconnectThrottle;

/// Kafka topic destination
pub struct KafkaBackend {
    /// Retained so a broken producer can be rebuilt with identical settings
    client_config: ClientConfig,
    producer: Option<BaseProducer>,
    topic: String,
    partition: Option<i32>,
    throttle: ReconnectThrottle,
    metrics: Arc<SinkMetrics>,
}

impl KafkaBackend {
    /// Build the producer.
    ///
    /// # Errors
    ///
    /// Producer creation only fails on bad settings, so it is fatal at
    /// startup. Unreachable brokers are not: the queue absorbs events
    /// until delivery succeeds or the queue fills.
    pub fn open(
        config: &KafkaOutputConfig,
        sensor_name: Option<&str>,
        metrics: Arc<SinkMetrics>,
    ) -> Result<Self, SinkError> {
        let client_id = match sensor_name {
            Some(name) => format!("dnseve-{name}"),
            None => "dnseve".to_string(),
        };

        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", &config.brokers)
            .set("client.id", &client_id)
            .set("compression.codec", &config.compression)
            .set("message.send.max.retries", config.max_retries.to_string())
            .set(
                "retry.backoff.ms",
                config.retry_backoff.as_millis().to_string(),
            )
            .set(
                "queue.buffering.max.messages",
                config.buffer_max_messages.to_string(),
            )
            .set_log_level(log_level(config.log_level));

        let producer = client_config
            .create::<BaseProducer>()
            .map_err(|e| SinkError::init(format!("kafka producer: {e}")))?;

        Ok(Self {
            client_config,
            producer: Some(producer),
            topic: config.topic.clone(),
            partition: config.partition,
            throttle: ReconnectThrottle::new(config.reconnect_interval),
            metrics,
        })
    }

    /// Enqueue one event for delivery.
    pub fn write(&mut self, payload: &[u8]) -> WriteOutcome {
        if self.producer.is_none() && !self.try_rebuild() {
            return WriteOutcome::Dropped;
        }
        let Some(producer) = self.producer.as_ref() else {
            return WriteOutcome::Dropped;
        };

        let mut record = BaseRecord::<(), [u8]>::to(&self.topic).payload(payload);
        if let Some(partition) = self.partition {
            record = record.partition(partition);
        }

        let outcome = match producer.send(record) {
            Ok(()) => WriteOutcome::Written,
            Err((KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull), _)) => {
                // Broker outage or backpressure: shed this event, keep
                // the producer and its queued backlog
                debug!(topic = %self.topic, "kafka queue full, dropping event");
                WriteOutcome::Dropped
            }
            Err((e, _)) => {
                warn!(topic = %self.topic, error = %e, "kafka produce failed");
                self.producer = None;
                WriteOutcome::Dropped
            }
        };

        // Serve delivery callbacks without blocking
        if let Some(producer) = self.producer.as_ref() {
            producer.poll(Duration::ZERO);
        }
        outcome
    }

    /// Drain the local queue before shutdown.
    pub fn close(&mut self) {
        if let Some(producer) = self.producer.take() {
            if let Err(e) = producer.flush(Duration::from_secs(5)) {
                warn!(topic = %self.topic, error = %e, "kafka flush failed");
            }
        }
    }

    fn try_rebuild(&mut self) -> bool {
        if !self.throttle.should_attempt() {
            return false;
        }
        self.metrics.reconnect();

        match self.client_config.create::<BaseProducer>() {
            Ok(producer) => {
                debug!(topic = %self.topic, "kafka producer rebuilt");
                self.producer = Some(producer);
                self.throttle.reset();
                true
            }
            Err(e) => {
                warn!(topic = %self.topic, error = %e, "kafka producer rebuild failed");
                false
            }
        }
    }
}

/// Map a syslog-scale level (0-7) onto librdkafka's log levels
fn log_level(level: u8) -> RDKafkaLogLevel {
    match level {
        0 => RDKafkaLogLevel::Emerg,
        1 => RDKafkaLogLevel::Alert,
        2 => RDKafkaLogLevel::Critical,
        3 => RDKafkaLogLevel::Error,
        4 => RDKafkaLogLevel::Warning,
        5 => RDKafkaLogLevel::Notice,
        6 => RDKafkaLogLevel::Info,
        _ => RDKafkaLogLevel::Debug,
    }
}
