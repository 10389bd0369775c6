//! Output destination configuration
//!
//! One destination per logger: a file, a unix socket, a Redis server, a
//! Kafka cluster, or the local syslog daemon. The `type` tag selects the
//! transport; everything else has a working default.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Configuration for the event output destination
///
/// # Example
///
/// ```toml
/// [output]
/// type = "file"
/// path = "/var/log/dnseve/eve.json"
///
/// # or:
/// [output]
/// type = "redis"
/// server = "10.0.0.5"
/// key = "dns-events"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputConfig {
    /// Regular file, one JSON event per line
    File(FileOutputConfig),

    /// Connected unix stream socket
    UnixStream(SocketOutputConfig),

    /// Unix datagram socket, one event per datagram
    UnixDgram(SocketOutputConfig),

    /// Redis list or pubsub channel
    Redis(RedisOutputConfig),

    /// Kafka topic
    Kafka(KafkaOutputConfig),

    /// Local syslog daemon
    Syslog(SyslogOutputConfig),
}

impl OutputConfig {
    /// Get the destination type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::UnixStream(_) => "unix_stream",
            Self::UnixDgram(_) => "unix_dgram",
            Self::Redis(_) => "redis",
            Self::Kafka(_) => "kafka",
            Self::Syslog(_) => "syslog",
        }
    }

    /// Validate required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::File(c) if c.path.is_empty() => {
                Err(ConfigError::missing_field("output", "file", "path"))
            }
            Self::UnixStream(c) | Self::UnixDgram(c) if c.path.is_empty() => {
                Err(ConfigError::missing_field("output", self.type_name(), "path"))
            }
            Self::Redis(c) if c.port == 0 => Err(ConfigError::invalid_value(
                "output",
                "redis",
                "port",
                "must be non-zero",
            )),
            Self::Kafka(c) if c.brokers.is_empty() => {
                Err(ConfigError::missing_field("output", "kafka", "brokers"))
            }
            Self::Kafka(c) if c.topic.is_empty() => {
                Err(ConfigError::missing_field("output", "kafka", "topic"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::File(FileOutputConfig::default())
    }
}

/// File destination
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output file path
    /// Default: "dns.json"
    pub path: String,

    /// Append to an existing file instead of truncating
    /// Default: true
    pub append: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            path: "dns.json".into(),
            append: true,
        }
    }
}

/// Unix socket destination (stream or datagram)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocketOutputConfig {
    /// Socket path
    /// Required
    pub path: String,

    /// Minimum wait between reconnect attempts
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub reconnect_interval: Duration,
}

impl Default for SocketOutputConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            reconnect_interval: Duration::from_secs(1),
        }
    }
}

/// Redis insertion command
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RedisMode {
    /// LPUSH onto a list (default)
    #[default]
    #[serde(alias = "lpush")]
    List,
    /// RPUSH onto a list
    Rpush,
    /// PUBLISH to a channel
    #[serde(alias = "publish")]
    Channel,
}

impl RedisMode {
    /// The Redis command this mode issues
    pub fn command(self) -> &'static str {
        match self {
            Self::List => "LPUSH",
            Self::Rpush => "RPUSH",
            Self::Channel => "PUBLISH",
        }
    }
}

/// Redis command pipelining
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisPipelineConfig {
    /// Pipeline commands instead of waiting for each reply
    /// Default: false
    pub enabled: bool,

    /// Commands sent before harvesting their replies
    /// Default: 10
    pub batch_size: usize,
}

impl Default for RedisPipelineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            batch_size: 10,
        }
    }
}

/// Redis destination
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisOutputConfig {
    /// Server hostname or address
    /// Default: 127.0.0.1
    pub server: String,

    /// Server port
    /// Default: 6379
    pub port: u16,

    /// Insertion command (list, rpush, channel)
    /// Default: list
    pub mode: RedisMode,

    /// List or channel key
    /// Default: "dnseve"
    pub key: String,

    /// Command pipelining (sync mode only)
    pub pipelining: RedisPipelineConfig,

    /// Drive commands asynchronously on the engine's event loop instead of
    /// blocking the worker
    /// Default: false
    #[serde(rename = "async")]
    pub use_async: bool,

    /// Minimum wait between reconnect attempts
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub reconnect_interval: Duration,
}

impl Default for RedisOutputConfig {
    fn default() -> Self {
        Self {
            server: "127.0.0.1".into(),
            port: 6379,
            mode: RedisMode::List,
            key: "dnseve".into(),
            pipelining: RedisPipelineConfig::default(),
            use_async: false,
            reconnect_interval: Duration::from_secs(1),
        }
    }
}

impl RedisOutputConfig {
    /// Connection URL for the configured server
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.server, self.port)
    }
}

/// Kafka destination
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KafkaOutputConfig {
    /// Bootstrap broker list (host:port, comma separated)
    /// Default: 127.0.0.1:9092
    pub brokers: String,

    /// Topic to produce to
    /// Default: "dnseve"
    pub topic: String,

    /// Fixed partition; absent lets the broker assign one
    pub partition: Option<i32>,

    /// Compression codec (none, gzip, snappy, lz4, zstd)
    /// Default: snappy
    pub compression: String,

    /// Delivery retries per message
    /// Default: 1
    pub max_retries: u32,

    /// Wait between delivery retries
    /// Default: 10ms
    #[serde(with = "humantime_serde")]
    pub retry_backoff: Duration,

    /// Local queue capacity in messages; events beyond it are dropped
    /// Default: 100000
    pub buffer_max_messages: u64,

    /// librdkafka internal log level (syslog scale, 0-7)
    /// Default: 6
    pub log_level: u8,

    /// Minimum wait between producer recreation attempts
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub reconnect_interval: Duration,
}

impl Default for KafkaOutputConfig {
    fn default() -> Self {
        Self {
            brokers: "127.0.0.1:9092".into(),
            topic: "dnseve".into(),
            partition: None,
            compression: "snappy".into(),
            max_retries: 1,
            retry_backoff: Duration::from_millis(10),
            buffer_max_messages: 100_000,
            log_level: 6,
            reconnect_interval: Duration::from_secs(1),
        }
    }
}

/// Syslog destination
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyslogOutputConfig {
    /// Syslog facility
    /// Default: local0
    pub facility: String,

    /// Syslog severity applied to every event
    /// Default: info
    pub level: String,

    /// Process identity in the syslog header
    /// Default: "dnseve"
    pub identity: String,
}

impl Default for SyslogOutputConfig {
    fn default() -> Self {
        Self {
            facility: "local0".into(),
            level: "info".into(),
            identity: "dnseve".into(),
        }
    }
}
