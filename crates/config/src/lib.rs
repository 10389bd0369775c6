//! dnseve Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Example Minimal Config
//!
//! ```toml
//! [output]
//! type = "file"
//! path = "/var/log/dnseve/eve.json"
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [log]
//! level = "debug"
//!
//! [dns]
//! query = true
//! answer = true
//! mode = "unified"
//! rrtypes = ["a", "aaaa", "cname", "mx"]
//!
//! [output]
//! type = "redis"
//! server = "10.0.0.5"
//! mode = "channel"
//! key = "dns-events"
//! async = true
//! ```

mod dns;
mod error;
mod logging;
mod output;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use dns::{DnsLogConfig, OutputMode};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use output::{
    FileOutputConfig, KafkaOutputConfig, OutputConfig, RedisMode, RedisOutputConfig,
    RedisPipelineConfig, SocketOutputConfig, SyslogOutputConfig,
};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults except `[output]`,
/// which must name a destination.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sensor name carried in client identifiers
    pub sensor_name: Option<String>,

    /// Logging configuration
    pub log: LogConfig,

    /// DNS logger configuration
    pub dns: DnsLogConfig,

    /// Event output destination
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks the output destination's required fields and that the dns
    /// record-type selection resolves.
    fn validate(&self) -> Result<()> {
        self.output.validate()?;
        self.dns.build_filter()?;
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
