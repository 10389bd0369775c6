//! Syslog backend
//!
//! Hands every event to the local syslog daemon at a fixed severity.
//! Framing and retries belong to the daemon; there is no reconnect
//! handling here.

use ::syslog::{Facility, Formatter3164, Logger, LoggerBackend};
use tracing::debug;

use dnseve_config::SyslogOutputConfig;

use crate::common::{SinkError, WriteOutcome};

/// Severity stamped on every event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Emerg,
    Alert,
    Crit,
    Err,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Severity {
    fn parse(s: &str) -> Result<Self, SinkError> {
        match s.to_ascii_lowercase().as_str() {
            "emerg" | "emergency" => Ok(Self::Emerg),
            "alert" => Ok(Self::Alert),
            "crit" | "critical" => Ok(Self::Crit),
            "err" | "error" => Ok(Self::Err),
            "warning" | "warn" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(SinkError::config(format!(
                "unknown syslog level '{other}'"
            ))),
        }
    }
}

/// Local syslog destination
pub struct SyslogBackend {
    logger: Logger<LoggerBackend, Formatter3164>,
    level: Severity,
}

impl SyslogBackend {
    /// Connect to the local daemon.
    ///
    /// # Errors
    ///
    /// A missing daemon or an unknown facility/level is fatal at
    /// startup.
    pub fn open(config: &SyslogOutputConfig) -> Result<Self, SinkError> {
        let facility = parse_facility(&config.facility)?;
        let level = Severity::parse(&config.level)?;

        let formatter = Formatter3164 {
            facility,
            hostname: None,
            process: config.identity.clone(),
            pid: std::process::id(),
        };

        let logger = syslog::unix(formatter)
            .map_err(|e| SinkError::init(format!("syslog: {e}")))?;

        Ok(Self { logger, level })
    }

    /// Send one event.
    ///
    /// Events are JSON, but the daemon expects text; invalid UTF-8 is
    /// replaced rather than dropped.
    pub fn write(&mut self, payload: &[u8]) -> WriteOutcome {
        let message = String::from_utf8_lossy(payload);
        let result = match self.level {
            Severity::Emerg => self.logger.emerg(message.as_ref()),
            Severity::Alert => self.logger.alert(message.as_ref()),
            Severity::Crit => self.logger.crit(message.as_ref()),
            Severity::Err => self.logger.err(message.as_ref()),
            Severity::Warning => self.logger.warning(message.as_ref()),
            Severity::Notice => self.logger.notice(message.as_ref()),
            Severity::Info => self.logger.info(message.as_ref()),
            Severity::Debug => self.logger.debug(message.as_ref()),
        };

        match result {
            Ok(()) => WriteOutcome::Written,
            Err(e) => {
                debug!(error = %e, "syslog send failed");
                WriteOutcome::Dropped
            }
        }
    }
}

fn parse_facility(s: &str) -> Result<Facility, SinkError> {
    let facility = match s.to_ascii_lowercase().as_str() {
        "kern" => Facility::LOG_KERN,
        "user" => Facility::LOG_USER,
        "mail" => Facility::LOG_MAIL,
        "daemon" => Facility::LOG_DAEMON,
        "auth" => Facility::LOG_AUTH,
        "syslog" => Facility::LOG_SYSLOG,
        "lpr" => Facility::LOG_LPR,
        "news" => Facility::LOG_NEWS,
        "uucp" => Facility::LOG_UUCP,
        "cron" => Facility::LOG_CRON,
        "authpriv" => Facility::LOG_AUTHPRIV,
        "ftp" => Facility::LOG_FTP,
        "local0" => Facility::LOG_LOCAL0,
        "local1" => Facility::LOG_LOCAL1,
        "local2" => Facility::LOG_LOCAL2,
        "local3" => Facility::LOG_LOCAL3,
        "local4" => Facility::LOG_LOCAL4,
        "local5" => Facility::LOG_LOCAL5,
        "local6" => Facility::LOG_LOCAL6,
        "local7" => Facility::LOG_LOCAL7,
        other => {
            return Err(SinkError::config(format!(
                "unknown syslog facility '{other}'"
            )))
        }
    };
    Ok(facility)
}
