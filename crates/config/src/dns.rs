//! DNS logger configuration
//!
//! Controls which transaction legs are rendered, how many events one
//! transaction produces, and which record types are visible.

use serde::Deserialize;

use dnseve_protocol::{RecordType, VisibilityFilter};

use crate::error::Result;

/// Event cardinality of the DNS logger
///
/// - `discrete`: one event per question / per answer record
/// - `split`: one event per direction, carrying an array
/// - `unified`: one event per transaction, queries and answers together
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One event per record (default)
    #[default]
    Discrete,
    /// One event per direction with an array body
    Split,
    /// One event per transaction
    Unified,
}

/// DNS logger configuration
///
/// # Example
///
/// ```toml
/// [dns]
/// query = true
/// answer = true
/// mode = "unified"
/// rrtypes = ["a", "aaaa", "cname"]
/// ```
///
/// When `rrtypes` is omitted every record type is logged, including types
/// without a mnemonic of their own.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DnsLogConfig {
    /// Log the query direction
    /// Default: true
    pub query: bool,

    /// Log the answer direction
    /// Default: true
    pub answer: bool,

    /// Event cardinality
    /// Default: discrete
    pub mode: OutputMode,

    /// Explicit record-type selection (lowercase mnemonics)
    /// Default: absent - all types
    pub rrtypes: Option<Vec<String>>,
}

impl Default for DnsLogConfig {
    fn default() -> Self {
        Self {
            query: true,
            answer: true,
            mode: OutputMode::Discrete,
            rrtypes: None,
        }
    }
}

impl DnsLogConfig {
    /// Build the visibility filter this configuration describes.
    ///
    /// # Errors
    ///
    /// Unknown mnemonics in `rrtypes` are fatal - a typo must never
    /// silently widen or narrow what gets logged.
    pub fn build_filter(&self) -> Result<VisibilityFilter> {
        let mut filter = VisibilityFilter::all();
        filter.set_queries(self.query);
        filter.set_answers(self.answer);

        if let Some(ref names) = self.rrtypes {
            let mut types = Vec::with_capacity(names.len());
            for name in names {
                types.push(RecordType::from_config_name(name)?);
            }
            filter = filter.with_types(types);
        }

        Ok(filter)
    }
}
