//! Protocol error types

use thiserror::Error;

/// Errors from protocol-level lookups
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A record-type mnemonic from configuration did not match any known type
    #[error("unknown record type mnemonic '{0}'")]
    UnknownRecordType(String),
}
