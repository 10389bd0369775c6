//! dnseve - Protocol
//!
//! Core types shared between the DNS parser and the output stage:
//! - `DnsTransaction` - one parsed query/response exchange
//! - `QueryEntry` / `AnswerEntry` - record entries carried by a transaction
//! - `RecordType` - resource-record types with config and wire mnemonics
//! - `VisibilityFilter` - bitmask selecting which directions/types are logged
//!
//! # Design Principles
//!
//! - **Explicit lengths**: name and rdata travel as owned byte vectors, never
//!   NUL-terminated strings - wire data may contain embedded zero bytes.
//! - **Read-only to the output stage**: the parser owns and mutates
//!   transactions; the output stage only borrows them.

mod error;
mod filter;
mod record;
mod transaction;

pub use error::ProtocolError;
pub use filter::VisibilityFilter;
pub use record::{rcode_string, type_string, RecordType};
pub use transaction::{AnswerEntry, Direction, DnsTransaction, QueryEntry};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod record_test;
