//! DNS transaction data model
//!
//! These are the parser-owned structures the output stage consumes. Names
//! and rdata are length-delimited byte vectors straight off the wire; they
//! may contain embedded NUL bytes and are not guaranteed to be UTF-8.

/// Which way a packet travelled on the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client to server (a request)
    ToServer,
    /// Server to client (a response)
    ToClient,
}

/// One question entry from the query section.
#[derive(Debug, Clone, Default)]
pub struct QueryEntry {
    /// Wire record-type code
    pub rrtype: u16,
    /// Queried name, raw wire bytes
    pub name: Vec<u8>,
}

/// One resource record from the answer section.
#[derive(Debug, Clone, Default)]
pub struct AnswerEntry {
    /// Wire record-type code
    pub rrtype: u16,
    /// Time to live in seconds
    pub ttl: u32,
    /// Record owner name, raw wire bytes
    pub name: Vec<u8>,
    /// Record data, raw wire bytes (may be empty)
    pub rdata: Vec<u8>,
}

/// One query/response exchange, as assembled by the parser.
#[derive(Debug, Clone, Default)]
pub struct DnsTransaction {
    /// DNS message id
    pub tx_id: u64,
    /// Response code from the reply header (0 until a reply is seen)
    pub rcode: u16,
    /// Question entries
    pub queries: Vec<QueryEntry>,
    /// Answer records
    pub answers: Vec<AnswerEntry>,
    /// A reply was observed for this transaction
    pub replied: bool,
    /// The transaction timed out without a reply
    pub reply_lost: bool,
}

impl DnsTransaction {
    /// New empty transaction with the given message id
    pub fn new(tx_id: u64) -> Self {
        DnsTransaction {
            tx_id,
            ..Default::default()
        }
    }
}
