//! Visibility filter bitmask
//!
//! A single `u64` decides what the DNS logger renders: bit 0 enables the
//! query direction, bit 1 the answer direction, and bits 2..=59 enable
//! individual record types (one bit per `RecordType` table entry).

use crate::record::RecordType;

/// Bitmask selecting which directions and record types are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFilter(u64);

impl VisibilityFilter {
    /// Bit enabling query-direction logging
    pub const QUERIES: u64 = 1 << 0;
    /// Bit enabling answer-direction logging
    pub const ANSWERS: u64 = 1 << 1;
    /// Every bit set: both directions, all types, including types that have
    /// no dedicated bit
    pub const ALL: u64 = !0u64;
    /// All type bits without the direction bits
    pub const ALL_TYPES: u64 = !(Self::QUERIES | Self::ANSWERS);

    /// Both directions, every record type. The default when no per-type
    /// selection is configured.
    pub fn all() -> Self {
        VisibilityFilter(Self::ALL)
    }

    /// No directions, no types - logs nothing.
    pub fn none() -> Self {
        VisibilityFilter(0)
    }

    /// Raw bitmask accessor
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Build from a raw bitmask
    pub fn from_bits(bits: u64) -> Self {
        VisibilityFilter(bits)
    }

    /// Enable or disable the query direction
    pub fn set_queries(&mut self, enabled: bool) {
        self.set(Self::QUERIES, enabled);
    }

    /// Enable or disable the answer direction
    pub fn set_answers(&mut self, enabled: bool) {
        self.set(Self::ANSWERS, enabled);
    }

    /// Replace the all-types default with an explicit selection.
    ///
    /// Clears every type bit, keeps the direction bits, then sets one bit
    /// per listed type.
    pub fn with_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = RecordType>,
    {
        self.0 &= Self::QUERIES | Self::ANSWERS;
        for rtype in types {
            self.0 |= rtype.filter_bit();
        }
        self
    }

    /// True when query-direction logging is enabled
    pub fn queries(self) -> bool {
        self.0 & Self::QUERIES != 0
    }

    /// True when answer-direction logging is enabled
    pub fn answers(self) -> bool {
        self.0 & Self::ANSWERS != 0
    }

    /// True when every type bit is set (no per-type selection active)
    pub fn all_types(self) -> bool {
        self.0 & Self::ALL_TYPES == Self::ALL_TYPES
    }

    /// Whether a record with this wire type code should be rendered.
    ///
    /// With the all-types sentinel active every code passes, including codes
    /// outside the known table. Under an explicit selection an unknown code
    /// has no bit and is filtered out.
    pub fn record_enabled(self, wire: u16) -> bool {
        if self.all_types() {
            return true;
        }
        match RecordType::from_wire(wire) {
            Some(rtype) => self.0 & rtype.filter_bit() != 0,
            None => false,
        }
    }

    fn set(&mut self, bit: u64, enabled: bool) {
        if enabled {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self::all()
    }
}
