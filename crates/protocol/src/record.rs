//! Resource-record types and mnemonics
//!
//! One table drives everything: wire code, lowercase configuration mnemonic,
//! uppercase output mnemonic, and the filter bit position (the variant's
//! discriminant). Unknown wire codes are not an error anywhere - they render
//! with a `TYPE{n}` fallback and are filtered out by per-type filters.

use crate::error::ProtocolError;

/// Resource-record types recognized by the visibility filter.
///
/// Discriminants are sequential table indexes, not wire codes; the filter
/// bit for a type is `discriminant + 2` (bits 0 and 1 belong to the
/// direction flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordType {
    A = 0,
    Ns,
    Md,
    Mf,
    Cname,
    Soa,
    Mb,
    Mg,
    Mr,
    Null,
    Wks,
    Ptr,
    Hinfo,
    Minfo,
    Mx,
    Txt,
    Rp,
    Afsdb,
    X25,
    Isdn,
    Rt,
    Nsap,
    NsapPtr,
    Sig,
    Key,
    Px,
    Gpos,
    Aaaa,
    Loc,
    Nxt,
    Srv,
    Atma,
    Naptr,
    Kx,
    Cert,
    A6,
    Dname,
    Opt,
    Apl,
    Ds,
    Sshfp,
    Ipseckey,
    Rrsig,
    Nsec,
    Dnskey,
    Dhcid,
    Nsec3,
    Nsec3param,
    Tlsa,
    Hip,
    Cds,
    Cdnskey,
    Spf,
    Tkey,
    Tsig,
    Maila,
    Any,
    Uri,
}

/// Table entry: wire code, config mnemonic, output mnemonic
struct RecordTypeInfo {
    rtype: RecordType,
    wire: u16,
    config_name: &'static str,
    mnemonic: &'static str,
}

/// Record-type table, in discriminant order.
#[rustfmt::skip]
static RECORD_TYPES: [RecordTypeInfo; 58] = [
    RecordTypeInfo { rtype: RecordType::A,          wire: 1,   config_name: "a",          mnemonic: "A" },
    RecordTypeInfo { rtype: RecordType::Ns,         wire: 2,   config_name: "ns",         mnemonic: "NS" },
    RecordTypeInfo { rtype: RecordType::Md,         wire: 3,   config_name: "md",         mnemonic: "MD" },
    RecordTypeInfo { rtype: RecordType::Mf,         wire: 4,   config_name: "mf",         mnemonic: "MF" },
    RecordTypeInfo { rtype: RecordType::Cname,      wire: 5,   config_name: "cname",      mnemonic: "CNAME" },
    RecordTypeInfo { rtype: RecordType::Soa,        wire: 6,   config_name: "soa",        mnemonic: "SOA" },
    RecordTypeInfo { rtype: RecordType::Mb,         wire: 7,   config_name: "mb",         mnemonic: "MB" },
    RecordTypeInfo { rtype: RecordType::Mg,         wire: 8,   config_name: "mg",         mnemonic: "MG" },
    RecordTypeInfo { rtype: RecordType::Mr,         wire: 9,   config_name: "mr",         mnemonic: "MR" },
    RecordTypeInfo { rtype: RecordType::Null,       wire: 10,  config_name: "null",       mnemonic: "NULL" },
    RecordTypeInfo { rtype: RecordType::Wks,        wire: 11,  config_name: "wks",        mnemonic: "WKS" },
    RecordTypeInfo { rtype: RecordType::Ptr,        wire: 12,  config_name: "ptr",        mnemonic: "PTR" },
    RecordTypeInfo { rtype: RecordType::Hinfo,      wire: 13,  config_name: "hinfo",      mnemonic: "HINFO" },
    RecordTypeInfo { rtype: RecordType::Minfo,      wire: 14,  config_name: "minfo",      mnemonic: "MINFO" },
    RecordTypeInfo { rtype: RecordType::Mx,         wire: 15,  config_name: "mx",         mnemonic: "MX" },
    RecordTypeInfo { rtype: RecordType::Txt,        wire: 16,  config_name: "txt",        mnemonic: "TXT" },
    RecordTypeInfo { rtype: RecordType::Rp,         wire: 17,  config_name: "rp",         mnemonic: "RP" },
    RecordTypeInfo { rtype: RecordType::Afsdb,      wire: 18,  config_name: "afsdb",      mnemonic: "AFSDB" },
    RecordTypeInfo { rtype: RecordType::X25,        wire: 19,  config_name: "x25",        mnemonic: "X25" },
    RecordTypeInfo { rtype: RecordType::Isdn,       wire: 20,  config_name: "isdn",       mnemonic: "ISDN" },
    RecordTypeInfo { rtype: RecordType::Rt,         wire: 21,  config_name: "rt",         mnemonic: "RT" },
    RecordTypeInfo { rtype: RecordType::Nsap,       wire: 22,  config_name: "nsap",       mnemonic: "NSAP" },
    RecordTypeInfo { rtype: RecordType::NsapPtr,    wire: 23,  config_name: "nsapptr",    mnemonic: "NSAPPTR" },
    RecordTypeInfo { rtype: RecordType::Sig,        wire: 24,  config_name: "sig",        mnemonic: "SIG" },
    RecordTypeInfo { rtype: RecordType::Key,        wire: 25,  config_name: "key",        mnemonic: "KEY" },
    RecordTypeInfo { rtype: RecordType::Px,         wire: 26,  config_name: "px",         mnemonic: "PX" },
    RecordTypeInfo { rtype: RecordType::Gpos,       wire: 27,  config_name: "gpos",       mnemonic: "GPOS" },
    RecordTypeInfo { rtype: RecordType::Aaaa,       wire: 28,  config_name: "aaaa",       mnemonic: "AAAA" },
    RecordTypeInfo { rtype: RecordType::Loc,        wire: 29,  config_name: "loc",        mnemonic: "LOC" },
    RecordTypeInfo { rtype: RecordType::Nxt,        wire: 30,  config_name: "nxt",        mnemonic: "NXT" },
    RecordTypeInfo { rtype: RecordType::Srv,        wire: 33,  config_name: "srv",        mnemonic: "SRV" },
    RecordTypeInfo { rtype: RecordType::Atma,       wire: 34,  config_name: "atma",       mnemonic: "ATMA" },
    RecordTypeInfo { rtype: RecordType::Naptr,      wire: 35,  config_name: "naptr",      mnemonic: "NAPTR" },
    RecordTypeInfo { rtype: RecordType::Kx,         wire: 36,  config_name: "kx",         mnemonic: "KX" },
    RecordTypeInfo { rtype: RecordType::Cert,       wire: 37,  config_name: "cert",       mnemonic: "CERT" },
    RecordTypeInfo { rtype: RecordType::A6,         wire: 38,  config_name: "a6",         mnemonic: "A6" },
    RecordTypeInfo { rtype: RecordType::Dname,      wire: 39,  config_name: "dname",      mnemonic: "DNAME" },
    RecordTypeInfo { rtype: RecordType::Opt,        wire: 41,  config_name: "opt",        mnemonic: "OPT" },
    RecordTypeInfo { rtype: RecordType::Apl,        wire: 42,  config_name: "apl",        mnemonic: "APL" },
    RecordTypeInfo { rtype: RecordType::Ds,         wire: 43,  config_name: "ds",         mnemonic: "DS" },
    RecordTypeInfo { rtype: RecordType::Sshfp,      wire: 44,  config_name: "sshfp",      mnemonic: "SSHFP" },
    RecordTypeInfo { rtype: RecordType::Ipseckey,   wire: 45,  config_name: "ipseckey",   mnemonic: "IPSECKEY" },
    RecordTypeInfo { rtype: RecordType::Rrsig,      wire: 46,  config_name: "rrsig",      mnemonic: "RRSIG" },
    RecordTypeInfo { rtype: RecordType::Nsec,       wire: 47,  config_name: "nsec",       mnemonic: "NSEC" },
    RecordTypeInfo { rtype: RecordType::Dnskey,     wire: 48,  config_name: "dnskey",     mnemonic: "DNSKEY" },
    RecordTypeInfo { rtype: RecordType::Dhcid,      wire: 49,  config_name: "dhcid",      mnemonic: "DHCID" },
    RecordTypeInfo { rtype: RecordType::Nsec3,      wire: 50,  config_name: "nsec3",      mnemonic: "NSEC3" },
    RecordTypeInfo { rtype: RecordType::Nsec3param, wire: 51,  config_name: "nsec3param", mnemonic: "NSEC3PARAM" },
    RecordTypeInfo { rtype: RecordType::Tlsa,       wire: 52,  config_name: "tlsa",       mnemonic: "TLSA" },
    RecordTypeInfo { rtype: RecordType::Hip,        wire: 55,  config_name: "hip",        mnemonic: "HIP" },
    RecordTypeInfo { rtype: RecordType::Cds,        wire: 59,  config_name: "cds",        mnemonic: "CDS" },
    RecordTypeInfo { rtype: RecordType::Cdnskey,    wire: 60,  config_name: "cdnskey",    mnemonic: "CDNSKEY" },
    RecordTypeInfo { rtype: RecordType::Spf,        wire: 99,  config_name: "spf",        mnemonic: "SPF" },
    RecordTypeInfo { rtype: RecordType::Tkey,       wire: 249, config_name: "tkey",       mnemonic: "TKEY" },
    RecordTypeInfo { rtype: RecordType::Tsig,       wire: 250, config_name: "tsig",       mnemonic: "TSIG" },
    RecordTypeInfo { rtype: RecordType::Maila,      wire: 254, config_name: "maila",      mnemonic: "MAILA" },
    RecordTypeInfo { rtype: RecordType::Any,        wire: 255, config_name: "any",        mnemonic: "ANY" },
    RecordTypeInfo { rtype: RecordType::Uri,        wire: 256, config_name: "uri",        mnemonic: "URI" },
];

impl RecordType {
    /// Number of known record types
    pub const COUNT: usize = RECORD_TYPES.len();

    /// Look up a record type by its wire code
    pub fn from_wire(wire: u16) -> Option<Self> {
        RECORD_TYPES
            .iter()
            .find(|info| info.wire == wire)
            .map(|info| info.rtype)
    }

    /// Look up a record type by its configuration mnemonic
    /// (case-insensitive, e.g. "cname")
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::UnknownRecordType` for unrecognized
    /// mnemonics - configuration typos must be fatal, not silent.
    pub fn from_config_name(name: &str) -> Result<Self, ProtocolError> {
        RECORD_TYPES
            .iter()
            .find(|info| info.config_name.eq_ignore_ascii_case(name))
            .map(|info| info.rtype)
            .ok_or_else(|| ProtocolError::UnknownRecordType(name.to_string()))
    }

    /// The wire code for this record type
    pub fn wire_code(self) -> u16 {
        self.info().wire
    }

    /// Lowercase configuration mnemonic (e.g. "aaaa")
    pub fn config_name(self) -> &'static str {
        self.info().config_name
    }

    /// Uppercase output mnemonic (e.g. "AAAA")
    pub fn mnemonic(self) -> &'static str {
        self.info().mnemonic
    }

    /// Bit used for this type in the visibility filter.
    ///
    /// Bits 0 and 1 are the direction flags; type bits start at 2.
    pub const fn filter_bit(self) -> u64 {
        1u64 << (self as u32 + 2)
    }

    /// Iterate over all known record types in table order
    pub fn all() -> impl Iterator<Item = RecordType> {
        RECORD_TYPES.iter().map(|info| info.rtype)
    }

    fn info(self) -> &'static RecordTypeInfo {
        &RECORD_TYPES[self as usize]
    }
}

/// Render a wire type code as its mnemonic, falling back to `TYPE{n}`
/// for codes outside the table (unknown types are not an error).
pub fn type_string(wire: u16) -> String {
    match RecordType::from_wire(wire) {
        Some(rtype) => rtype.mnemonic().to_string(),
        None => format!("TYPE{wire}"),
    }
}

/// Render a DNS response code as its mnemonic, falling back to `RCODE{n}`.
pub fn rcode_string(rcode: u16) -> String {
    let name = match rcode {
        0 => "NOERROR",
        1 => "FORMERR",
        2 => "SERVFAIL",
        3 => "NXDOMAIN",
        4 => "NOTIMP",
        5 => "REFUSED",
        6 => "YXDOMAIN",
        7 => "YXRRSET",
        8 => "NXRRSET",
        9 => "NOTAUTH",
        10 => "NOTZONE",
        16 => "BADVERS",
        17 => "BADKEY",
        18 => "BADTIME",
        19 => "BADMODE",
        20 => "BADNAME",
        21 => "BADALG",
        22 => "BADTRUNC",
        _ => return format!("RCODE{rcode}"),
    };
    name.to_string()
}
