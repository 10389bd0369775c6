use crate::{rcode_string, type_string, RecordType};

#[test]
fn wire_lookup_round_trips() {
    for rtype in RecordType::all() {
        assert_eq!(RecordType::from_wire(rtype.wire_code()), Some(rtype));
    }
}

#[test]
fn config_name_lookup_is_case_insensitive() {
    assert_eq!(
        RecordType::from_config_name("cname").unwrap(),
        RecordType::Cname
    );
    assert_eq!(
        RecordType::from_config_name("CNAME").unwrap(),
        RecordType::Cname
    );
    assert_eq!(
        RecordType::from_config_name("NsapPtr").unwrap(),
        RecordType::NsapPtr
    );
}

#[test]
fn unknown_config_name_is_an_error() {
    let err = RecordType::from_config_name("cnmae").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown record type mnemonic 'cnmae'"
    );
}

#[test]
fn type_string_known_and_fallback() {
    assert_eq!(type_string(1), "A");
    assert_eq!(type_string(28), "AAAA");
    assert_eq!(type_string(256), "URI");
    // Codes outside the table render as TYPE{n}
    assert_eq!(type_string(65), "TYPE65");
    assert_eq!(type_string(65535), "TYPE65535");
}

#[test]
fn rcode_string_known_and_fallback() {
    assert_eq!(rcode_string(0), "NOERROR");
    assert_eq!(rcode_string(2), "SERVFAIL");
    assert_eq!(rcode_string(3), "NXDOMAIN");
    assert_eq!(rcode_string(5), "REFUSED");
    assert_eq!(rcode_string(11), "RCODE11");
    assert_eq!(rcode_string(4095), "RCODE4095");
}

#[test]
fn mnemonics_match_table_position() {
    assert_eq!(RecordType::A.mnemonic(), "A");
    assert_eq!(RecordType::NsapPtr.mnemonic(), "NSAPPTR");
    assert_eq!(RecordType::Nsec3param.mnemonic(), "NSEC3PARAM");
    assert_eq!(RecordType::Uri.mnemonic(), "URI");
    assert_eq!(RecordType::Uri as usize, RecordType::COUNT - 1);
}
