use super::helpers::small_header;
use crate::*;

fn encode(record: &Record) -> Vec<u8> {
    let mut buf = Vec::new();
    write_record(&mut buf, &small_header(), record).unwrap();
    buf
}

// -------------------- Encoding --------------------

#[test]
fn short_values_are_space_padded() {
    let bytes = encode(&Record::live(&[Some("ann"), Some("nyc")]));
    assert_eq!(bytes.len(), 18);
    assert_eq!(&bytes[0..2], &[0x00, 0x00]);
    assert_eq!(&bytes[2..10], b"ann     ");
    assert_eq!(&bytes[10..18], b"nyc     ");
}

#[test]
fn long_values_are_truncated() {
    let bytes = encode(&Record::live(&[Some("bartholomew"), Some("x")]));
    assert_eq!(&bytes[2..10], b"bartholo");
}

#[test]
fn null_value_is_all_padding() {
    let bytes = encode(&Record::live::<&str>(&[None, Some("la")]));
    assert_eq!(&bytes[2..10], b"        ");
}

#[test]
fn deleted_flag_is_0x8000() {
    let mut record = Record::live(&[Some("ann"), Some("nyc")]);
    record.deleted = true;
    let bytes = encode(&record);
    assert_eq!(&bytes[0..2], &[0x80, 0x00]);
}

#[test]
fn missing_trailing_fields_are_padding() {
    let bytes = encode(&Record::live(&[Some("ann")]));
    assert_eq!(bytes.len(), 18);
    assert_eq!(&bytes[10..18], b"        ");
}

// -------------------- Decoding --------------------

#[test]
fn decode_keeps_padding() {
    let bytes = encode(&Record::live(&[Some("ann"), Some("nyc")]));
    let record = read_record(&mut bytes.as_slice(), &small_header()).unwrap();
    assert!(!record.deleted);
    assert_eq!(record.to_strings(), vec!["ann     ", "nyc     "]);
    assert_eq!(record.trimmed(0).as_deref(), Some("ann"));
}

#[test]
fn unknown_flag_is_corrupt() {
    let mut bytes = encode(&Record::live(&[Some("ann"), Some("nyc")]));
    bytes[0] = 0x00;
    bytes[1] = 0x80;
    let err = read_record(&mut bytes.as_slice(), &small_header()).unwrap_err();
    assert!(matches!(err, DataFileError::Corrupt(_)), "got {:?}", err);
}

#[test]
fn short_buffer_is_io_error() {
    let bytes = encode(&Record::live(&[Some("ann"), Some("nyc")]));
    let err = read_record(&mut &bytes[..10], &small_header()).unwrap_err();
    assert!(matches!(err, DataFileError::Io(_)));
}

#[test]
fn field_str_out_of_range_is_none() {
    let record = Record::live(&[Some("a")]);
    assert!(record.field_str(3).is_none());
}

#[test]
fn fitted_matches_what_is_stored() {
    let rec = Record::live(&[Some("bartholomew"), Some("la"), Some("extra")]);
    let fitted = rec.fitted(&small_header());
    assert_eq!(fitted.fields, vec![b"bartholo".to_vec(), b"la".to_vec()]);

    let stored = read_record(&mut encode(&rec).as_slice(), &small_header()).unwrap();
    assert_eq!(fitted.trimmed(0), stored.trimmed(0));
    assert_eq!(fitted.trimmed(1), stored.trimmed(1));
}
