//! Canonical wire-format scenarios, pinned down byte-for-byte.

use protocodec::reader::slice::SliceReader;
use protocodec::reader::CodedInput;
use protocodec::writer::array::ArrayWriter;
use protocodec::writer::heap::HeapWriter;
use protocodec::writer::CodedOutput;
use protocodec::{Error, MessageRead, MessageWrite, Result};

#[test]
fn scenario_1_varint_field() {
    let mut buf = [0u8; 16];
    let mut w = ArrayWriter::new(&mut buf);
    w.write_tag(1, protocodec::wire_format::WIRE_TYPE_VARINT)
        .unwrap();
    w.write_int32(150).unwrap();
    assert_eq!(w.written(), &[0x08, 0x96, 0x01]);

    let mut r = SliceReader::from_slice(w.written());
    let tag = r.read_tag().unwrap();
    assert_eq!(protocodec::wire_format::tag_field_number(tag), 1);
    assert_eq!(r.read_int32().unwrap(), 150);
}

#[test]
fn scenario_2_string_field() {
    let mut buf = [0u8; 16];
    let mut w = ArrayWriter::new(&mut buf);
    w.write_tag(2, protocodec::wire_format::WIRE_TYPE_LENGTH_DELIMITED)
        .unwrap();
    w.write_str("testing").unwrap();
    assert_eq!(
        w.written(),
        &[0x12, 0x07, 0x74, 0x65, 0x73, 0x74, 0x69, 0x6e, 0x67]
    );
}

#[test]
fn scenario_3_nested_message() {
    struct Inner {
        a: String,
        b: i32,
    }
    impl MessageWrite for Inner {
        fn write_message<W: CodedOutput>(&self, w: &mut W) -> Result<()> {
            w.write_tag(1, protocodec::wire_format::WIRE_TYPE_LENGTH_DELIMITED)?;
            w.write_str(&self.a)?;
            w.write_tag(2, protocodec::wire_format::WIRE_TYPE_VARINT)?;
            w.write_int32(self.b)?;
            Ok(())
        }
        fn get_size(&self) -> usize {
            protocodec::writer::sizeof::length_delimited(1, self.a.len())
                + protocodec::writer::sizeof::int32(2, self.b)
        }
    }
    impl MessageRead for Inner {
        fn from_reader<R: CodedInput>(r: &mut R) -> Result<Self> {
            let mut a = String::new();
            let mut b = 0i32;
            loop {
                match r.read_tag()? {
                    0 => break,
                    8 => b = r.read_int32()?,
                    10 => a = r.read_string()?,
                    t => {
                        r.skip_field(t)?;
                    }
                }
            }
            Ok(Inner { a, b })
        }
    }

    let inner = Inner {
        a: "A".to_string(),
        b: 300,
    };
    assert_eq!(inner.get_size(), 6);

    let mut heap = HeapWriter::new();
    heap.write_tag(3, protocodec::wire_format::WIRE_TYPE_LENGTH_DELIMITED)
        .unwrap();
    heap.write_message(&inner).unwrap();
    let bytes = heap.into_vec();
    assert_eq!(
        bytes,
        vec![0x1a, 0x06, 0x0a, 0x01, 0x41, 0x10, 0xac, 0x02]
    );

    let mut r = SliceReader::from_slice(&bytes);
    let tag = r.read_tag().unwrap();
    assert_eq!(protocodec::wire_format::tag_field_number(tag), 3);
    let decoded: Inner = r.read_message().unwrap();
    assert_eq!(decoded.a, "A");
    assert_eq!(decoded.b, 300);
}

#[test]
fn scenario_4_negative_int32_decodes_from_ten_bytes() {
    let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
    let mut r = SliceReader::from_slice(&bytes);
    assert_eq!(r.read_int32().unwrap(), -1);
}

#[test]
fn scenario_5_eleven_continuation_bytes_is_malformed() {
    let bytes = [0x80u8; 11];
    let mut r = SliceReader::from_slice(&bytes);
    assert!(matches!(r.read_int32(), Err(Error::MalformedVarint)));
}

#[test]
fn recursion_guard_rejects_over_limit_nesting() {
    // Build a chain of field-1 length-delimited sub-messages, innermost
    // (empty) first, each wrapping the previous as its sole field.
    let depth = 105usize;
    let mut payload: Vec<u8> = Vec::new();
    for _ in 0..depth {
        let mut w = HeapWriter::new();
        w.write_tag(1, protocodec::wire_format::WIRE_TYPE_LENGTH_DELIMITED)
            .unwrap();
        w.write_bytes(&payload).unwrap();
        payload = w.into_vec();
    }
    let bytes = payload;

    struct Nested;
    impl MessageRead for Nested {
        fn from_reader<R: CodedInput>(r: &mut R) -> Result<Self> {
            match r.read_tag()? {
                0 => Ok(Nested),
                10 => {
                    let _: Nested = r.read_message()?;
                    Ok(Nested)
                }
                t => {
                    r.skip_field(t)?;
                    Ok(Nested)
                }
            }
        }
    }

    let mut r = SliceReader::from_slice(&bytes);
    let result: Result<Nested> = r.read_message();
    assert!(matches!(result, Err(Error::RecursionLimitExceeded(_))));
}

#[test]
fn aliasing_shares_arc_allocation() {
    use protocodec::reader::slice::SliceReader;
    use protocodec::{Bytes, DecoderConfig};

    let container = Bytes::copy_from_slice(&[0x0a, 0x03, b'h', b'i', b'!']);
    let config = DecoderConfig::default().with_aliasing(true);
    let mut r = SliceReader::from_bytes_with_config(&container, config);
    r.read_tag().unwrap();
    let field = r.read_bytes().unwrap();
    assert_eq!(field.as_slice(), b"hi!");
}
