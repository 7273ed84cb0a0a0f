//! Encoding: five backends sharing one trait.
//!
//! Mirrors the [`reader`](crate::reader) module's shape: [`CodedOutput`]
//! carries the shared varint/fixed/length-delimited logic as default
//! methods, built out of the handful of primitives
//! ([`CodedOutput::write_raw_byte`] and friends) each backend supplies for
//! its own backing store.

pub mod array;
pub mod byte_output;
pub mod direct;
pub mod heap;
#[cfg(feature = "std")]
pub mod stream;

use crate::errors::Result;
use crate::message::MessageWrite;
use crate::varint::{
    compute_int32_size_no_tag, compute_sint32_size_no_tag, compute_sint64_size_no_tag,
    compute_uint32_size_no_tag, compute_uint64_size_no_tag,
};
use crate::wire_format::{
    make_tag, zigzag_encode32, zigzag_encode64, FIXED32_SIZE, FIXED64_SIZE, WIRE_TYPE_END_GROUP,
    WIRE_TYPE_LENGTH_DELIMITED, WIRE_TYPE_START_GROUP,
};
use alloc::vec::Vec;

/// The operations common to every encoder variant.
pub trait CodedOutput {
    /// Writes a single byte.
    fn write_raw_byte(&mut self, value: u8) -> Result<()>;
    /// Writes a run of bytes verbatim.
    fn write_raw_bytes(&mut self, buf: &[u8]) -> Result<()>;
    /// Bytes of capacity left before the next write fails, for backends
    /// with a fixed capacity; `Err(UnsupportedOperation)` for backends
    /// (streams) that have none.
    fn space_left(&self) -> Result<i64>;

    fn write_raw_varint32(&mut self, mut value: u32) -> Result<()> {
        loop {
            if value & !0x7f == 0 {
                return self.write_raw_byte(value as u8);
            }
            self.write_raw_byte(((value & 0x7f) | 0x80) as u8)?;
            value >>= 7;
        }
    }

    fn write_raw_varint64(&mut self, mut value: u64) -> Result<()> {
        loop {
            if value & !0x7f == 0 {
                return self.write_raw_byte(value as u8);
            }
            self.write_raw_byte(((value & 0x7f) | 0x80) as u8)?;
            value >>= 7;
        }
    }

    fn write_tag(&mut self, field_number: u32, wire_type: u8) -> Result<()> {
        self.write_raw_varint32(make_tag(field_number, wire_type))
    }

    fn write_int32(&mut self, value: i32) -> Result<()> {
        if value >= 0 {
            self.write_raw_varint32(value as u32)
        } else {
            // Sign-extended to 64 bits: always costs the full 10 bytes.
            self.write_raw_varint64(value as i64 as u64)
        }
    }
    fn write_int64(&mut self, value: i64) -> Result<()> {
        self.write_raw_varint64(value as u64)
    }
    fn write_uint32(&mut self, value: u32) -> Result<()> {
        self.write_raw_varint32(value)
    }
    fn write_uint64(&mut self, value: u64) -> Result<()> {
        self.write_raw_varint64(value)
    }
    fn write_sint32(&mut self, value: i32) -> Result<()> {
        self.write_raw_varint32(zigzag_encode32(value))
    }
    fn write_sint64(&mut self, value: i64) -> Result<()> {
        self.write_raw_varint64(zigzag_encode64(value))
    }
    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_raw_byte(value as u8)
    }
    fn write_enum(&mut self, value: i32) -> Result<()> {
        self.write_int32(value)
    }
    fn write_fixed32(&mut self, value: u32) -> Result<()> {
        self.write_raw_bytes(&value.to_le_bytes())
    }
    fn write_fixed64(&mut self, value: u64) -> Result<()> {
        self.write_raw_bytes(&value.to_le_bytes())
    }
    fn write_sfixed32(&mut self, value: i32) -> Result<()> {
        self.write_fixed32(value as u32)
    }
    fn write_sfixed64(&mut self, value: i64) -> Result<()> {
        self.write_fixed64(value as u64)
    }
    fn write_float(&mut self, value: f32) -> Result<()> {
        self.write_fixed32(value.to_bits())
    }
    fn write_double(&mut self, value: f64) -> Result<()> {
        self.write_fixed64(value.to_bits())
    }

    /// Writes a length-delimited byte field: a varint length, then the
    /// bytes themselves.
    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.write_raw_varint32(data.len() as u32)?;
        self.write_raw_bytes(data)
    }

    /// Writes a length-delimited string field. `str` is always valid UTF-8
    /// with an exact `O(1)` byte length, so there's no size to estimate.
    fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Writes a length-delimited string field from WTF-16 (UTF-16 that may
    /// carry unpaired surrogates). Scans once to get the exact UTF-8 byte
    /// length before writing the length varint, so there is no
    /// after-the-fact byte-shuffling if the estimate turns out wrong.
    fn write_utf16_str(&mut self, units: &[u16]) -> Result<()> {
        let len = crate::utf8::encoded_len_utf16(units)?;
        self.write_raw_varint32(len as u32)?;
        let mut encoded = Vec::with_capacity(len);
        crate::utf8::encode_utf16_into(units, &mut encoded)?;
        self.write_raw_bytes(&encoded)
    }

    /// Writes a nested message: a varint length (`msg.get_size()`) followed
    /// by the message's own fields. Does not write the field's own tag;
    /// pair with [`write_tag`](CodedOutput::write_tag) or use
    /// [`write_message_with_tag`](CodedOutput::write_message_with_tag).
    fn write_message<M: MessageWrite>(&mut self, msg: &M) -> Result<()>
    where
        Self: Sized,
    {
        self.write_raw_varint32(msg.get_size() as u32)?;
        msg.write_message(self)
    }

    /// [`write_tag`](CodedOutput::write_tag) followed by
    /// [`write_message`](CodedOutput::write_message).
    fn write_message_with_tag<M: MessageWrite>(&mut self, field_number: u32, msg: &M) -> Result<()>
    where
        Self: Sized,
    {
        self.write_tag(field_number, WIRE_TYPE_LENGTH_DELIMITED)?;
        self.write_message(msg)
    }

    /// Writes a deprecated group field: `START_GROUP`, the message's
    /// fields with no length prefix, then `END_GROUP`.
    fn write_group<M: MessageWrite>(&mut self, field_number: u32, msg: &M) -> Result<()>
    where
        Self: Sized,
    {
        self.write_tag(field_number, WIRE_TYPE_START_GROUP)?;
        msg.write_message(self)?;
        self.write_tag(field_number, WIRE_TYPE_END_GROUP)
    }

    /// Writes the legacy `MessageSet` extension layout: `START_GROUP`, the
    /// extension's type id as a bare `uint32`, the extension message as a
    /// length-delimited field, then `END_GROUP`. Neither the type id nor
    /// the message carry their own tag; the layout is positional.
    fn write_message_set_extension<M: MessageWrite>(
        &mut self,
        field_number: u32,
        type_id: u32,
        msg: &M,
    ) -> Result<()>
    where
        Self: Sized,
    {
        self.write_tag(field_number, WIRE_TYPE_START_GROUP)?;
        self.write_uint32(type_id)?;
        self.write_message(msg)?;
        self.write_tag(field_number, WIRE_TYPE_END_GROUP)
    }

    /// Writes a length-delimited string field from WTF-16, replacing any
    /// unpaired surrogate with `U+FFFD` instead of failing. The lossy
    /// counterpart to [`write_utf16_str`](CodedOutput::write_utf16_str).
    fn write_utf16_str_lossy(&mut self, units: &[u16]) -> Result<()> {
        let mut encoded = Vec::new();
        crate::utf8::encode_utf16_lossy_into(units, &mut encoded);
        self.write_bytes(&encoded)
    }
}

/// Exact encoded size of a field, tag included. Generated `get_size`
/// implementations sum these; kept here rather than duplicated per field
/// kind at each call site.
pub mod sizeof {
    use super::*;

    /// Size of a tag plus an `int32` value.
    pub fn int32(field_number: u32, value: i32) -> usize {
        (compute_uint32_size_no_tag(make_tag(field_number, 0)) + compute_int32_size_no_tag(value))
            as usize
    }
    /// Size of a tag plus a `sint32` value.
    pub fn sint32(field_number: u32, value: i32) -> usize {
        (compute_uint32_size_no_tag(make_tag(field_number, 0))
            + compute_sint32_size_no_tag(value)) as usize
    }
    /// Size of a tag plus a `sint64` value.
    pub fn sint64(field_number: u32, value: i64) -> usize {
        (compute_uint32_size_no_tag(make_tag(field_number, 0))
            + compute_sint64_size_no_tag(value)) as usize
    }
    /// Size of a tag plus a `uint64` value.
    pub fn uint64(field_number: u32, value: u64) -> usize {
        (compute_uint32_size_no_tag(make_tag(field_number, 0)) + compute_uint64_size_no_tag(value))
            as usize
    }
    /// Size of a tag plus a fixed-width 4-byte value.
    pub fn fixed32(field_number: u32) -> usize {
        compute_uint32_size_no_tag(make_tag(field_number, 0)) as usize + FIXED32_SIZE
    }
    /// Size of a tag plus a fixed-width 8-byte value.
    pub fn fixed64(field_number: u32) -> usize {
        compute_uint32_size_no_tag(make_tag(field_number, 0)) as usize + FIXED64_SIZE
    }
    /// Size of a tag, a length varint, and `len` bytes of payload.
    pub fn length_delimited(field_number: u32, len: usize) -> usize {
        compute_uint32_size_no_tag(make_tag(field_number, 0)) as usize
            + compute_uint32_size_no_tag(len as u32) as usize
            + len
    }
}

#[cfg(test)]
mod tests {
    use super::array::ArrayWriter;
    use super::*;

    #[test]
    fn varint_round_trips_through_reader() {
        let mut buf = [0u8; 16];
        let mut w = ArrayWriter::new(&mut buf);
        w.write_int32(150).unwrap();
        let written = w.bytes_written();
        let mut r = crate::reader::slice::SliceReader::from_slice(&buf[..written]);
        use crate::reader::CodedInput;
        assert_eq!(r.read_int32().unwrap(), 150);
    }

    #[test]
    fn negative_int32_costs_ten_bytes() {
        let mut buf = [0u8; 16];
        let mut w = ArrayWriter::new(&mut buf);
        w.write_int32(-1).unwrap();
        assert_eq!(w.bytes_written(), 10);
    }

    #[test]
    fn sizeof_length_delimited_matches_actual_write() {
        let mut buf = [0u8; 16];
        let mut w = ArrayWriter::new(&mut buf);
        w.write_tag(3, WIRE_TYPE_LENGTH_DELIMITED).unwrap();
        w.write_bytes(b"hey").unwrap();
        assert_eq!(w.bytes_written(), sizeof::length_delimited(3, 3));
    }

    #[test]
    fn utf16_length_varint_matches_scenario_six() {
        // 100 BMP code units, each a 2-byte UTF-8 character (U+0080..),
        // so the UTF-8 length is 200 and its varint needs 2 bytes, same
        // as a 100-byte length would.
        let units: Vec<u16> = core::iter::repeat(0x00A9u16).take(100).collect();
        let mut buf = [0u8; 512];
        let mut w = ArrayWriter::new(&mut buf);
        w.write_utf16_str(&units).unwrap();

        let written = w.written();
        // Varint length prefix: 200 = 0b1100_1000 -> 0xC8, 0x01.
        assert_eq!(&written[..2], &[0xc8, 0x01]);
        assert_eq!(written.len(), 2 + 200);

        let mut r = crate::reader::slice::SliceReader::from_slice(written);
        use crate::reader::CodedInput;
        let decoded = r.read_string().unwrap();
        assert_eq!(decoded.chars().count(), 100);
        assert_eq!(decoded.len(), 200);
    }

    #[test]
    fn utf16_str_lossy_substitutes_unpaired_surrogate() {
        let units = [b'a' as u16, 0xD800u16, b'b' as u16];
        let mut buf = [0u8; 16];
        let mut w = ArrayWriter::new(&mut buf);
        w.write_utf16_str_lossy(&units).unwrap();

        let written = w.written();
        let mut r = crate::reader::slice::SliceReader::from_slice(written);
        use crate::reader::CodedInput;
        assert_eq!(r.read_string().unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn message_set_extension_round_trips() {
        use crate::message::{MessageRead, MessageWrite};
        use crate::reader::CodedInput;
        use crate::wire_format::{make_tag, WIRE_TYPE_VARINT};

        struct Extension {
            value: i32,
        }
        impl MessageWrite for Extension {
            fn write_message<W: CodedOutput>(&self, w: &mut W) -> Result<()> {
                w.write_tag(7, WIRE_TYPE_VARINT)?;
                w.write_int32(self.value)
            }
            fn get_size(&self) -> usize {
                sizeof::int32(7, self.value)
            }
        }
        impl MessageRead for Extension {
            fn from_reader<R: CodedInput>(r: &mut R) -> Result<Self> {
                let mut value = 0;
                loop {
                    match r.read_tag()? {
                        0 => break,
                        t if t == make_tag(7, WIRE_TYPE_VARINT) => value = r.read_int32()?,
                        t => {
                            if !r.skip_field(t)? {
                                break;
                            }
                        }
                    }
                }
                Ok(Extension { value })
            }
        }

        let mut heap = super::heap::HeapWriter::new();
        heap.write_message_set_extension(5, 1234, &Extension { value: 42 })
            .unwrap();
        let bytes = heap.into_vec();

        let mut r = crate::reader::slice::SliceReader::from_slice(&bytes);
        let tag = r.read_tag().unwrap();
        assert_eq!(tag, make_tag(5, WIRE_TYPE_START_GROUP));
        let (type_id, decoded): (u32, Extension) = r.read_message_set_extension(5).unwrap();
        assert_eq!(type_id, 1234);
        assert_eq!(decoded.value, 42);
        assert_eq!(r.read_tag().unwrap(), 0);
    }
}
