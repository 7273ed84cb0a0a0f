//! Tag packing, wire-type constants, and zig-zag transforms.
//!
//! Everything here is a total function: there is no way to hand these
//! helpers an input that fails, since validation (e.g. "is this a known
//! wire type") happens where a tag is actually read off the wire.

/// A value is read as a variable-length integer.
pub const WIRE_TYPE_VARINT: u8 = 0;
/// A value is read as 8 little-endian bytes.
pub const WIRE_TYPE_FIXED64: u8 = 1;
/// A value is a varint length followed by that many bytes.
pub const WIRE_TYPE_LENGTH_DELIMITED: u8 = 2;
/// Deprecated: marks the start of a group.
pub const WIRE_TYPE_START_GROUP: u8 = 3;
/// Deprecated: marks the end of a group.
pub const WIRE_TYPE_END_GROUP: u8 = 4;
/// A value is read as 4 little-endian bytes.
pub const WIRE_TYPE_FIXED32: u8 = 5;

/// Maximum number of bytes a varint can occupy on the wire.
pub const MAX_VARINT_SIZE: usize = 10;
/// Byte width of a `fixed32`/`sfixed32`/`float` value.
pub const FIXED32_SIZE: usize = 4;
/// Byte width of a `fixed64`/`sfixed64`/`double` value.
pub const FIXED64_SIZE: usize = 8;

/// Packs a field number and wire type into a tag.
#[inline(always)]
pub const fn make_tag(field_number: u32, wire_type: u8) -> u32 {
    (field_number << 3) | (wire_type as u32)
}

/// Extracts the field number from a tag.
#[inline(always)]
pub const fn tag_field_number(tag: u32) -> u32 {
    tag >> 3
}

/// Extracts the 3-bit wire type from a tag.
#[inline(always)]
pub const fn tag_wire_type(tag: u32) -> u8 {
    (tag & 0x7) as u8
}

/// `true` iff `wire_type` is one of the six values the wire format defines.
#[inline(always)]
pub const fn is_known_wire_type(wire_type: u8) -> bool {
    wire_type <= WIRE_TYPE_FIXED32
}

/// Maps a signed 32-bit integer onto an unsigned one so that small-magnitude
/// negative numbers stay small on the wire.
#[inline(always)]
pub const fn zigzag_encode32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Inverse of [`zigzag_encode32`].
#[inline(always)]
pub const fn zigzag_decode32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Maps a signed 64-bit integer onto an unsigned one so that small-magnitude
/// negative numbers stay small on the wire.
#[inline(always)]
pub const fn zigzag_encode64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode64`].
#[inline(always)]
pub const fn zigzag_decode64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trip() {
        let tag = make_tag(1, WIRE_TYPE_VARINT);
        assert_eq!(tag, 8);
        assert_eq!(tag_field_number(tag), 1);
        assert_eq!(tag_wire_type(tag), WIRE_TYPE_VARINT);
    }

    #[test]
    fn zigzag32_pairs_small_magnitudes() {
        assert_eq!(zigzag_encode32(0), 0);
        assert_eq!(zigzag_encode32(-1), 1);
        assert_eq!(zigzag_encode32(1), 2);
        assert_eq!(zigzag_encode32(-2), 3);
        assert_eq!(zigzag_encode32(i32::MAX), u32::MAX - 1);
        assert_eq!(zigzag_encode32(i32::MIN), u32::MAX);
    }

    #[test]
    fn zigzag32_round_trips() {
        for n in [0, -1, 1, -2, 2, i32::MIN, i32::MAX, 12345, -98765] {
            assert_eq!(zigzag_decode32(zigzag_encode32(n)), n);
        }
    }

    #[test]
    fn zigzag64_round_trips() {
        for n in [0i64, -1, 1, -2, 2, i64::MIN, i64::MAX, 123456789, -987654321] {
            assert_eq!(zigzag_decode64(zigzag_encode64(n)), n);
        }
    }

    #[test]
    fn known_wire_types() {
        for wt in 0..=5u8 {
            assert!(is_known_wire_type(wt));
        }
        assert!(!is_known_wire_type(6));
        assert!(!is_known_wire_type(7));
    }
}
