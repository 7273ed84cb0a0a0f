//! UTF-8 validation/decode, plus the WTF-16 entry point that preserves the
//! source's min/max varint-size reservation trick.
//!
//! Rust's `&str` is always valid UTF-8 with an `O(1)` exact byte length, so
//! the ordinary string-write path never needs to estimate a length bound.
//! The estimate only earns its keep when the caller instead hands over raw
//! UTF-16 code units (e.g. marshalled across an FFI boundary) where the
//! code-unit count is cheap but the UTF-8 byte length is not known without
//! a scan.

use crate::errors::{Error, Result};
use alloc::string::String;
use alloc::vec::Vec;

/// Returns `true` iff `bytes` is well-formed UTF-8.
#[inline]
pub fn is_valid(bytes: &[u8]) -> bool {
    core::str::from_utf8(bytes).is_ok()
}

/// Decodes `bytes` as UTF-8, failing on the first invalid sequence.
#[inline]
pub fn decode_strict(bytes: &[u8]) -> Result<&str> {
    core::str::from_utf8(bytes).map_err(Error::from)
}

/// Decodes `bytes` as UTF-8, replacing invalid sequences with `U+FFFD`.
///
/// Never fails: this is the lenient decoder `read_string` uses.
#[inline]
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// The inclusive byte bounds a run of UTF-16 code units could expand to once
/// re-encoded as UTF-8: each code unit contributes at least 1 byte (ASCII)
/// and at most 3 (a lone surrogate or a BMP character outside ASCII; a
/// surrogate *pair* contributes 4 bytes for 2 units, i.e. still <= 3/unit).
#[inline]
pub const fn utf16_size_bounds(code_unit_len: usize) -> (usize, usize) {
    (code_unit_len, code_unit_len * 3)
}

/// Converts a WTF-16 buffer (UTF-16 that may contain unpaired surrogates)
/// into UTF-8 bytes, appending them to `out`.
///
/// On success, returns the number of bytes appended. Fails with
/// [`Error::UnpairedSurrogate`] at the index of the first lone surrogate.
pub fn encode_utf16_into(units: &[u16], out: &mut Vec<u8>) -> Result<usize> {
    let start_len = out.len();
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        match char::decode_utf16(core::iter::once(unit)).next().unwrap() {
            Ok(c) if !is_surrogate(unit) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                i += 1;
            }
            _ => {
                // High surrogate: look for a trailing low surrogate.
                if is_high_surrogate(unit) && i + 1 < units.len() && is_low_surrogate(units[i + 1])
                {
                    let c = combine_surrogate_pair(unit, units[i + 1]);
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    i += 2;
                } else {
                    out.truncate(start_len);
                    return Err(Error::UnpairedSurrogate(i));
                }
            }
        }
    }
    Ok(out.len() - start_len)
}

/// Like [`encode_utf16_into`], but replaces an unpaired surrogate with
/// `U+FFFD` instead of failing, matching `String::from_utf16_lossy`.
pub fn encode_utf16_lossy_into(units: &[u16], out: &mut Vec<u8>) -> usize {
    let start_len = out.len();
    for c in char::decode_utf16(units.iter().copied()) {
        let c = c.unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut buf = [0u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
    out.len() - start_len
}

/// Exact UTF-8 byte length of a well-formed (no lone surrogates) UTF-16
/// buffer, without allocating.
pub fn encoded_len_utf16(units: &[u16]) -> Result<usize> {
    let mut len = 0usize;
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        if !is_surrogate(unit) {
            len += char::from_u32(unit as u32).map(char::len_utf8).unwrap_or(3);
            i += 1;
        } else if is_high_surrogate(unit) && i + 1 < units.len() && is_low_surrogate(units[i + 1])
        {
            len += 4;
            i += 2;
        } else {
            return Err(Error::UnpairedSurrogate(i));
        }
    }
    Ok(len)
}

#[inline]
const fn is_high_surrogate(u: u16) -> bool {
    (0xD800..=0xDBFF).contains(&u)
}

#[inline]
const fn is_low_surrogate(u: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&u)
}

#[inline]
const fn is_surrogate(u: u16) -> bool {
    (0xD800..=0xDFFF).contains(&u)
}

fn combine_surrogate_pair(high: u16, low: u16) -> char {
    let c = 0x10000 + ((high as u32 - 0xD800) << 10) + (low as u32 - 0xDC00);
    char::from_u32(c).expect("valid surrogate pair always decodes to a scalar value")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        let units: Vec<u16> = "testing".encode_utf16().collect();
        let mut out = Vec::new();
        encode_utf16_into(&units, &mut out).unwrap();
        assert_eq!(out, b"testing");
    }

    #[test]
    fn surrogate_pair_encodes_to_four_bytes() {
        // U+1F600 GRINNING FACE, a surrogate pair in UTF-16.
        let units: Vec<u16> = '\u{1F600}'.encode_utf16(&mut [0u16; 2]).to_vec();
        let mut out = Vec::new();
        let n = encode_utf16_into(&units, &mut out).unwrap();
        assert_eq!(n, 4);
        assert_eq!(core::str::from_utf8(&out).unwrap(), "\u{1F600}");
    }

    #[test]
    fn lone_high_surrogate_is_rejected() {
        let units = [0xD800u16];
        let mut out = Vec::new();
        let err = encode_utf16_into(&units, &mut out).unwrap_err();
        assert!(matches!(err, Error::UnpairedSurrogate(0)));
        assert!(out.is_empty());
    }

    #[test]
    fn lone_surrogate_lossy_becomes_replacement_char() {
        let units = [b'a' as u16, 0xD800u16, b'b' as u16];
        let mut out = Vec::new();
        encode_utf16_lossy_into(&units, &mut out);
        assert_eq!(core::str::from_utf8(&out).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn encoded_len_matches_actual_output() {
        let units: Vec<u16> = "héllo".encode_utf16().collect();
        let mut out = Vec::new();
        let n = encode_utf16_into(&units, &mut out).unwrap();
        assert_eq!(n, encoded_len_utf16(&units).unwrap());
        assert_eq!(n, out.len());
    }

    #[test]
    fn invalid_utf8_bytes_rejected_strictly_but_not_lossily() {
        let bad = [0xFFu8, 0xFE, 0xFD];
        assert!(decode_strict(&bad).is_err());
        assert_eq!(decode_lossy(&bad), "\u{FFFD}\u{FFFD}\u{FFFD}");
    }
}
