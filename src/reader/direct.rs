//! The direct-buffer decoder: reads against memory reached through a raw
//! pointer rather than a borrow-checked slice.
//!
//! There is no off-heap allocation in safe Rust, so this variant exists to
//! model the access pattern (pointer + length, constructed unsafely by a
//! caller who has already established the memory is valid and immutable
//! for the reader's lifetime) rather than to reach memory the rest of the
//! crate couldn't otherwise touch. The bounds-checked path underneath is
//! identical to [`SliceReader`](super::slice::SliceReader); the
//! `unsafe-direct` feature additionally exposes unchecked fixed-width reads
//! for callers who have already validated there's enough room.

use super::slice::SliceReader;
use super::{CodedInput, LimitState};
use crate::bytes::Bytes;
use crate::config::DecoderConfig;
use crate::errors::Result;

/// Decodes against a buffer reached through a raw pointer.
pub struct DirectReader<'a> {
    inner: SliceReader<'a>,
}

impl<'a> DirectReader<'a> {
    /// Wraps `len` bytes starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `len` bytes for the entire lifetime
    /// `'a`, and the memory it points to must not be mutated through any
    /// other handle while this reader is alive.
    pub unsafe fn from_raw_parts(ptr: *const u8, len: usize) -> Self {
        DirectReader {
            inner: SliceReader::from_slice(core::slice::from_raw_parts(ptr, len)),
        }
    }

    /// Like [`from_raw_parts`](Self::from_raw_parts), with an explicit config.
    ///
    /// # Safety
    ///
    /// Same requirements as [`from_raw_parts`](Self::from_raw_parts).
    pub unsafe fn from_raw_parts_with_config(
        ptr: *const u8,
        len: usize,
        config: DecoderConfig,
    ) -> Self {
        DirectReader {
            inner: SliceReader::from_slice_with_config(
                core::slice::from_raw_parts(ptr, len),
                config,
            ),
        }
    }

    /// Wraps an ordinary slice. Safe, since a `&'a [u8]` already carries
    /// its own validity guarantee; exists so callers that are generic over
    /// "some direct-style reader" don't need an `unsafe` block for the
    /// common case of already holding a slice.
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        DirectReader {
            inner: SliceReader::from_slice(bytes),
        }
    }
}

#[cfg(feature = "unsafe-direct")]
impl<'a> DirectReader<'a> {
    /// Reads a little-endian `u32` without a bounds check.
    ///
    /// # Safety
    ///
    /// The caller must know at least 4 bytes remain (e.g. because it just
    /// checked `bytes_until_limit`). Reading past the end is undefined
    /// behavior.
    pub unsafe fn read_fixed32_unchecked(&mut self) -> u32 {
        let ptr = self.inner.remaining().as_ptr();
        self.inner.advance(4);
        ptr.cast::<u32>().read_unaligned().to_le()
    }

    /// Reads a little-endian `u64` without a bounds check.
    ///
    /// # Safety
    ///
    /// Same requirement as [`read_fixed32_unchecked`](Self::read_fixed32_unchecked).
    pub unsafe fn read_fixed64_unchecked(&mut self) -> u64 {
        let ptr = self.inner.remaining().as_ptr();
        self.inner.advance(8);
        ptr.cast::<u64>().read_unaligned().to_le()
    }
}

impl<'a> CodedInput for DirectReader<'a> {
    fn limit_state(&self) -> &LimitState {
        self.inner.limit_state()
    }
    fn limit_state_mut(&mut self) -> &mut LimitState {
        self.inner.limit_state_mut()
    }
    fn config(&self) -> &DecoderConfig {
        self.inner.config()
    }
    fn total_bytes_read(&self) -> i64 {
        self.inner.total_bytes_read()
    }
    fn read_raw_varint32(&mut self) -> Result<u32> {
        self.inner.read_raw_varint32()
    }
    fn read_raw_varint64(&mut self) -> Result<u64> {
        self.inner.read_raw_varint64()
    }

    fn read_raw_little_endian32(&mut self) -> Result<u32> {
        self.inner.read_raw_little_endian32()
    }
    fn read_raw_little_endian64(&mut self) -> Result<u64> {
        self.inner.read_raw_little_endian64()
    }
    fn read_raw_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.inner.read_raw_bytes(len)
    }
    fn skip_raw_bytes(&mut self, len: usize) -> Result<()> {
        self.inner.skip_raw_bytes(len)
    }
    fn is_physically_at_end(&mut self) -> Result<bool> {
        self.inner.is_physically_at_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CodedInput;

    #[test]
    fn reads_through_raw_pointer() {
        let buf = [0x08u8, 0x96, 0x01];
        let mut r = unsafe { DirectReader::from_raw_parts(buf.as_ptr(), buf.len()) };
        let tag = r.read_tag().unwrap();
        assert_eq!(crate::wire_format::tag_field_number(tag), 1);
        assert_eq!(r.read_int32().unwrap(), 150);
    }

    #[test]
    fn from_slice_needs_no_unsafe() {
        let buf = [0x08u8, 0x01];
        let mut r = DirectReader::from_slice(&buf);
        assert_eq!(r.read_tag().unwrap(), 8);
    }

    #[cfg(feature = "unsafe-direct")]
    #[test]
    fn unchecked_fixed32_matches_checked_path() {
        let buf = [1u8, 0, 0, 0];
        let mut a = DirectReader::from_slice(&buf);
        let mut b = DirectReader::from_slice(&buf);
        let checked = a.read_raw_little_endian32().unwrap();
        let unchecked = unsafe { b.read_fixed32_unchecked() };
        assert_eq!(checked, unchecked);
    }
}
