//! The contiguous-array decoder: the common case, wrapping a single `&[u8]`.
//!
//! Grounded directly on the donor crate's `BytesReader`, generalized to
//! implement [`CodedInput`] and to support aliasing reads when constructed
//! from a [`Bytes`] container.

use super::varint_decode;
use super::{CodedInput, LimitState};
use crate::bytes::Bytes;
use crate::config::DecoderConfig;
use crate::errors::{Error, Result};

/// Decodes directly against an in-memory `&[u8]`.
///
/// This is the variant generated code reaches for by default: no
/// allocation to construct, no indirection to read through.
pub struct SliceReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// Set when constructed from a [`Bytes`]: lets `read_raw_bytes` hand
    /// back zero-copy substrings instead of copies when aliasing is on.
    origin: Option<Bytes>,
    limit: LimitState,
    config: DecoderConfig,
}

impl<'a> SliceReader<'a> {
    /// Wraps `bytes` with default config (aliasing disabled).
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        SliceReader {
            bytes,
            pos: 0,
            origin: None,
            limit: LimitState::default(),
            config: DecoderConfig::default(),
        }
    }

    /// Wraps `bytes` with an explicit config.
    pub fn from_slice_with_config(bytes: &'a [u8], config: DecoderConfig) -> Self {
        SliceReader {
            bytes,
            pos: 0,
            origin: None,
            limit: LimitState::default(),
            config,
        }
    }

    /// Wraps a [`Bytes`] container. Aliasing is still governed by
    /// `config.enable_aliasing`; this only makes aliasing *possible*.
    pub fn from_bytes(container: &'a Bytes) -> Self {
        SliceReader {
            bytes: container.as_slice(),
            pos: 0,
            origin: Some(container.clone()),
            limit: LimitState::default(),
            config: DecoderConfig::default(),
        }
    }

    /// Like [`from_bytes`](Self::from_bytes), with an explicit config.
    pub fn from_bytes_with_config(container: &'a Bytes, config: DecoderConfig) -> Self {
        SliceReader {
            bytes: container.as_slice(),
            pos: 0,
            origin: Some(container.clone()),
            limit: LimitState::default(),
            config,
        }
    }

    /// Bytes physically present beyond the current limit. Exposed for
    /// parity with the field the reference decoders track explicitly;
    /// here it's cheaper to derive on demand than to keep in sync.
    pub fn buffer_size_after_limit(&self) -> i64 {
        let physical_end = self.bytes.len() as i64;
        (physical_end - self.limit.current_limit).max(0)
    }

    #[inline]
    fn effective_end(&self) -> usize {
        let limit = self.limit.current_limit;
        if limit >= self.bytes.len() as i64 {
            self.bytes.len()
        } else {
            limit.max(0) as usize
        }
    }

    /// The unread suffix of the backing slice, bounded by the current limit.
    pub(crate) fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..self.effective_end()]
    }

    /// Advances the cursor by `n` bytes without reading them. Caller must
    /// have already checked `n <= self.remaining().len()`.
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Borrows a string with the source's own lifetime, at zero cost,
    /// bypassing the owned-`String` path every other variant is stuck with.
    /// Only meaningful here: the other three backends have no single
    /// contiguous buffer to borrow from.
    pub fn read_str_borrowed(&mut self) -> Result<&'a str> {
        let bytes = self.read_bytes_borrowed()?;
        core::str::from_utf8(bytes).map_err(Error::from)
    }

    /// Borrows raw bytes with the source's own lifetime.
    pub fn read_bytes_borrowed(&mut self) -> Result<&'a [u8]> {
        let len = varint_decode::read_varint32(self.bytes, &mut self.pos, self.effective_end())?;
        let len = len as i32;
        if len < 0 {
            return Err(Error::NegativeSize);
        }
        let len = len as usize;
        let end = self.effective_end();
        if end - self.pos < len {
            return Err(Error::TruncatedMessage);
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.bytes[start..start + len])
    }
}

impl<'a> CodedInput for SliceReader<'a> {
    fn limit_state(&self) -> &LimitState {
        &self.limit
    }
    fn limit_state_mut(&mut self) -> &mut LimitState {
        &mut self.limit
    }
    fn config(&self) -> &DecoderConfig {
        &self.config
    }
    fn total_bytes_read(&self) -> i64 {
        self.pos as i64
    }

    fn read_raw_varint32(&mut self) -> Result<u32> {
        let end = self.effective_end();
        varint_decode::read_varint32(self.bytes, &mut self.pos, end)
    }
    fn read_raw_varint64(&mut self) -> Result<u64> {
        let end = self.effective_end();
        varint_decode::read_varint64(self.bytes, &mut self.pos, end)
    }
    fn read_raw_little_endian32(&mut self) -> Result<u32> {
        let end = self.effective_end();
        varint_decode::read_fixed32(self.bytes, &mut self.pos, end)
    }
    fn read_raw_little_endian64(&mut self) -> Result<u64> {
        let end = self.effective_end();
        varint_decode::read_fixed64(self.bytes, &mut self.pos, end)
    }

    fn read_raw_bytes(&mut self, len: usize) -> Result<Bytes> {
        let end = self.effective_end();
        if end - self.pos < len {
            return Err(Error::TruncatedMessage);
        }
        let start = self.pos;
        self.pos += len;
        if self.config.enable_aliasing {
            if let Some(origin) = &self.origin {
                return origin.substring(start, start + len);
            }
        }
        Ok(Bytes::copy_from_slice(&self.bytes[start..start + len]))
    }

    fn skip_raw_bytes(&mut self, len: usize) -> Result<()> {
        let end = self.effective_end();
        if end - self.pos < len {
            return Err(Error::TruncatedMessage);
        }
        self.pos += len;
        Ok(())
    }

    fn is_physically_at_end(&mut self) -> Result<bool> {
        Ok(self.pos >= self.bytes.len())
    }
}
