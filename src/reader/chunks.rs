//! The iterable-of-chunks decoder: reads across a sequence of independent
//! `Bytes` buffers (e.g. pages pulled off a ring buffer, or the segments of
//! a rope-like structure) without requiring them to already be joined into
//! one contiguous allocation.
//!
//! A read that falls entirely within one chunk costs nothing extra over
//! the array decoder. A read that straddles a chunk boundary is copied
//! into an owned buffer; there is no attempt to alias across chunks, since
//! nothing downstream of this crate understands a multi-segment view (see
//! the crate-level design notes on why a rope type is future work, not
//! present scope).

use core::iter::Peekable;

use super::varint_decode::{decode_varint32_from, decode_varint64_from};
use super::{CodedInput, LimitState};
use crate::bytes::Bytes;
use crate::config::DecoderConfig;
use crate::errors::{Error, Result};
use alloc::vec::Vec;

/// Decodes across an iterator of independently-owned byte chunks.
pub struct ChunkReader<I: Iterator<Item = Bytes>> {
    chunks: Peekable<I>,
    current: Bytes,
    offset: usize,
    total_read: i64,
    limit: LimitState,
    config: DecoderConfig,
}

impl<I: Iterator<Item = Bytes>> ChunkReader<I> {
    /// Builds a reader over `chunks`, read in iteration order.
    pub fn new<T: IntoIterator<IntoIter = I>>(chunks: T) -> Self {
        ChunkReader {
            chunks: chunks.into_iter().peekable(),
            current: Bytes::new(),
            offset: 0,
            total_read: 0,
            limit: LimitState::default(),
            config: DecoderConfig::default(),
        }
    }

    /// Like [`new`](Self::new), with an explicit config.
    pub fn with_config<T: IntoIterator<IntoIter = I>>(chunks: T, config: DecoderConfig) -> Self {
        ChunkReader {
            chunks: chunks.into_iter().peekable(),
            current: Bytes::new(),
            offset: 0,
            total_read: 0,
            limit: LimitState::default(),
            config,
        }
    }

    /// Advances to the next non-exhausted chunk, if any. Returns `true` iff
    /// a byte is now available to read.
    fn ensure_current_nonempty(&mut self) -> bool {
        while self.offset >= self.current.size() {
            match self.chunks.next() {
                Some(chunk) => {
                    self.current = chunk;
                    self.offset = 0;
                }
                None => return false,
            }
        }
        true
    }

    fn next_byte(&mut self) -> Result<u8> {
        if self.limit.current_limit != i64::MAX && self.total_read >= self.limit.current_limit {
            return Err(Error::TruncatedMessage);
        }
        if !self.ensure_current_nonempty() {
            return Err(Error::TruncatedMessage);
        }
        let b = self.current.byte_at(self.offset)?;
        self.offset += 1;
        self.total_read += 1;
        Ok(b)
    }
}

impl<I: Iterator<Item = Bytes>> CodedInput for ChunkReader<I> {
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
        self.total_read
    }

    fn read_raw_varint32(&mut self) -> Result<u32> {
        decode_varint32_from(|| self.next_byte())
    }
    fn read_raw_varint64(&mut self) -> Result<u64> {
        decode_varint64_from(|| self.next_byte())
    }
    fn read_raw_little_endian32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        for b in &mut buf {
            *b = self.next_byte()?;
        }
        Ok(u32::from_le_bytes(buf))
    }
    fn read_raw_little_endian64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        for b in &mut buf {
            *b = self.next_byte()?;
        }
        Ok(u64::from_le_bytes(buf))
    }

    fn read_raw_bytes(&mut self, len: usize) -> Result<Bytes> {
        // Fast path: the whole field lives in the current chunk.
        if self.current.size() - self.offset >= len {
            if self.limit.current_limit != i64::MAX
                && self.total_read + len as i64 > self.limit.current_limit
            {
                return Err(Error::TruncatedMessage);
            }
            let out = if self.config.enable_aliasing {
                self.current.substring(self.offset, self.offset + len)?
            } else {
                Bytes::copy_from_slice(&self.current.as_slice()[self.offset..self.offset + len])
            };
            self.offset += len;
            self.total_read += len as i64;
            return Ok(out);
        }
        // Slow path: copy byte-by-byte across chunk boundaries.
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.next_byte()?);
        }
        Ok(Bytes::from(out))
    }

    fn skip_raw_bytes(&mut self, len: usize) -> Result<()> {
        if self.current.size() - self.offset >= len {
            if self.limit.current_limit != i64::MAX
                && self.total_read + len as i64 > self.limit.current_limit
            {
                return Err(Error::TruncatedMessage);
            }
            self.offset += len;
            self.total_read += len as i64;
            return Ok(());
        }
        for _ in 0..len {
            self.next_byte()?;
        }
        Ok(())
    }

    fn is_physically_at_end(&mut self) -> Result<bool> {
        Ok(!self.ensure_current_nonempty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn reads_field_split_across_three_chunks() {
        // tag=0x12 (field 2, length-delimited), len=5, "hello" split 1/3/1
        let chunks = vec![
            Bytes::copy_from_slice(&[0x12, 0x05, b'h']),
            Bytes::copy_from_slice(b"ell"),
            Bytes::copy_from_slice(b"o"),
        ];
        let mut r = ChunkReader::new(chunks);
        let tag = r.read_tag().unwrap();
        assert_eq!(crate::wire_format::tag_field_number(tag), 2);
        let bytes = r.read_bytes().unwrap();
        assert_eq!(bytes.as_slice(), b"hello");
        assert_eq!(r.read_tag().unwrap(), 0);
    }

    #[test]
    fn varint_split_across_chunk_boundary() {
        // 150 as varint is [0x96, 0x01]; split after the first byte.
        let chunks = vec![
            Bytes::copy_from_slice(&[0x08, 0x96]),
            Bytes::copy_from_slice(&[0x01]),
        ];
        let mut r = ChunkReader::new(chunks);
        r.read_tag().unwrap();
        assert_eq!(r.read_int32().unwrap(), 150);
    }

    #[test]
    fn empty_chunks_are_skipped_transparently() {
        let chunks = vec![Bytes::new(), Bytes::copy_from_slice(&[0x08, 0x01]), Bytes::new()];
        let mut r = ChunkReader::new(chunks);
        assert_eq!(r.read_tag().unwrap(), 8);
        assert_eq!(r.read_int32().unwrap(), 1);
        assert_eq!(r.read_tag().unwrap(), 0);
    }

    #[test]
    fn running_out_of_chunks_mid_field_truncates() {
        let chunks = vec![Bytes::copy_from_slice(&[0x0a, 0x05, b'h', b'i'])];
        let mut r = ChunkReader::new(chunks);
        r.read_tag().unwrap();
        assert!(matches!(r.read_bytes(), Err(Error::TruncatedMessage)));
    }
}
