//! The pull-stream decoder: reads from anything implementing `std::io::Read`
//! through an internal fixed-size buffer, refilling on demand.
//!
//! Unlike the other three variants, this one has no notion of its own total
//! size ahead of time, so it tracks `size_limit` (an overall byte budget,
//! independent of any pushed length-delimited limit) to bound how much a
//! caller will pull from a stream before giving up.

use alloc::vec;
use alloc::vec::Vec;
use std::io::Read;

use super::varint_decode::{decode_varint32_from, decode_varint64_from};
use super::{CodedInput, LimitState};
use crate::bytes::Bytes;
use crate::config::DecoderConfig;
use crate::errors::{Error, Result};

/// Decodes from a buffered `std::io::Read` source.
pub struct StreamReader<R: Read> {
    source: R,
    buf: Vec<u8>,
    buf_pos: usize,
    buf_len: usize,
    total_read: i64,
    limit: LimitState,
    config: DecoderConfig,
}

impl<R: Read> StreamReader<R> {
    /// Wraps `source` with [`DecoderConfig::for_stream`] defaults.
    pub fn new(source: R) -> Self {
        Self::with_config(source, DecoderConfig::for_stream())
    }

    /// Wraps `source` with an explicit config.
    pub fn with_config(source: R, config: DecoderConfig) -> Self {
        let buf_size = config.buffer_size.max(1);
        StreamReader {
            source,
            buf: vec![0u8; buf_size],
            buf_pos: 0,
            buf_len: 0,
            total_read: 0,
            limit: LimitState::default(),
            config,
        }
    }

    fn refill(&mut self) -> Result<bool> {
        self.buf_pos = 0;
        self.buf_len = self.source.read(&mut self.buf)?;
        Ok(self.buf_len > 0)
    }

    fn next_byte(&mut self) -> Result<u8> {
        if self.total_read >= self.config.size_limit {
            return Err(Error::SizeLimitExceeded);
        }
        if self.limit.current_limit != i64::MAX && self.total_read >= self.limit.current_limit {
            return Err(Error::TruncatedMessage);
        }
        if self.buf_pos >= self.buf_len && !self.refill()? {
            return Err(Error::TruncatedMessage);
        }
        let b = self.buf[self.buf_pos];
        self.buf_pos += 1;
        self.total_read += 1;
        Ok(b)
    }
}

impl<R: Read> CodedInput for StreamReader<R> {
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
        // Streams never alias: there is no stable backing allocation to
        // share a view into once the internal buffer gets reused.
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.next_byte()?);
        }
        Ok(Bytes::from(out))
    }

    fn skip_raw_bytes(&mut self, len: usize) -> Result<()> {
        for _ in 0..len {
            self.next_byte()?;
        }
        Ok(())
    }

    fn is_physically_at_end(&mut self) -> Result<bool> {
        if self.buf_pos < self.buf_len {
            return Ok(false);
        }
        Ok(!self.refill()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_varint_field_from_stream() {
        let data: &[u8] = &[0x08, 0x96, 0x01];
        let mut r = StreamReader::new(data);
        let tag = r.read_tag().unwrap();
        assert_eq!(crate::wire_format::tag_field_number(tag), 1);
        assert_eq!(r.read_int32().unwrap(), 150);
        assert_eq!(r.read_tag().unwrap(), 0);
    }

    #[test]
    fn refills_across_tiny_buffer() {
        let data: &[u8] = &[0x08, 0x96, 0x01, 0x10, 0x02];
        let config = DecoderConfig::for_stream().with_buffer_size(1);
        let mut r = StreamReader::with_config(data, config);
        assert_eq!(r.read_tag().unwrap(), 8);
        assert_eq!(r.read_int32().unwrap(), 150);
        assert_eq!(r.read_tag().unwrap(), 16);
        assert_eq!(r.read_int32().unwrap(), 2);
    }

    #[test]
    fn size_limit_is_enforced() {
        let data: &[u8] = &[0x08, 0x96, 0x01];
        let config = DecoderConfig::for_stream().with_size_limit(1);
        let mut r = StreamReader::with_config(data, config);
        assert!(matches!(r.read_tag(), Err(Error::SizeLimitExceeded)));
    }

    #[test]
    fn truncated_stream_errors() {
        let data: &[u8] = &[0x08];
        let mut r = StreamReader::new(data);
        r.read_tag().unwrap();
        assert!(matches!(r.read_int32(), Err(Error::TruncatedMessage)));
    }
}
