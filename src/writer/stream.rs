//! The buffered-stream encoder: writes through an internal buffer, flushing
//! to a `std::io::Write` sink whenever it fills. Grounded on the donor
//! crate's blanket `impl<W: std::io::Write> WriterBackend for W`, split out
//! into its own buffering backend now that buffering is explicit rather
//! than delegated straight to the sink on every call.

use std::io::Write;

use super::CodedOutput;
use crate::config::EncoderConfig;
use crate::errors::Result;
use alloc::vec;
use alloc::vec::Vec;

/// Encodes through an internal buffer, flushed to `W` as it fills.
pub struct StreamWriter<W: Write> {
    sink: W,
    buf: Vec<u8>,
    pos: usize,
}

impl<W: Write> StreamWriter<W> {
    /// Wraps `sink` with the default buffer size.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, EncoderConfig::default())
    }

    /// Wraps `sink` with an explicit config.
    pub fn with_config(sink: W, config: EncoderConfig) -> Self {
        StreamWriter {
            sink,
            buf: vec![0u8; config.buffer_size.max(1)],
            pos: 0,
        }
    }

    /// Flushes any buffered bytes to the sink and returns it.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }

    /// Flushes any buffered bytes to the sink without consuming the writer.
    pub fn flush(&mut self) -> Result<()> {
        if self.pos > 0 {
            self.sink.write_all(&self.buf[..self.pos])?;
            self.pos = 0;
        }
        Ok(())
    }
}

impl<W: Write> CodedOutput for StreamWriter<W> {
    fn write_raw_byte(&mut self, value: u8) -> Result<()> {
        if self.pos == self.buf.len() {
            self.flush()?;
        }
        self.buf[self.pos] = value;
        self.pos += 1;
        Ok(())
    }

    fn write_raw_bytes(&mut self, mut data: &[u8]) -> Result<()> {
        // Large writes skip the buffer entirely and go straight to the sink.
        if data.len() >= self.buf.len() {
            self.flush()?;
            self.sink.write_all(data)?;
            return Ok(());
        }
        while !data.is_empty() {
            let space = self.buf.len() - self.pos;
            let n = space.min(data.len());
            self.buf[self.pos..self.pos + n].copy_from_slice(&data[..n]);
            self.pos += n;
            data = &data[n..];
            if self.pos == self.buf.len() {
                self.flush()?;
            }
        }
        Ok(())
    }

    fn space_left(&self) -> Result<i64> {
        Err(crate::errors::Error::UnsupportedOperation(
            "stream backend has no fixed capacity",
        ))
    }
}
