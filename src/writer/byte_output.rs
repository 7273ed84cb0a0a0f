//! The buffered-byte-output encoder: like [`StreamWriter`](super::stream::StreamWriter),
//! but flushes to a [`ByteSink`] instead of `std::io::Write`, so it's usable
//! without the `std` feature -- useful for targets where the destination is
//! a channel, a ring buffer, or a gather-write list rather than anything
//! implementing `Write`.

use super::CodedOutput;
use crate::errors::Result;
use alloc::vec;
use alloc::vec::Vec;

/// A destination that accepts whole chunks of bytes at a time.
///
/// The `std`-gated blanket impl below covers the common case of writing to
/// something that already implements `std::io::Write`; implement this
/// directly for destinations that don't (or shouldn't, in `no_std`).
pub trait ByteSink {
    /// Accepts `buf` in its entirety or fails.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()>;
}

#[cfg(feature = "std")]
impl<W: std::io::Write> ByteSink for W {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.write_all(buf).map_err(Into::into)
    }
}

/// Encodes through an internal buffer, flushed to a [`ByteSink`] as it fills.
pub struct ByteOutputWriter<S: ByteSink> {
    sink: S,
    buf: Vec<u8>,
    pos: usize,
}

impl<S: ByteSink> ByteOutputWriter<S> {
    /// Wraps `sink` with the given buffer size.
    pub fn new(sink: S, buffer_size: usize) -> Self {
        ByteOutputWriter {
            sink,
            buf: vec![0u8; buffer_size.max(1)],
            pos: 0,
        }
    }

    /// Flushes any buffered bytes to the sink and returns it.
    pub fn into_inner(mut self) -> Result<S> {
        self.flush()?;
        Ok(self.sink)
    }

    /// Flushes any buffered bytes to the sink without consuming the writer.
    pub fn flush(&mut self) -> Result<()> {
        if self.pos > 0 {
            self.sink.write_bytes(&self.buf[..self.pos])?;
            self.pos = 0;
        }
        Ok(())
    }
}

impl<S: ByteSink> CodedOutput for ByteOutputWriter<S> {
    fn write_raw_byte(&mut self, value: u8) -> Result<()> {
        if self.pos == self.buf.len() {
            self.flush()?;
        }
        self.buf[self.pos] = value;
        self.pos += 1;
        Ok(())
    }

    fn write_raw_bytes(&mut self, mut data: &[u8]) -> Result<()> {
        if data.len() >= self.buf.len() {
            self.flush()?;
            return self.sink.write_bytes(data);
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
            "byte-output backend has no fixed capacity",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    struct CollectingSink(Vec<u8>);
    impl ByteSink for CollectingSink {
        fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
            self.0.extend_from_slice(buf);
            Ok(())
        }
    }

    #[test]
    fn buffers_then_flushes_to_sink() {
        let mut w = ByteOutputWriter::new(CollectingSink(Vec::new()), 1024);
        w.write_str("hi").unwrap();
        let sink = w.into_inner().unwrap();
        assert_eq!(sink.0, b"\x02hi");
    }

    #[test]
    fn small_buffer_forces_multiple_flushes() {
        let mut w = ByteOutputWriter::new(CollectingSink(Vec::new()), 2);
        for i in 0..10u8 {
            w.write_raw_byte(i).unwrap();
        }
        let sink = w.into_inner().unwrap();
        assert_eq!(sink.0, (0..10).collect::<Vec<u8>>());
    }
}
