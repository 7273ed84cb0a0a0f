//! The heap-backed encoder: writes into a growable `Vec<u8>`, never failing
//! for lack of space.

use super::CodedOutput;
use crate::errors::Result;
use alloc::vec::Vec;

/// Encodes into an owned, growable buffer.
#[derive(Default)]
pub struct HeapWriter {
    buf: Vec<u8>,
}

impl HeapWriter {
    /// Starts with an empty buffer.
    pub fn new() -> Self {
        HeapWriter { buf: Vec::new() }
    }

    /// Starts with `capacity` bytes pre-reserved, for callers that already
    /// know the exact size (e.g. from [`MessageWrite::get_size`]).
    ///
    /// [`MessageWrite::get_size`]: crate::message::MessageWrite::get_size
    pub fn with_capacity(capacity: usize) -> Self {
        HeapWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Consumes the writer, returning everything written.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Borrows everything written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

impl CodedOutput for HeapWriter {
    fn write_raw_byte(&mut self, value: u8) -> Result<()> {
        self.buf.push(value);
        Ok(())
    }

    fn write_raw_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn space_left(&self) -> Result<i64> {
        Ok(i64::MAX - self.buf.len() as i64)
    }
}
