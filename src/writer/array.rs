//! The array encoder: writes into a caller-owned `&mut [u8]` of fixed
//! capacity. Grounded on the donor crate's `BytesWriter`, generalized to
//! implement [`CodedOutput`].

use super::CodedOutput;
use crate::errors::{Error, Result};

/// Encodes into a fixed-capacity `&mut [u8]`.
pub struct ArrayWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ArrayWriter<'a> {
    /// Wraps `buf`; writes start at offset 0.
    pub fn new(buf: &'a mut [u8]) -> Self {
        ArrayWriter { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.pos
    }

    /// The written prefix.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Raw pointer to the next unwritten byte, for the `unsafe-direct`
    /// fast path.
    pub(crate) fn tail_ptr_mut(&mut self) -> *mut u8 {
        unsafe { self.buf.as_mut_ptr().add(self.pos) }
    }

    /// Advances the cursor by `n` bytes without writing them. Caller must
    /// have already written those bytes directly (e.g. through
    /// [`tail_ptr_mut`](Self::tail_ptr_mut)) and checked `n <= space_left`.
    pub(crate) fn advance_unchecked(&mut self, n: usize) {
        self.pos += n;
    }
}

impl<'a> CodedOutput for ArrayWriter<'a> {
    fn write_raw_byte(&mut self, value: u8) -> Result<()> {
        let slot = self.buf.get_mut(self.pos).ok_or(Error::OutOfSpace)?;
        *slot = value;
        self.pos += 1;
        Ok(())
    }

    fn write_raw_bytes(&mut self, data: &[u8]) -> Result<()> {
        let dst = self
            .buf
            .get_mut(self.pos..self.pos + data.len())
            .ok_or(Error::OutOfSpace)?;
        dst.copy_from_slice(data);
        self.pos += data.len();
        Ok(())
    }

    fn space_left(&self) -> Result<i64> {
        Ok((self.buf.len() - self.pos) as i64)
    }
}
