//! The direct-buffer encoder: writes through a raw pointer rather than a
//! borrow-checked slice, mirroring [`DirectReader`](crate::reader::direct::DirectReader).

use super::array::ArrayWriter;
use super::CodedOutput;
use crate::errors::Result;

/// Encodes into a fixed-capacity buffer reached through a raw pointer.
pub struct DirectWriter<'a> {
    inner: ArrayWriter<'a>,
}

impl<'a> DirectWriter<'a> {
    /// Wraps `len` bytes of writable memory starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `len` bytes for the entire
    /// lifetime `'a`, and must not be read or written through any other
    /// handle while this writer is alive.
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
        DirectWriter {
            inner: ArrayWriter::new(core::slice::from_raw_parts_mut(ptr, len)),
        }
    }

    /// Wraps an ordinary mutable slice; safe, since the borrow already
    /// carries its own validity guarantee.
    pub fn from_slice(buf: &'a mut [u8]) -> Self {
        DirectWriter {
            inner: ArrayWriter::new(buf),
        }
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.inner.bytes_written()
    }
}

#[cfg(feature = "unsafe-direct")]
impl<'a> DirectWriter<'a> {
    /// Writes a little-endian `u32` without a bounds check.
    ///
    /// # Safety
    ///
    /// The caller must know at least 4 bytes of capacity remain.
    pub unsafe fn write_fixed32_unchecked(&mut self, value: u32) {
        let ptr = self.inner.tail_ptr_mut();
        ptr.cast::<u32>().write_unaligned(value.to_le());
        self.inner.advance_unchecked(4);
    }

    /// Writes a little-endian `u64` without a bounds check.
    ///
    /// # Safety
    ///
    /// Same requirement as [`write_fixed32_unchecked`](Self::write_fixed32_unchecked).
    pub unsafe fn write_fixed64_unchecked(&mut self, value: u64) {
        let ptr = self.inner.tail_ptr_mut();
        ptr.cast::<u64>().write_unaligned(value.to_le());
        self.inner.advance_unchecked(8);
    }
}

impl<'a> CodedOutput for DirectWriter<'a> {
    fn write_raw_byte(&mut self, value: u8) -> Result<()> {
        self.inner.write_raw_byte(value)
    }
    fn write_raw_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_raw_bytes(data)
    }
    fn space_left(&self) -> Result<i64> {
        self.inner.space_left()
    }
}
