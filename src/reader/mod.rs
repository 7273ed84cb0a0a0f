//! Decoding: four independent concrete readers sharing one trait.
//!
//! The donor crate's `BytesReader` is one concrete type over one backing
//! slice. This module generalizes that shape to four backends -- contiguous
//! array, iterable of chunks, pull stream, and a raw direct buffer -- by
//! factoring the limit-stack, recursion guard, and tag/field dispatch logic
//! into default methods on [`CodedInput`]. Each backend only supplies the
//! handful of primitives ([`CodedInput::read_raw_varint32`] and friends)
//! that genuinely differ by storage shape; everything built out of them is
//! written once.
//!
//! Deliberately not a `dyn`-safe trait: generated message code is always
//! monomorphized over one concrete reader type, so there is no call site
//! that needs to erase which backend it's talking to.

pub mod chunks;
pub mod direct;
pub mod slice;
#[cfg(feature = "std")]
pub mod stream;
mod varint_decode;

use crate::config::DecoderConfig;
use crate::errors::{Error, Result};
use crate::message::MessageRead;
use crate::wire_format::{make_tag, tag_field_number, tag_wire_type, WIRE_TYPE_END_GROUP};
use crate::wire_format::{
    WIRE_TYPE_FIXED32, WIRE_TYPE_FIXED64, WIRE_TYPE_LENGTH_DELIMITED, WIRE_TYPE_START_GROUP,
    WIRE_TYPE_VARINT,
};

/// Bookkeeping shared by every decoder variant: where the current
/// length-delimited limit sits, how deep nested reads have gone, and the
/// last tag read (used to detect where a sub-message or group ended).
#[derive(Debug, Clone, Copy)]
pub struct LimitState {
    /// Absolute byte offset (in terms of total bytes consumed from this
    /// reader) beyond which a read must fail with [`Error::TruncatedMessage`].
    /// `i64::MAX` means "no limit pushed".
    pub current_limit: i64,
    /// Current nesting depth of `read_message`/`read_group` calls.
    pub recursion_depth: i32,
    /// The most recently read tag, or 0 if none has been read yet or the
    /// last `read_tag` reported end-of-input/end-of-limit.
    pub last_tag: u32,
}

impl Default for LimitState {
    fn default() -> Self {
        LimitState {
            current_limit: i64::MAX,
            recursion_depth: 0,
            last_tag: 0,
        }
    }
}

/// The operations common to every decoder variant.
///
/// Implementors provide the primitives in the first block; the rest are
/// default methods built out of them.
pub trait CodedInput {
    // -- required primitives, one implementation per backend --

    /// Shared limit/recursion/last-tag state, by reference.
    fn limit_state(&self) -> &LimitState;
    /// Shared limit/recursion/last-tag state, mutably.
    fn limit_state_mut(&mut self) -> &mut LimitState;
    /// The config this reader was constructed with.
    fn config(&self) -> &DecoderConfig;
    /// Total bytes consumed from this reader so far.
    fn total_bytes_read(&self) -> i64;

    /// Reads a 32-bit varint, silently truncating a 10-byte encoding to its
    /// low 32 bits (matches the write side's always-10-bytes negative
    /// `int32` encoding).
    fn read_raw_varint32(&mut self) -> Result<u32>;
    /// Reads a 64-bit varint.
    fn read_raw_varint64(&mut self) -> Result<u64>;
    /// Reads 4 little-endian bytes.
    fn read_raw_little_endian32(&mut self) -> Result<u32>;
    /// Reads 8 little-endian bytes.
    fn read_raw_little_endian64(&mut self) -> Result<u64>;
    /// Reads `len` bytes, possibly as a zero-copy alias when the backend and
    /// config both allow it.
    fn read_raw_bytes(&mut self, len: usize) -> Result<crate::bytes::Bytes>;
    /// Advances past `len` bytes without materializing them.
    fn skip_raw_bytes(&mut self, len: usize) -> Result<()>;
    /// `true` iff the backend has no more bytes to give, ignoring any
    /// pushed limit (the default [`is_at_end`](CodedInput::is_at_end)
    /// checks the limit first).
    fn is_physically_at_end(&mut self) -> Result<bool>;

    // -- shared logic, built out of the above --

    /// Bytes remaining before the innermost pushed limit, or -1 if no limit
    /// is active.
    fn bytes_until_limit(&self) -> i64 {
        let limit = self.limit_state().current_limit;
        if limit == i64::MAX {
            -1
        } else {
            limit - self.total_bytes_read()
        }
    }

    /// Narrows the accessible region to `byte_limit` bytes from here,
    /// returning the previous limit so it can be restored with
    /// [`pop_limit`](CodedInput::pop_limit).
    fn push_limit(&mut self, byte_limit: i64) -> Result<i64> {
        if byte_limit < 0 {
            return Err(Error::NegativeSize);
        }
        let new_limit = self
            .total_bytes_read()
            .checked_add(byte_limit)
            .ok_or(Error::ParseFailure)?;
        let old_limit = self.limit_state().current_limit;
        if new_limit > old_limit {
            return Err(Error::TruncatedMessage);
        }
        self.limit_state_mut().current_limit = new_limit;
        Ok(old_limit)
    }

    /// Restores a limit previously returned by
    /// [`push_limit`](CodedInput::push_limit).
    fn pop_limit(&mut self, old_limit: i64) {
        self.limit_state_mut().current_limit = old_limit;
    }

    /// `true` iff there is nothing left to read, either because the
    /// backend is exhausted or because the innermost limit has been hit.
    fn is_at_end(&mut self) -> Result<bool> {
        if self.bytes_until_limit() == 0 {
            return Ok(true);
        }
        self.is_physically_at_end()
    }

    /// Reads the next field tag, or 0 at the end of the message/limit.
    fn read_tag(&mut self) -> Result<u32> {
        if self.is_at_end()? {
            self.limit_state_mut().last_tag = 0;
            return Ok(0);
        }
        let tag = self.read_raw_varint32()?;
        if tag_field_number(tag) == 0 {
            return Err(Error::InvalidTag);
        }
        self.limit_state_mut().last_tag = tag;
        Ok(tag)
    }

    /// Fails unless the last tag read was exactly `expected`. Used after
    /// [`read_group`](CodedInput::read_group) to confirm the end-group tag
    /// matched the field it started on.
    fn check_last_tag_was(&mut self, expected: u32) -> Result<()> {
        let actual = self.limit_state().last_tag;
        if actual == expected {
            Ok(())
        } else {
            Err(Error::InvalidEndTag { expected, actual })
        }
    }

    fn read_int32(&mut self) -> Result<i32> {
        Ok(self.read_raw_varint32()? as i32)
    }
    fn read_int64(&mut self) -> Result<i64> {
        Ok(self.read_raw_varint64()? as i64)
    }
    fn read_uint32(&mut self) -> Result<u32> {
        self.read_raw_varint32()
    }
    fn read_uint64(&mut self) -> Result<u64> {
        self.read_raw_varint64()
    }
    fn read_sint32(&mut self) -> Result<i32> {
        Ok(crate::wire_format::zigzag_decode32(self.read_raw_varint32()?))
    }
    fn read_sint64(&mut self) -> Result<i64> {
        Ok(crate::wire_format::zigzag_decode64(self.read_raw_varint64()?))
    }
    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_raw_varint32()? != 0)
    }
    /// Reads a raw `int32`; the caller maps it through the generated enum's
    /// `From<i32>` (unknown values round-trip as-is, matching proto3 open
    /// enum semantics).
    fn read_enum(&mut self) -> Result<i32> {
        self.read_int32()
    }
    fn read_fixed32(&mut self) -> Result<u32> {
        self.read_raw_little_endian32()
    }
    fn read_fixed64(&mut self) -> Result<u64> {
        self.read_raw_little_endian64()
    }
    fn read_sfixed32(&mut self) -> Result<i32> {
        Ok(self.read_raw_little_endian32()? as i32)
    }
    fn read_sfixed64(&mut self) -> Result<i64> {
        Ok(self.read_raw_little_endian64()? as i64)
    }
    fn read_float(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_raw_little_endian32()?))
    }
    fn read_double(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_raw_little_endian64()?))
    }

    /// Reads a length-delimited byte field as an owned container. Whether
    /// this aliases the source depends on the backend and its config.
    fn read_bytes(&mut self) -> Result<crate::bytes::Bytes> {
        let len = self.read_raw_varint32()? as i32;
        if len < 0 {
            return Err(Error::NegativeSize);
        }
        self.read_raw_bytes(len as usize)
    }

    /// Reads a length-delimited string field, replacing invalid UTF-8 with
    /// `U+FFFD`.
    fn read_string(&mut self) -> Result<alloc::string::String> {
        Ok(self.read_bytes()?.to_string_utf8())
    }

    /// Reads a length-delimited string field, failing on invalid UTF-8.
    fn read_string_require_utf8(&mut self) -> Result<alloc::string::String> {
        let bytes = self.read_bytes()?;
        bytes.try_to_string_utf8().map(alloc::string::ToString::to_string)
    }

    /// Reads a nested message: length-delimited, recursion-guarded, and
    /// required to consume exactly its announced length.
    fn read_message<M: MessageRead>(&mut self) -> Result<M>
    where
        Self: Sized,
    {
        let len = self.read_raw_varint32()? as i32;
        if len < 0 {
            return Err(Error::NegativeSize);
        }
        let limit = self.config().recursion_limit;
        if self.limit_state().recursion_depth >= limit {
            return Err(Error::RecursionLimitExceeded(limit));
        }
        let old_limit = self.push_limit(len as i64)?;
        self.limit_state_mut().recursion_depth += 1;
        let result = M::from_reader(self);
        self.limit_state_mut().recursion_depth -= 1;
        let message = result?;
        if self.limit_state().last_tag != 0 {
            return Err(Error::TruncatedMessage);
        }
        if self.bytes_until_limit() != 0 {
            return Err(Error::TruncatedMessage);
        }
        self.pop_limit(old_limit);
        Ok(message)
    }

    /// Reads a deprecated group field: no length prefix, delimited instead
    /// by a matching `END_GROUP` tag for `field_number`.
    fn read_group<M: MessageRead>(&mut self, field_number: u32) -> Result<M>
    where
        Self: Sized,
    {
        let limit = self.config().recursion_limit;
        if self.limit_state().recursion_depth >= limit {
            return Err(Error::RecursionLimitExceeded(limit));
        }
        self.limit_state_mut().recursion_depth += 1;
        let result = M::from_reader(self);
        self.limit_state_mut().recursion_depth -= 1;
        let message = result?;
        self.check_last_tag_was(make_tag(field_number, WIRE_TYPE_END_GROUP))?;
        Ok(message)
    }

    /// Reads the legacy `MessageSet` extension layout: a bare `uint32` type
    /// id followed by the extension message as a length-delimited field,
    /// both positional (no tag of their own), then the matching
    /// `END_GROUP`. The caller is expected to have already read the
    /// `START_GROUP` tag for `field_number` and dispatched here, mirroring
    /// [`read_group`](CodedInput::read_group).
    fn read_message_set_extension<M: MessageRead>(
        &mut self,
        field_number: u32,
    ) -> Result<(u32, M)>
    where
        Self: Sized,
    {
        let limit = self.config().recursion_limit;
        if self.limit_state().recursion_depth >= limit {
            return Err(Error::RecursionLimitExceeded(limit));
        }
        self.limit_state_mut().recursion_depth += 1;
        let type_id = match self.read_uint32() {
            Ok(v) => v,
            Err(e) => {
                self.limit_state_mut().recursion_depth -= 1;
                return Err(e);
            }
        };
        let msg: M = match self.read_message() {
            Ok(v) => v,
            Err(e) => {
                self.limit_state_mut().recursion_depth -= 1;
                return Err(e);
            }
        };
        self.limit_state_mut().recursion_depth -= 1;
        self.check_last_tag_was(make_tag(field_number, WIRE_TYPE_END_GROUP))?;
        Ok((type_id, msg))
    }

    /// Skips the value belonging to `tag`. Returns `false` when `tag` was
    /// itself an `END_GROUP` (the caller is expected to stop looping).
    fn skip_field(&mut self, tag: u32) -> Result<bool> {
        match tag_wire_type(tag) {
            WIRE_TYPE_VARINT => {
                self.read_raw_varint64()?;
                Ok(true)
            }
            WIRE_TYPE_FIXED64 => {
                self.read_raw_little_endian64()?;
                Ok(true)
            }
            WIRE_TYPE_FIXED32 => {
                self.read_raw_little_endian32()?;
                Ok(true)
            }
            WIRE_TYPE_LENGTH_DELIMITED => {
                let len = self.read_raw_varint32()? as i32;
                if len < 0 {
                    return Err(Error::NegativeSize);
                }
                self.skip_raw_bytes(len as usize)?;
                Ok(true)
            }
            WIRE_TYPE_START_GROUP => {
                self.skip_group(tag_field_number(tag))?;
                Ok(true)
            }
            WIRE_TYPE_END_GROUP => Ok(false),
            wt => Err(Error::InvalidWireType(wt)),
        }
    }

    /// Skips every field of a group until its matching `END_GROUP` tag.
    fn skip_group(&mut self, field_number: u32) -> Result<()> {
        loop {
            let tag = self.read_tag()?;
            if tag == 0 {
                return Err(Error::TruncatedMessage);
            }
            if !self.skip_field(tag)? {
                let expected = make_tag(field_number, WIRE_TYPE_END_GROUP);
                if tag != expected {
                    return Err(Error::InvalidEndTag {
                        expected,
                        actual: tag,
                    });
                }
                return Ok(());
            }
        }
    }
}
