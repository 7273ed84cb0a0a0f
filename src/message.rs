//! Traits generated message types implement to plug into the codec.
//!
//! A generated message is not tied to any one decoder or encoder variant:
//! [`MessageRead::from_reader`] is generic over any [`CodedInput`], and
//! [`MessageWrite::write_message`] is generic over any [`CodedOutput`], so
//! the same generated code works unchanged whether it's reading out of a
//! `&[u8]`, a stream, or a direct buffer.

use crate::errors::Result;
use crate::reader::CodedInput;
use crate::writer::CodedOutput;

/// Constructs `Self` from the fields a decoder reads.
///
/// `from_reader` does not read a leading length: callers that need a
/// length-delimited nested message get that for free from
/// [`CodedInput::read_message`], which reads the length, pushes a limit,
/// and calls this.
pub trait MessageRead: Sized {
    /// Reads fields from `r` until `r.read_tag()` reports 0 (end of the
    /// enclosing message or limit), dispatching unknown fields to
    /// [`CodedInput::skip_field`].
    fn from_reader<R: CodedInput>(r: &mut R) -> Result<Self>;
}

/// Serializes `Self`'s fields to a [`CodedOutput`], and reports how many
/// bytes that serialization will occupy.
///
/// Both methods default to no-op/zero so that a message with no fields (or
/// one under active development) still implements the trait.
pub trait MessageWrite: Sized {
    /// Writes `Self`'s fields, each preceded by its own tag, to `w`.
    fn write_message<W: CodedOutput>(&self, _w: &mut W) -> Result<()> {
        Ok(())
    }

    /// The exact number of bytes [`write_message`](Self::write_message)
    /// will write. Must stay in sync with `write_message`: a mismatch
    /// corrupts output written through the buffer-reserving encoder
    /// backends, which size their flush based on this value.
    fn get_size(&self) -> usize {
        0
    }
}

/// Identifies the fully-qualified `.proto` path a generated type corresponds
/// to. Used for diagnostics and for `google.protobuf.Any`-style type URLs;
/// has no bearing on wire encoding.
pub trait MessageInfo {
    /// Full message path, e.g. `"mypackage.MyMessage"`.
    const PATH: &'static str;
}
