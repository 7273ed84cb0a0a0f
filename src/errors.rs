//! The closed set of error kinds the codec can raise.

#[cfg(feature = "std")]
use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while reading or writing the wire format.
///
/// This is a closed set by design: the codec never needs an "other" bucket
/// because every failure mode is one the spec it implements anticipates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// End-of-input reached mid-value, a length-delimited region extended
    /// past the accessible limit, or a nested message left bytes unread.
    #[error("truncated message")]
    TruncatedMessage,

    /// More than 10 continuation bytes in a varint.
    #[error("malformed varint")]
    MalformedVarint,

    /// A length varint decoded to a negative 32-bit integer.
    #[error("negative size")]
    NegativeSize,

    /// A tag whose field number is 0.
    #[error("invalid tag: field number is zero")]
    InvalidTag,

    /// `check_last_tag_was` mismatch at the close of a group or message.
    #[error("invalid end tag: expected {expected}, last read was {actual}")]
    InvalidEndTag {
        /// The end-group tag the caller expected.
        expected: u32,
        /// The tag that was actually last read.
        actual: u32,
    },

    /// A tag carrying an unrecognized wire type.
    #[error("invalid wire type {0}")]
    InvalidWireType(u8),

    /// A nested read would push recursion depth past the configured limit.
    #[error("recursion limit exceeded (limit = {0})")]
    RecursionLimitExceeded(i32),

    /// The pull-stream decoder's running total would exceed `size_limit`.
    #[error("size limit exceeded")]
    SizeLimitExceeded,

    /// `read_string_require_utf8` found a byte sequence that isn't valid UTF-8.
    #[error("invalid utf-8 in string field")]
    InvalidUtf8(#[source] core::str::Utf8Error),

    /// `write_utf16_str` found a high surrogate with no matching low surrogate
    /// (or vice versa) in the input.
    #[error("unpaired surrogate at code-unit index {0}")]
    UnpairedSurrogate(usize),

    /// An encoder attempted to write past its sink's capacity (flat sinks only).
    #[error("out of space in destination buffer")]
    OutOfSpace,

    /// Integer overflow while pushing or popping a limit.
    #[error("parse failure: limit arithmetic overflowed")]
    ParseFailure,

    /// A flat-only operation (e.g. `space_left`) was called on a streaming backend.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// `Bytes::byte_at` (or an equivalent indexed access) was out of bounds.
    #[error("index out of range")]
    IndexOutOfRange,

    /// A group tag was encountered where group support is not available.
    #[error("deprecated wire feature encountered: {0}")]
    Deprecated(&'static str),

    /// The underlying `Read`/`Write` failed.
    #[cfg(feature = "std")]
    #[error("io error")]
    Io(#[source] io::Error),
}

#[cfg(feature = "std")]
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<core::str::Utf8Error> for Error {
    fn from(e: core::str::Utf8Error) -> Self {
        Error::InvalidUtf8(e)
    }
}
