//! Tunables recognized by the decoder and encoder variants.

/// Default nesting depth a decoder will follow before giving up.
///
/// Matches the wire-format reference implementation's default; deep enough
/// for any reasonable schema, shallow enough to bound stack usage against
/// adversarial input.
pub const DEFAULT_RECURSION_LIMIT: i32 = 100;

/// Default total-bytes-read cap for the pull-stream decoder.
pub const DEFAULT_STREAM_SIZE_LIMIT: i64 = i32::MAX as i64;

/// Default internal buffer size for the pull-stream decoder and the
/// buffered writer backends.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Options governing how a decoder variant behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum number of nested `read_message`/`read_group` calls.
    pub recursion_limit: i32,
    /// Maximum total bytes the pull-stream decoder will read. Ignored by
    /// the other three variants, which are bounded by their backing buffer.
    pub size_limit: i64,
    /// When `true` and the source is immutable, `read_bytes`-family calls
    /// may return zero-copy views into the source instead of copies.
    pub enable_aliasing: bool,
    /// Internal buffer size used by the pull-stream decoder.
    pub buffer_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            size_limit: i64::MAX,
            enable_aliasing: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl DecoderConfig {
    /// A config with `size_limit` lowered to the pull-stream decoder's
    /// conventional default (`i32::MAX` bytes) instead of unbounded.
    pub fn for_stream() -> Self {
        DecoderConfig {
            size_limit: DEFAULT_STREAM_SIZE_LIMIT,
            ..Default::default()
        }
    }

    /// Builder-style setter for `recursion_limit`.
    pub fn with_recursion_limit(mut self, limit: i32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Builder-style setter for `size_limit`.
    pub fn with_size_limit(mut self, limit: i64) -> Self {
        self.size_limit = limit;
        self
    }

    /// Builder-style setter for `enable_aliasing`.
    pub fn with_aliasing(mut self, enable: bool) -> Self {
        self.enable_aliasing = enable;
        self
    }

    /// Builder-style setter for `buffer_size`.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

/// Options governing how a buffered encoder backend behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Internal buffer size used by the buffered-stream and
    /// buffered-byte-output writer backends.
    pub buffer_size: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl EncoderConfig {
    /// Builder-style setter for `buffer_size`.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}
