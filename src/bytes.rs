//! `Bytes`: an immutable, cheaply-shareable sequence of bytes.
//!
//! This is the container type that flows out of aliasing reads. It is
//! backed by `Arc<[u8]>` rather than a borrowed slice: a borrowed slice
//! would need every decoder variant to carry the source's lifetime as a
//! type parameter, which defeats the point of having four independent
//! concrete reader types (see the crate-level design notes). Sharing a
//! reference count instead costs one atomic increment per alias and lets
//! the value be `'static`, `Send`, and `Sync`.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::hash::{Hash, Hasher};

use crate::errors::{Error, Result};
use crate::utf8;

/// An immutable, reference-counted view into a byte buffer.
///
/// Cloning a `Bytes` is O(1) (it bumps a reference count). A [`substring`]
/// shares the same backing allocation as its parent: taking a substring of
/// a substring never copies.
///
/// [`substring`]: Bytes::substring
#[derive(Clone)]
pub struct Bytes {
    storage: Arc<[u8]>,
    offset: usize,
    len: usize,
    // Memoized hash of the realized byte slice. `OnceCell` rather than
    // `AtomicU64` because `Bytes` is not required to be internally
    // mutable across threads for this to pay off -- each clone gets its
    // own memo slot, which is fine since hashing is cheap to redo once
    // per clone and this keeps `Bytes: Sync` trivially true.
    hash_memo: OnceCell<u64>,
}

impl Bytes {
    /// The shared empty `Bytes`. Allocation-free.
    pub fn new() -> Bytes {
        Bytes {
            storage: Arc::from(&[][..]),
            offset: 0,
            len: 0,
            hash_memo: OnceCell::new(),
        }
    }

    /// Copies `data` into a freshly owned, reference-counted buffer.
    pub fn copy_from_slice(data: &[u8]) -> Bytes {
        Bytes {
            storage: Arc::from(data),
            offset: 0,
            len: data.len(),
            hash_memo: OnceCell::new(),
        }
    }

    /// Wraps an already reference-counted buffer without copying.
    ///
    /// The caller promises not to mutate `data` through any other handle
    /// for as long as any `Bytes` built from it is alive; violating that
    /// promise is undefined behavior this type does nothing to prevent,
    /// mirroring the wire-format spec's "wrapping" construction mode.
    pub fn from_arc(data: Arc<[u8]>) -> Bytes {
        let len = data.len();
        Bytes {
            storage: data,
            offset: 0,
            len,
            hash_memo: OnceCell::new(),
        }
    }

    /// Number of bytes in this view.
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// `true` iff this view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The byte at `index`, or [`Error::IndexOutOfRange`] if out of bounds.
    #[inline]
    pub fn byte_at(&self, index: usize) -> Result<u8> {
        self.as_slice().get(index).copied().ok_or(Error::IndexOutOfRange)
    }

    /// Borrows the realized contents as a plain slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.offset..self.offset + self.len]
    }

    /// A bounded view sharing this `Bytes`'s storage; never copies.
    ///
    /// `substring` of the empty range returns the shared empty sentinel.
    pub fn substring(&self, begin: usize, end: usize) -> Result<Bytes> {
        if begin > end || end > self.len {
            return Err(Error::IndexOutOfRange);
        }
        if begin == end {
            return Ok(Bytes::new());
        }
        Ok(Bytes {
            storage: self.storage.clone(),
            offset: self.offset + begin,
            len: end - begin,
            hash_memo: OnceCell::new(),
        })
    }

    /// Copies this view's bytes into `target` starting at `target_offset`.
    pub fn copy_to(&self, target: &mut [u8], target_offset: usize) -> Result<()> {
        let src = self.as_slice();
        let dst = target
            .get_mut(target_offset..target_offset + src.len())
            .ok_or(Error::IndexOutOfRange)?;
        dst.copy_from_slice(src);
        Ok(())
    }

    /// Copies this view's bytes into a freshly allocated `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Decodes this view as UTF-8, replacing invalid sequences with `U+FFFD`.
    pub fn to_string_utf8(&self) -> String {
        utf8::decode_lossy(self.as_slice())
    }

    /// Decodes this view as UTF-8, failing on the first invalid sequence.
    pub fn try_to_string_utf8(&self) -> Result<&str> {
        utf8::decode_strict(self.as_slice())
    }

    /// A `std::io::Read` adapter over this view's bytes.
    #[cfg(feature = "std")]
    pub fn new_input(&self) -> std::io::Cursor<Bytes> {
        std::io::Cursor::new(self.clone())
    }

    /// A [`SliceReader`](crate::reader::slice::SliceReader) wrapping this
    /// view with aliasing enabled, since the container is always immutable.
    pub fn new_coded_reader(&self) -> crate::reader::slice::SliceReader<'_> {
        crate::reader::slice::SliceReader::from_bytes(self)
    }

    /// Depth of this container's internal tree. Leaves (all `Bytes` values
    /// produced by this crate) report 0; a hypothetical rope-shaped peer
    /// would report its own depth, which is why equality below never
    /// assumes a flat representation on either side.
    pub const fn tree_depth(&self) -> usize {
        0
    }

    /// Leaves are trivially balanced.
    pub const fn is_balanced(&self) -> bool {
        true
    }

    fn compute_hash(&self) -> u64 {
        let mut hasher = ahash_compatible_hasher();
        self.as_slice().hash(&mut hasher);
        hasher.finish()
    }

    fn memoized_hash(&self) -> u64 {
        *self.hash_memo.get_or_init(|| self.compute_hash())
    }
}

impl Default for Bytes {
    fn default() -> Self {
        Bytes::new()
    }
}

impl PartialEq for Bytes {
    /// Byte-wise equality, regardless of how either side is represented
    /// internally. A future rope-shaped peer type can implement
    /// `PartialEq<Bytes>` the same way and compare correctly without this
    /// type needing to know about it.
    fn eq(&self, other: &Self) -> bool {
        if self.hash_memo.get().is_some() && other.hash_memo.get().is_some() {
            if self.memoized_hash() != other.memoized_hash() {
                return false;
            }
        }
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Bytes {}

impl Hash for Bytes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.memoized_hash());
    }
}

impl core::fmt::Debug for Bytes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bytes")
            .field("len", &self.len)
            .field("offset", &self.offset)
            .finish()
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        let len = v.len();
        Bytes {
            storage: Arc::from(v),
            offset: 0,
            len,
            hash_memo: OnceCell::new(),
        }
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Bytes::copy_from_slice(v)
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[cfg(feature = "std")]
impl std::io::Read for Bytes {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut slice = self.as_slice();
        let n = std::io::Read::read(&mut slice, buf)?;
        *self = self.substring(n, self.size()).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "substring past end")
        })?;
        Ok(n)
    }
}

/// A `Hasher` built from a fixed seed. Not cryptographically strong, and
/// deliberately not: this is only ever used to memoize equality checks and
/// to key non-adversarial in-process maps, the same tradeoff `std`'s
/// default hasher makes outside of `HashMap`'s DOS-resistant mode.
fn ahash_compatible_hasher() -> impl Hasher {
    struct Fnv1a(u64);
    impl Hasher for Fnv1a {
        fn finish(&self) -> u64 {
            self.0
        }
        fn write(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.0 ^= b as u64;
                self.0 = self.0.wrapping_mul(0x100_0000_01b3);
            }
        }
    }
    Fnv1a(0xcbf2_9ce4_8422_2325)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_bytes_compare_equal_regardless_of_origin() {
        let a = Bytes::copy_from_slice(b"hello world");
        let b = a.substring(0, 5).unwrap();
        let c = Bytes::copy_from_slice(b"hello");
        assert_eq!(b, c);
        assert_eq!(b.size(), 5);
    }

    #[test]
    fn substring_shares_storage() {
        let a = Bytes::copy_from_slice(b"abcdefgh");
        let b = a.substring(2, 6).unwrap();
        assert_eq!(b.as_slice(), b"cdef");
        // Same underlying allocation: cloning cost is a refcount bump, not a copy.
        assert!(Arc::ptr_eq(&a.storage, &b.storage));
    }

    #[test]
    fn empty_substring_is_the_shared_sentinel() {
        let a = Bytes::copy_from_slice(b"abc");
        let e = a.substring(1, 1).unwrap();
        assert!(e.is_empty());
        assert_eq!(e, Bytes::new());
    }

    #[test]
    fn substring_out_of_bounds_errors() {
        let a = Bytes::copy_from_slice(b"abc");
        assert!(a.substring(0, 10).is_err());
        assert!(a.substring(2, 1).is_err());
    }

    #[test]
    fn byte_at_bounds_checked() {
        let a = Bytes::copy_from_slice(b"abc");
        assert_eq!(a.byte_at(0).unwrap(), b'a');
        assert!(a.byte_at(3).is_err());
    }

    #[test]
    fn hash_matches_for_equal_content() {
        use core::hash::Hash as _;
        let a = Bytes::copy_from_slice(b"same bytes");
        let b = Bytes::copy_from_slice(b"same bytes");
        let mut ha = ahash_compatible_hasher();
        let mut hb = ahash_compatible_hasher();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn to_string_utf8_is_lossy() {
        let a = Bytes::copy_from_slice(&[0xFF, 0xFE]);
        assert_eq!(a.to_string_utf8(), "\u{FFFD}\u{FFFD}");
        assert!(a.try_to_string_utf8().is_err());
    }
}
