//! The buffer handle, its constructors, and capacity management.
//!
//! An [`SString`] is binary safe (it may hold NUL bytes anywhere in
//! `[0, len)`) and is also always NUL terminated: the byte at index `len` is
//! `0` for every storage kind. Every operation in this crate preserves that
//! and `len <= capacity`.

use alloc::vec::Vec;
use core::{
    cmp::Ordering,
    ffi::CStr,
    fmt,
    hash::{Hash, Hasher},
    mem,
    ops::{Deref, DerefMut},
    ptr,
};

use bstr::{BStr, ByteSlice};

use crate::{
    error::AllocError,
    options::{BufferOptions, GrowthPolicy},
    raw::{self, MAX_CAPACITY},
    storage::{Storage, StorageKind, empty_value},
};

/// Sentinel index: "not found" / "past any valid position".
pub const NPOS: usize = usize::MAX;

/// A growable, binary-safe, NUL-terminated byte string.
///
/// The lifetime ties a stack-backed buffer to its caller-provided memory;
/// heap-backed and empty buffers can use any lifetime.
///
/// # Examples
///
/// ```rust
/// use sstring::SString;
///
/// let mut s = SString::new(20);
/// assert_eq!((s.len(), s.capacity()), (0, 20));
/// s.copy(b"hello").unwrap();
/// assert_eq!(s.as_bytes_with_nul(), b"hello\0");
/// s.release();
/// ```
pub struct SString<'a> {
    storage: Storage<'a>,
    len: usize,
    growth: GrowthPolicy,
}

impl<'a> SString<'a> {
    /// The shared empty value with [`GrowthPolicy::Fit`].
    #[must_use]
    pub fn empty() -> Self {
        Self::empty_with(GrowthPolicy::Fit)
    }

    /// The shared empty value carrying `growth`.
    #[must_use]
    pub fn empty_with(growth: GrowthPolicy) -> Self {
        Self {
            storage: Storage::Empty(empty_value(growth)),
            len: 0,
            growth,
        }
    }

    /// A heap buffer of `capacity` bytes.
    ///
    /// A capacity of `0` or [`NPOS`] yields the empty value; capacities above
    /// [`MAX_CAPACITY`] are clamped.
    ///
    /// # Panics
    ///
    /// If the allocation fails. See [`SString::try_new`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::try_new(capacity).unwrap_or_else(|_| oom())
    }

    /// Fallible [`SString::new`].
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the memory cannot be obtained (`fallible-alloc`
    /// builds; otherwise allocation failure aborts).
    pub fn try_new(capacity: usize) -> Result<Self, AllocError> {
        Self::try_with_options(BufferOptions {
            capacity,
            growth: GrowthPolicy::Fit,
        })
    }

    /// Builds a buffer from [`BufferOptions`].
    ///
    /// # Panics
    ///
    /// If the allocation fails. See [`SString::try_with_options`].
    #[must_use]
    pub fn with_options(options: BufferOptions) -> Self {
        Self::try_with_options(options).unwrap_or_else(|_| oom())
    }

    /// Fallible [`SString::with_options`].
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the memory cannot be obtained.
    pub fn try_with_options(options: BufferOptions) -> Result<Self, AllocError> {
        let BufferOptions { capacity, growth } = options;
        if capacity == 0 || capacity == NPOS {
            return Ok(Self::empty_with(growth));
        }
        let capacity = capacity.min(MAX_CAPACITY);
        Ok(Self {
            storage: Storage::Heap(raw::alloc_from(&[], capacity)?),
            len: 0,
            growth,
        })
    }

    /// A heap buffer holding a copy of `bytes`, with capacity
    /// `max(capacity, bytes.len())`. Always allocates, even when empty.
    ///
    /// # Panics
    ///
    /// If the allocation fails.
    #[must_use]
    pub fn from_bytes_with_capacity(capacity: usize, bytes: &[u8]) -> Self {
        Self::try_from_bytes_with_capacity(capacity, bytes).unwrap_or_else(|_| oom())
    }

    /// Fallible [`SString::from_bytes_with_capacity`].
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the memory cannot be obtained.
    pub fn try_from_bytes_with_capacity(capacity: usize, bytes: &[u8]) -> Result<Self, AllocError> {
        let capacity = capacity.max(bytes.len());
        let vec = raw::alloc_from(bytes, capacity)?;
        Ok(Self {
            storage: Storage::Heap(vec),
            len: bytes.len(),
            growth: GrowthPolicy::Fit,
        })
    }

    /// A heap buffer holding exactly `bytes`.
    ///
    /// # Panics
    ///
    /// If the allocation fails.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_bytes_with_capacity(0, bytes)
    }

    /// Uses caller memory as backing storage.
    ///
    /// The capacity is `backing.len() - 1`; the last byte holds the
    /// terminator once the buffer is full. An empty slice yields the empty
    /// value. Growing past the capacity moves the contents to the heap and
    /// leaves `backing` behind.
    #[must_use]
    pub fn on_stack(backing: &'a mut [u8]) -> Self {
        if backing.is_empty() {
            return Self::empty();
        }
        backing[0] = 0;
        Self {
            storage: Storage::Stack(backing),
            len: 0,
            growth: GrowthPolicy::Fit,
        }
    }

    /// Copies the contents into a new heap buffer with `capacity == len`.
    ///
    /// # Panics
    ///
    /// If the allocation fails. See [`SString::try_dup`].
    #[must_use]
    pub fn dup(&self) -> SString<'static> {
        self.try_dup().unwrap_or_else(|_| oom())
    }

    /// Fallible [`SString::dup`].
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the memory cannot be obtained.
    pub fn try_dup(&self) -> Result<SString<'static>, AllocError> {
        SString::try_from_bytes_with_capacity(0, self.as_bytes())
    }

    /// Destroys the handle, freeing heap storage. A no-op for empty and
    /// stack buffers beyond ending the borrow of the backing memory.
    pub fn release(self) {
        drop(self);
    }

    /// Exchanges two handles.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Bytes in use.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Bytes available before a reallocation, excluding the terminator.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// `true` when the length is zero, whatever the storage kind.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Where the bytes currently live.
    #[inline]
    #[must_use]
    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    /// `true` only for the shared empty values.
    #[inline]
    #[must_use]
    pub fn is_empty_type(&self) -> bool {
        self.storage_kind() == StorageKind::Empty
    }

    /// `true` when the buffer owns a heap allocation.
    #[inline]
    #[must_use]
    pub fn is_heap_type(&self) -> bool {
        self.storage_kind() == StorageKind::Heap
    }

    /// `true` while the buffer still uses caller-provided memory.
    #[inline]
    #[must_use]
    pub fn is_stack_type(&self) -> bool {
        self.storage_kind() == StorageKind::Stack
    }

    /// Policy applied on the next reallocation.
    #[inline]
    #[must_use]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// The bytes in use, `[0, len)`.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage.bytes()[..self.len]
    }

    /// The bytes in use followed by the terminator, `[0, len]`.
    #[inline]
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.storage.bytes()[..=self.len]
    }

    /// Mutable view of `[0, len)`. Empty for the shared empty values.
    #[inline]
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        let len = self.len;
        match self.storage.bytes_mut() {
            Some(bytes) => &mut bytes[..len],
            None => &mut [],
        }
    }

    /// The contents as a C string, ending at the first NUL.
    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        // The terminator at `len` guarantees a NUL exists.
        CStr::from_bytes_until_nul(self.as_bytes_with_nul()).unwrap_or_default()
    }

    /// Pointer to the first byte; valid for `len + 1` reads until the next
    /// mutation.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.storage.bytes().as_ptr()
    }

    /// Identity comparison: do both handles refer to the same memory?
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &SString<'_>) -> bool {
        ptr::eq(self.as_ptr(), other.as_ptr())
    }

    /// Byte-wise equality; identical handles are equal without a scan.
    #[must_use]
    pub fn equal(&self, other: &SString<'_>) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.len == other.len && self.as_bytes() == other.as_bytes()
    }

    /// Lexicographic comparison over the common prefix, shorter first on a
    /// tie. Embedded NULs compare like any other byte.
    #[must_use]
    pub fn compare(&self, other: &SString<'_>) -> Ordering {
        let (a, b) = (self.as_bytes(), other.as_bytes());
        let common = a.len().min(b.len());
        a[..common]
            .cmp(&b[..common])
            .then_with(|| a.len().cmp(&b.len()))
    }

    /// Sets the length if it fits in the capacity, then re-terminates.
    /// Bytes exposed by growing the length are whatever the storage holds.
    pub fn set_len(&mut self, len: usize) {
        if len <= self.capacity() {
            self.set_len_terminated(len);
        }
    }

    /// Recomputes the length as the C-string length of the storage.
    ///
    /// A NUL is forced at `capacity` first so the scan is bounded.
    pub fn set_len_from_nul(&mut self) {
        let capacity = self.capacity();
        let Some(bytes) = self.storage.bytes_mut() else {
            return;
        };
        bytes[capacity] = 0;
        let len = bytes.find_byte(0).unwrap_or(capacity);
        self.len = len;
    }

    /// Sets `len` and writes the terminator. The shared empty values are
    /// already terminated and only ever hold length zero.
    #[inline]
    pub(crate) fn set_len_terminated(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        self.len = len;
        if let Some(bytes) = self.storage.bytes_mut() {
            bytes[len] = 0;
        } else {
            debug_assert_eq!(len, 0, "empty value must stay empty");
        }
    }

    /// Writable backing region (`capacity + 1` bytes).
    ///
    /// Callers reach this only after growing, so the storage is never one of
    /// the shared empty values when they need a non-empty region.
    #[inline]
    pub(crate) fn raw_mut(&mut self) -> &mut [u8] {
        self.storage.bytes_mut().unwrap_or(&mut [])
    }

    /// Sets the growth policy. An empty value is rebound to the shared empty
    /// value for `growth`.
    pub fn set_growth_policy(&mut self, growth: GrowthPolicy) {
        self.growth = growth;
        if let Storage::Empty(_) = self.storage {
            self.storage = Storage::Empty(empty_value(growth));
        }
    }

    /// Reallocates to exactly `capacity` bytes, moving empty and stack
    /// storage to the heap. The length is clamped if it no longer fits.
    fn realloc_exact(&mut self, capacity: usize) -> Result<(), AllocError> {
        match &mut self.storage {
            Storage::Heap(vec) => raw::realloc(vec, capacity)?,
            storage => {
                let keep = self.len.min(capacity);
                let vec = raw::alloc_from(&storage.bytes()[..keep], capacity)?;
                *storage = Storage::Heap(vec);
            }
        }
        if self.len > capacity {
            self.set_len_terminated(capacity);
        } else {
            let len = self.len;
            self.set_len_terminated(len);
        }
        Ok(())
    }

    /// Reallocates for at least `required` bytes, adding the policy's slack.
    pub(crate) fn realloc_grow(&mut self, required: usize) -> Result<(), AllocError> {
        if required > MAX_CAPACITY {
            return raw::capacity_overflow();
        }
        self.realloc_exact(raw::grow_target(self.growth, required))
    }

    /// Guarantees `capacity() >= required`, reallocating with the growth
    /// policy's slack if needed.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the memory cannot be obtained (`fallible-alloc`
    /// builds only); the buffer is left unchanged.
    pub fn ensure_capacity(&mut self, required: usize) -> Result<(), AllocError> {
        if self.capacity() >= required {
            return Ok(());
        }
        self.realloc_grow(required)
    }

    /// Grows the capacity by `additional` bytes (policy slack applied).
    ///
    /// # Errors
    ///
    /// [`AllocError::CapacityOverflow`] if the sum overflows (`fallible-alloc`
    /// builds; otherwise this panics), or an allocation failure.
    pub fn add_capacity(&mut self, additional: usize) -> Result<(), AllocError> {
        let capacity = raw::checked_add(self.capacity(), additional)?;
        self.realloc_grow(capacity)
    }

    /// Shrinks a heap buffer to `capacity == len`. Empty and stack buffers
    /// are left alone.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the reallocation fails.
    pub fn shrink_to_fit(&mut self) -> Result<(), AllocError> {
        if self.is_heap_type() && self.capacity() != self.len {
            self.realloc_exact(self.len)?;
        }
        Ok(())
    }

    /// Reallocates to exactly `capacity`, ignoring the growth policy and
    /// truncating the contents if they no longer fit.
    ///
    /// Stack and empty buffers that already have room are left untouched.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the reallocation fails.
    pub fn resize_exact(&mut self, capacity: usize) -> Result<(), AllocError> {
        let current = self.capacity();
        if !self.is_heap_type() && current >= capacity {
            return Ok(());
        }
        if current != capacity {
            self.realloc_exact(capacity)?;
        }
        Ok(())
    }

    /// Moves empty or stack contents to a heap allocation of exactly `len`
    /// bytes. Heap buffers are untouched.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the allocation fails.
    pub fn heapify(&mut self) -> Result<(), AllocError> {
        if !self.is_heap_type() {
            let vec = raw::alloc_from(self.as_bytes_with_nul(), self.len)?;
            self.storage = Storage::Heap(vec);
        }
        Ok(())
    }

    /// Asserts the structural invariants.
    ///
    /// # Panics
    ///
    /// If `len > capacity`, the terminator is missing, or an empty value is
    /// out of sync with its growth policy.
    #[cfg(any(test, feature = "fuzzing"))]
    pub fn check_invariants(&self) {
        assert!(self.len <= self.capacity(), "len {} > capacity {}", self.len, self.capacity());
        assert_eq!(self.storage.bytes()[self.len], 0, "missing terminator");
        if let Storage::Empty(value) = &self.storage {
            assert_eq!(self.len, 0);
            assert_eq!(value.growth, self.growth);
        }
    }
}

#[cold]
fn oom() -> ! {
    panic!("sstring: allocation failure");
}

impl Default for SString<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for SString<'_> {
    fn clone(&self) -> Self {
        self.dup()
    }
}

impl Deref for SString<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl DerefMut for SString<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_bytes()
    }
}

impl AsRef<[u8]> for SString<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for SString<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for SString<'_> {}

impl PartialOrd for SString<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SString<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for SString<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl PartialEq<[u8]> for SString<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for SString<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for SString<'_> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl PartialEq<str> for SString<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for SString<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl From<&[u8]> for SString<'_> {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&str> for SString<'_> {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<Vec<u8>> for SString<'_> {
    /// Reuses the vector's allocation; the terminator is pushed onto it.
    fn from(mut vec: Vec<u8>) -> Self {
        let len = vec.len();
        vec.push(0);
        Self {
            storage: Storage::Heap(vec),
            len,
            growth: GrowthPolicy::Fit,
        }
    }
}

impl fmt::Debug for SString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SString")
            .field("kind", &self.storage_kind())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("growth", &self.growth)
            .field("bytes", &BStr::new(self.as_bytes()))
            .finish()
    }
}

impl fmt::Display for SString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(BStr::new(self.as_bytes()), f)
    }
}

// Serialized as a byte string, so formats with a native bytes type keep it
// compact and binary content survives. Deserialization also accepts strings
// and sequences of integers, which is what self-describing text formats
// hand back.
#[cfg(any(test, feature = "serde"))]
mod serde_impls {
    use alloc::{string::String, vec::Vec};
    use core::fmt;

    use serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{SeqAccess, Visitor},
    };

    use super::SString;

    impl Serialize for SString<'_> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_bytes(self.as_bytes())
        }
    }

    struct SStringVisitor;

    impl<'de> Visitor<'de> for SStringVisitor {
        type Value = SString<'static>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a byte string")
        }

        fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(SString::from_bytes(value))
        }

        fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(SString::from(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(SString::from_bytes(value.as_bytes()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(SString::from(value.into_bytes()))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
            while let Some(b) = seq.next_element::<u8>()? {
                bytes.push(b);
            }
            Ok(SString::from(bytes))
        }
    }

    impl<'de> Deserialize<'de> for SString<'_> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_byte_buf(SStringVisitor)
        }
    }

}

/// Declares a stack-backed [`SString`] named `$name` with capacity `$cap`.
///
/// ```rust
/// use sstring::stack_sstring;
///
/// stack_sstring!(s, 32);
/// assert!(s.is_stack_type());
/// assert_eq!(s.capacity(), 32);
/// s.copy(b"on the stack").unwrap();
/// assert!(s.is_stack_type());
/// ```
#[macro_export]
macro_rules! stack_sstring {
    ($name:ident, $cap:expr) => {
        let mut backing = [0u8; $cap + 1];
        #[allow(unused_mut)]
        let mut $name = $crate::SString::on_stack(&mut backing);
    };
}
