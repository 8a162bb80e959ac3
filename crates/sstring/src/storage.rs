//! Storage origins behind a single buffer handle.
//!
//! Every variant exposes the same byte view: `capacity + 1` bytes, the last
//! of which is reserved for the terminator. Only [`Storage::Heap`] owns its
//! memory and may be reallocated; the other two are replaced wholesale by a
//! fresh heap allocation when they run out of room.

use alloc::vec::Vec;

use crate::options::GrowthPolicy;

/// Where a buffer's bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// One of the shared, immutable zero-length values.
    Empty,
    /// Caller-provided fixed memory.
    Stack,
    /// Owned, reallocatable memory.
    Heap,
}

/// A process-wide zero-length value. Never written to.
#[derive(Debug)]
pub(crate) struct EmptyValue {
    pub(crate) growth: GrowthPolicy,
    nul: [u8; 1],
}

pub(crate) static EMPTY_VALUES: [EmptyValue; 4] = [
    EmptyValue {
        growth: GrowthPolicy::Fit,
        nul: [0],
    },
    EmptyValue {
        growth: GrowthPolicy::Grow25,
        nul: [0],
    },
    EmptyValue {
        growth: GrowthPolicy::Grow50,
        nul: [0],
    },
    EmptyValue {
        growth: GrowthPolicy::Grow100,
        nul: [0],
    },
];

pub(crate) fn empty_value(growth: GrowthPolicy) -> &'static EmptyValue {
    &EMPTY_VALUES[growth.index()]
}

#[derive(Debug)]
pub(crate) enum Storage<'a> {
    Empty(&'static EmptyValue),
    Stack(&'a mut [u8]),
    Heap(Vec<u8>),
}

impl Storage<'_> {
    #[inline]
    pub(crate) fn kind(&self) -> StorageKind {
        match self {
            Storage::Empty(_) => StorageKind::Empty,
            Storage::Stack(_) => StorageKind::Stack,
            Storage::Heap(_) => StorageKind::Heap,
        }
    }

    /// The full backing region, terminator slot included.
    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        match self {
            Storage::Empty(value) => value.nul.as_slice(),
            Storage::Stack(buf) => &**buf,
            Storage::Heap(vec) => vec.as_slice(),
        }
    }

    /// Writable backing region; `None` for the shared empty values.
    #[inline]
    pub(crate) fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        match self {
            Storage::Empty(_) => None,
            Storage::Stack(buf) => Some(&mut **buf),
            Storage::Heap(vec) => Some(vec.as_mut_slice()),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.bytes().len() - 1
    }
}
