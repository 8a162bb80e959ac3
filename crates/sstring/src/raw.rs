//! Raw allocation wrappers and the capacity-growth arithmetic.
//!
//! Heap storage is a `Vec<u8>` whose *length* is `capacity + 1`; the vector's
//! own spare capacity is never used. Growing goes through `reserve_exact`, so
//! an existing allocation is extended or moved by the allocator's realloc.
//!
//! With the `fallible-alloc` feature the wrappers use `try_reserve_exact` and
//! report failure as [`AllocError`]. Without it they use the infallible path,
//! which aborts the process on allocation failure.

use alloc::vec::Vec;
use core::{mem::size_of, ops::Range};

use crate::{error::AllocError, options::GrowthPolicy};

/// Size of the header the C layout prepends to the bytes; kept as overhead in
/// [`MAX_CAPACITY`] so capacities stay interchangeable with that layout.
pub const HEADER_SIZE: usize = 2 * size_of::<usize>() + size_of::<u32>();

/// Largest capacity a buffer may have, excluding the terminator.
pub const MAX_CAPACITY: usize = isize::MAX as usize - HEADER_SIZE - 2;

/// Upper bound on the slack a growth policy may add in one reallocation.
pub const MAX_GROWTH_SLACK: usize = 0x10_0000;

/// Capacity to allocate when `requested` bytes are needed under `policy`.
///
/// Saturates at [`MAX_CAPACITY`] instead of overflowing.
#[must_use]
pub fn grow_target(policy: GrowthPolicy, requested: usize) -> usize {
    if policy == GrowthPolicy::Fit {
        return requested;
    }
    let slack = policy.slack(requested).min(MAX_GROWTH_SLACK);
    match requested.checked_add(slack) {
        Some(target) if target <= MAX_CAPACITY => target,
        _ => MAX_CAPACITY,
    }
}

#[cfg(not(feature = "fallible-alloc"))]
pub(crate) fn capacity_overflow<T>() -> Result<T, AllocError> {
    panic!("capacity overflow");
}

#[cfg(feature = "fallible-alloc")]
pub(crate) fn capacity_overflow<T>() -> Result<T, AllocError> {
    Err(AllocError::CapacityOverflow)
}

pub(crate) fn checked_add(a: usize, b: usize) -> Result<usize, AllocError> {
    match a.checked_add(b) {
        Some(sum) if sum <= MAX_CAPACITY => Ok(sum),
        _ => capacity_overflow(),
    }
}

#[cfg(not(feature = "fallible-alloc"))]
#[inline]
fn reserve_exact(vec: &mut Vec<u8>, additional: usize) -> Result<(), AllocError> {
    vec.reserve_exact(additional);
    Ok(())
}

#[cfg(feature = "fallible-alloc")]
#[inline]
fn reserve_exact(vec: &mut Vec<u8>, additional: usize) -> Result<(), AllocError> {
    vec.try_reserve_exact(additional)
        .map_err(|_| AllocError::OutOfMemory {
            size: vec.len().saturating_add(additional),
        })
}

/// Fresh allocation for `capacity` bytes plus terminator, seeded with `prefix`.
pub(crate) fn alloc_from(prefix: &[u8], capacity: usize) -> Result<Vec<u8>, AllocError> {
    if capacity > MAX_CAPACITY {
        return capacity_overflow();
    }
    debug_assert!(prefix.len() <= capacity + 1);
    let mut vec = Vec::new();
    reserve_exact(&mut vec, capacity + 1)?;
    vec.extend_from_slice(prefix);
    vec.resize(capacity + 1, 0);
    Ok(vec)
}

/// Grows or shrinks `vec` in place to hold `capacity` bytes plus terminator.
///
/// Shrinking drops trailing bytes; the caller re-terminates.
pub(crate) fn realloc(vec: &mut Vec<u8>, capacity: usize) -> Result<(), AllocError> {
    if capacity > MAX_CAPACITY {
        return capacity_overflow();
    }
    let size = capacity + 1;
    if size > vec.len() {
        reserve_exact(vec, size - vec.len())?;
        vec.resize(size, 0);
    } else {
        vec.truncate(size);
        vec.shrink_to_fit();
    }
    Ok(())
}

/// Moves `buf[src]` to start at `dest`. The ranges may overlap (`memmove`).
///
/// Every shift in the mutation engine goes through here; a forward
/// element-by-element copy would corrupt overlapping regions.
#[inline]
pub(crate) fn move_bytes(buf: &mut [u8], src: Range<usize>, dest: usize) {
    if src.start != dest && !src.is_empty() {
        buf.copy_within(src, dest);
    }
}
