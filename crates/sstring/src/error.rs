use thiserror::Error;

/// Failure to obtain backing memory for a buffer.
///
/// Only observable with the `fallible-alloc` feature; the default build
/// aborts on allocation failure instead, so every mutator returns `Ok`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The requested capacity exceeds [`MAX_CAPACITY`](crate::MAX_CAPACITY)
    /// or the size arithmetic overflowed.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The allocator could not provide `size` bytes.
    #[error("allocation of {size} bytes failed")]
    OutOfMemory {
        /// Total bytes the failed request asked for.
        size: usize,
    },
}

/// Failure of a formatted write into a buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Growing the buffer failed.
    #[error(transparent)]
    Alloc(#[from] AllocError),
    /// A `Display`/`Debug` implementation reported an error.
    #[error("formatter error")]
    Formatter,
}

/// Failure to decode packed fields.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackError {
    /// The buffer ended inside a field.
    #[error("unexpected end of buffer at {index}: need {needed} bytes, {available} available")]
    UnexpectedEnd {
        /// Offset of the field that did not fit.
        index: usize,
        /// Width of that field.
        needed: usize,
        /// Bytes left from `index` to the end of the buffer.
        available: usize,
    },
    /// A format string used a character outside the code table.
    #[error("unknown field code '{0}'")]
    UnknownCode(char),
}
