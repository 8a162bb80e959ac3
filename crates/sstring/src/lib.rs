//! Growable, binary-safe, NUL-terminated byte strings.
//!
//! [`SString`] keeps an explicit length and capacity, so it may hold
//! arbitrary bytes (embedded NULs included), while also keeping a `0` byte
//! just past the contents so it can be handed to C as a plain string.
//!
//! A buffer lives in one of three places ([`StorageKind`]): a shared
//! immutable empty value, caller-provided stack memory, or the heap. Any
//! mutation that needs more room than the current storage offers moves the
//! contents to a fresh heap allocation, sized by the buffer's
//! [`GrowthPolicy`].
//!
//! ```rust
//! use sstring::SString;
//!
//! let mut s = SString::from("abczzzzabcababcc");
//! s.replace(0, b"abc", b"-").unwrap();
//! assert_eq!(s, "-zzzz-ab-c");
//! assert_eq!(s.find(0, b"ab"), Some(6));
//! ```

#![no_std]
#![allow(clippy::module_name_repetitions)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod options;
mod raw;
mod storage;
mod string;

mod cstr;
mod escape;
mod fmt;
mod mutate;
mod pack;
mod search;
pub mod utf8;

#[cfg(test)]
mod tests;

pub use error::{AllocError, FormatError, UnpackError};
pub use options::{BufferOptions, GrowthPolicy};
pub use pack::{Field, FieldKind, packed_len, parse_format};
pub use raw::{HEADER_SIZE, MAX_CAPACITY, MAX_GROWTH_SLACK, grow_target};
pub use search::memrchr;
pub use storage::StorageKind;
pub use string::{NPOS, SString};
