//! Big-endian packing of fixed-width fields.
//!
//! A layout is a sequence of [`FieldKind`]s, written either directly or as a
//! format string using the single-character codes below.
//!
//! | code | kind            | bytes |
//! |------|-----------------|-------|
//! | `c`  | [`FieldKind::Char`] | 1 |
//! | `b`  | [`FieldKind::I8`]   | 1 |
//! | `B`  | [`FieldKind::U8`]   | 1 |
//! | `?`  | [`FieldKind::Bool`] | 1 |
//! | `h`  | [`FieldKind::I16`]  | 2 |
//! | `H`  | [`FieldKind::U16`]  | 2 |
//! | `i`  | [`FieldKind::I32`]  | 4 |
//! | `I`  | [`FieldKind::U32`]  | 4 |
//! | `q`  | [`FieldKind::I64`]  | 8 |
//! | `Q`  | [`FieldKind::U64`]  | 8 |

use alloc::vec::Vec;

use crate::{
    error::{AllocError, UnpackError},
    raw,
    string::SString,
};

/// Type of one packed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A raw byte, written as is.
    Char,
    /// Signed byte.
    I8,
    /// Unsigned byte.
    U8,
    /// Written as `0` or `1`; any non-zero byte reads back as `true`.
    Bool,
    /// Big-endian `i16`.
    I16,
    /// Big-endian `u16`.
    U16,
    /// Big-endian `i32`.
    I32,
    /// Big-endian `u32`.
    U32,
    /// Big-endian `i64`.
    I64,
    /// Big-endian `u64`.
    U64,
}

impl FieldKind {
    /// Width in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            FieldKind::Char | FieldKind::I8 | FieldKind::U8 | FieldKind::Bool => 1,
            FieldKind::I16 | FieldKind::U16 => 2,
            FieldKind::I32 | FieldKind::U32 => 4,
            FieldKind::I64 | FieldKind::U64 => 8,
        }
    }

    /// Format-string code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            FieldKind::Char => 'c',
            FieldKind::I8 => 'b',
            FieldKind::U8 => 'B',
            FieldKind::Bool => '?',
            FieldKind::I16 => 'h',
            FieldKind::U16 => 'H',
            FieldKind::I32 => 'i',
            FieldKind::U32 => 'I',
            FieldKind::I64 => 'q',
            FieldKind::U64 => 'Q',
        }
    }

    /// Kind for a format-string code, `None` if the code is unknown.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        Some(match code {
            'c' => FieldKind::Char,
            'b' => FieldKind::I8,
            'B' => FieldKind::U8,
            '?' => FieldKind::Bool,
            'h' => FieldKind::I16,
            'H' => FieldKind::U16,
            'i' => FieldKind::I32,
            'I' => FieldKind::U32,
            'q' => FieldKind::I64,
            'Q' => FieldKind::U64,
            _ => return None,
        })
    }
}

/// Parses a format string such as `"cH?q"`.
///
/// # Errors
///
/// [`UnpackError::UnknownCode`] for a character outside the code table.
///
/// ```rust
/// use sstring::{FieldKind, parse_format};
///
/// assert_eq!(parse_format("B?H").unwrap(), [FieldKind::U8, FieldKind::Bool, FieldKind::U16]);
/// assert!(parse_format("Bx").is_err());
/// ```
pub fn parse_format(format: &str) -> Result<Vec<FieldKind>, UnpackError> {
    format
        .chars()
        .map(|c| FieldKind::from_code(c).ok_or(UnpackError::UnknownCode(c)))
        .collect()
}

/// Total width of a layout.
#[must_use]
pub fn packed_len(kinds: &[FieldKind]) -> usize {
    kinds.iter().map(|k| k.size()).sum()
}

/// One packed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// See [`FieldKind::Char`].
    Char(u8),
    /// See [`FieldKind::I8`].
    I8(i8),
    /// See [`FieldKind::U8`].
    U8(u8),
    /// See [`FieldKind::Bool`].
    Bool(bool),
    /// See [`FieldKind::I16`].
    I16(i16),
    /// See [`FieldKind::U16`].
    U16(u16),
    /// See [`FieldKind::I32`].
    I32(i32),
    /// See [`FieldKind::U32`].
    U32(u32),
    /// See [`FieldKind::I64`].
    I64(i64),
    /// See [`FieldKind::U64`].
    U64(u64),
}

impl Field {
    /// The layout entry this value is packed as.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Field::Char(_) => FieldKind::Char,
            Field::I8(_) => FieldKind::I8,
            Field::U8(_) => FieldKind::U8,
            Field::Bool(_) => FieldKind::Bool,
            Field::I16(_) => FieldKind::I16,
            Field::U16(_) => FieldKind::U16,
            Field::I32(_) => FieldKind::I32,
            Field::U32(_) => FieldKind::U32,
            Field::I64(_) => FieldKind::I64,
            Field::U64(_) => FieldKind::U64,
        }
    }

    /// Writes the big-endian bytes into `out`, which is exactly
    /// `self.kind().size()` long.
    fn write_be(self, out: &mut [u8]) {
        match self {
            Field::Char(v) | Field::U8(v) => out[0] = v,
            Field::I8(v) => out.copy_from_slice(&v.to_be_bytes()),
            Field::Bool(v) => out[0] = u8::from(v),
            Field::I16(v) => out.copy_from_slice(&v.to_be_bytes()),
            Field::U16(v) => out.copy_from_slice(&v.to_be_bytes()),
            Field::I32(v) => out.copy_from_slice(&v.to_be_bytes()),
            Field::U32(v) => out.copy_from_slice(&v.to_be_bytes()),
            Field::I64(v) => out.copy_from_slice(&v.to_be_bytes()),
            Field::U64(v) => out.copy_from_slice(&v.to_be_bytes()),
        }
    }

    /// Reads a field of `kind` from the front of `bytes`, which holds at
    /// least `kind.size()` bytes.
    fn read_be(kind: FieldKind, bytes: &[u8]) -> Self {
        fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
            let mut out = [0u8; N];
            out.copy_from_slice(&bytes[..N]);
            out
        }
        match kind {
            FieldKind::Char => Field::Char(bytes[0]),
            FieldKind::I8 => Field::I8(i8::from_be_bytes(array(bytes))),
            FieldKind::U8 => Field::U8(bytes[0]),
            FieldKind::Bool => Field::Bool(bytes[0] != 0),
            FieldKind::I16 => Field::I16(i16::from_be_bytes(array(bytes))),
            FieldKind::U16 => Field::U16(u16::from_be_bytes(array(bytes))),
            FieldKind::I32 => Field::I32(i32::from_be_bytes(array(bytes))),
            FieldKind::U32 => Field::U32(u32::from_be_bytes(array(bytes))),
            FieldKind::I64 => Field::I64(i64::from_be_bytes(array(bytes))),
            FieldKind::U64 => Field::U64(u64::from_be_bytes(array(bytes))),
        }
    }
}

impl SString<'_> {
    /// Appends `fields` in big-endian order, growing once for the lot.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    ///
    /// ```rust
    /// use sstring::{Field, SString};
    ///
    /// let mut s = SString::empty();
    /// s.pack(&[Field::Char(b'v'), Field::U16(0x0102), Field::Bool(true)]).unwrap();
    /// assert_eq!(s, b"v\x01\x02\x01");
    /// ```
    pub fn pack(&mut self, fields: &[Field]) -> Result<(), AllocError> {
        let len = self.len();
        let size: usize = fields.iter().map(|f| f.kind().size()).sum();
        if size == 0 {
            return Ok(());
        }
        let new_len = raw::checked_add(len, size)?;
        self.ensure_capacity(new_len)?;

        let buf = self.raw_mut();
        let mut at = len;
        for field in fields {
            let width = field.kind().size();
            field.write_be(&mut buf[at..at + width]);
            at += width;
        }
        self.set_len_terminated(new_len);
        Ok(())
    }

    /// Reads fields of the given kinds starting at `index`.
    ///
    /// # Errors
    ///
    /// [`UnpackError::UnexpectedEnd`] if the buffer runs out first.
    ///
    /// ```rust
    /// use sstring::{Field, FieldKind, SString};
    ///
    /// let s = SString::from_bytes(b"v\x01\x02\x01");
    /// let fields = s.unpack(1, &[FieldKind::U16, FieldKind::Bool]).unwrap();
    /// assert_eq!(fields, [Field::U16(0x0102), Field::Bool(true)]);
    /// ```
    pub fn unpack(&self, index: usize, kinds: &[FieldKind]) -> Result<Vec<Field>, UnpackError> {
        let bytes = self.as_bytes();
        let mut at = index;
        let mut fields = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let needed = kind.size();
            let available = bytes.len().saturating_sub(at);
            if available < needed {
                return Err(UnpackError::UnexpectedEnd {
                    index: at,
                    needed,
                    available,
                });
            }
            fields.push(Field::read_be(kind, &bytes[at..]));
            at += needed;
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use rstest::rstest;

    use super::*;

    #[test]
    fn codes_round_trip() {
        let all = parse_format("cbB?hHiIqQ").unwrap();
        assert_eq!(all.len(), 10);
        assert_eq!(packed_len(&all), 1 + 1 + 1 + 1 + 2 + 2 + 4 + 4 + 8 + 8);
        for kind in all {
            assert_eq!(FieldKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn unknown_code() {
        assert_eq!(parse_format("hz"), Err(UnpackError::UnknownCode('z')));
    }

    #[rstest]
    #[case(Field::I8(-2), b"\xFE")]
    #[case(Field::I16(-2), b"\xFF\xFE")]
    #[case(Field::U16(0xBEEF), b"\xBE\xEF")]
    #[case(Field::I32(1), b"\x00\x00\x00\x01")]
    #[case(Field::U32(0xDEAD_BEEF), b"\xDE\xAD\xBE\xEF")]
    #[case(Field::I64(i64::MIN), b"\x80\x00\x00\x00\x00\x00\x00\x00")]
    #[case(Field::U64(0x0102_0304_0506_0708), b"\x01\x02\x03\x04\x05\x06\x07\x08")]
    #[case(Field::Bool(false), b"\x00")]
    fn big_endian_layout(#[case] field: Field, #[case] bytes: &[u8]) {
        let mut s = SString::empty();
        s.pack(&[field]).unwrap();
        s.check_invariants();
        assert_eq!(s.as_bytes(), bytes);
        assert_eq!(s.unpack(0, &[field.kind()]).unwrap(), vec![field]);
    }

    #[test]
    fn pack_appends() {
        let mut s = SString::from("hdr:");
        let fields = [Field::Char(b'x'), Field::U8(7), Field::I16(-1), Field::Bool(true)];
        s.pack(&fields).unwrap();
        assert_eq!(s, b"hdr:x\x07\xFF\xFF\x01");
        let kinds: Vec<_> = fields.iter().map(Field::kind).collect();
        assert_eq!(s.unpack(4, &kinds).unwrap(), fields);
    }

    #[test]
    fn bool_reads_any_nonzero() {
        let s = SString::from_bytes(b"\x00\x02");
        assert_eq!(
            s.unpack(0, &[FieldKind::Bool, FieldKind::Bool]).unwrap(),
            [Field::Bool(false), Field::Bool(true)]
        );
    }

    #[rstest]
    #[case(0, &[FieldKind::U32, FieldKind::U16], 4, 2, 1)]
    #[case(3, &[FieldKind::U16, FieldKind::U16], 5, 2, 0)]
    #[case(9, &[FieldKind::Char], 9, 1, 0)]
    fn unexpected_end(
        #[case] index: usize,
        #[case] kinds: &[FieldKind],
        #[case] at: usize,
        #[case] needed: usize,
        #[case] available: usize,
    ) {
        let s = SString::from_bytes(b"\x00\x01\x02\x03\x04");
        assert_eq!(
            s.unpack(index, kinds),
            Err(UnpackError::UnexpectedEnd {
                index: at,
                needed,
                available,
            })
        );
    }

    #[test]
    fn empty_pack_keeps_empty_value() {
        let mut s = SString::empty();
        s.pack(&[]).unwrap();
        assert!(s.is_empty_type());
        assert!(s.unpack(0, &[]).unwrap().is_empty());
    }
}
