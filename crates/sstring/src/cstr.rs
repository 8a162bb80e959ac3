//! Helpers mirroring the C character-class routines.

use crate::string::SString;

/// C `isspace` in the "C" locale. Unlike [`u8::is_ascii_whitespace`] this
/// includes the vertical tab.
#[inline]
const fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

impl SString<'_> {
    /// Strips C whitespace (`' ' \t \n \v \f \r`) from both ends.
    pub fn trim_whitespace(&mut self) {
        self.trim_by(0, usize::MAX, is_c_space);
    }

    /// ASCII upper-case over the whole buffer, embedded NULs included.
    pub fn make_ascii_uppercase(&mut self) {
        self.as_mut_bytes().make_ascii_uppercase();
    }

    /// ASCII lower-case over the whole buffer, embedded NULs included.
    pub fn make_ascii_lowercase(&mut self) {
        self.as_mut_bytes().make_ascii_lowercase();
    }
}
