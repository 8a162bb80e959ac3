//! Substring search: forward, reverse, and non-overlapping counting.
//!
//! Every scan jumps to the next candidate with a raw byte search for one
//! anchor byte of the needle, then compares the full needle there.

use bstr::ByteSlice;

use crate::string::SString;

/// Last occurrence of `byte` in `haystack[..=last_index]`.
///
/// `last_index` is clamped to the end of `haystack`.
///
/// ```rust
/// assert_eq!(sstring::memrchr(b"asdfasdf", b'f', 8), Some(7));
/// assert_eq!(sstring::memrchr(b"asdfasdf", b'f', 6), Some(3));
/// assert_eq!(sstring::memrchr(b"", b'f', 0), None);
/// ```
#[must_use]
pub fn memrchr(haystack: &[u8], byte: u8, last_index: usize) -> Option<usize> {
    let end = last_index.saturating_add(1).min(haystack.len());
    haystack[..end].rfind_byte(byte)
}

/// Smallest match position `>= start`.
pub(crate) fn find_from(haystack: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    let (&first, rest) = needle.split_first()?;
    let mut cursor = start;
    while cursor < haystack.len() {
        cursor += haystack[cursor..].find_byte(first)?;
        if haystack.len() - cursor < needle.len() {
            return None;
        }
        if &haystack[cursor + 1..cursor + needle.len()] == rest {
            return Some(cursor);
        }
        cursor += 1;
    }
    None
}

impl SString<'_> {
    /// Position of the first occurrence of `needle` at or after `start`.
    ///
    /// An empty needle is never found.
    ///
    /// ```rust
    /// use sstring::SString;
    ///
    /// let s = SString::from("asdfasdfasdf");
    /// assert_eq!(s.find(0, b"asdf"), Some(0));
    /// assert_eq!(s.find(1, b"asdf"), Some(4));
    /// assert_eq!(s.find(0, b""), None);
    /// ```
    #[must_use]
    pub fn find(&self, start: usize, needle: &[u8]) -> Option<usize> {
        find_from(self.as_bytes(), start, needle)
    }

    /// Position of the last occurrence of `needle` that ends at or before
    /// `index`. Indices past the end are clamped to the last byte.
    ///
    /// ```rust
    /// use sstring::{NPOS, SString};
    ///
    /// let s = SString::from("asdfasdfasdf");
    /// assert_eq!(s.rfind(NPOS, b"asdf"), Some(8));
    /// assert_eq!(s.rfind(9, b"asdf"), Some(4));
    /// assert_eq!(s.rfind(3, b"asdf"), Some(0));
    /// ```
    #[must_use]
    pub fn rfind(&self, index: usize, needle: &[u8]) -> Option<usize> {
        let haystack = self.as_bytes();
        let (&last, _) = needle.split_last()?;
        if haystack.is_empty() {
            return None;
        }
        let tail = needle.len() - 1;
        let mut cursor = index.min(haystack.len() - 1);
        loop {
            cursor = memrchr(haystack, last, cursor)?;
            if cursor < tail {
                return None;
            }
            let begin = cursor - tail;
            if &haystack[begin..=cursor] == needle {
                return Some(begin);
            }
            cursor = cursor.checked_sub(1)?;
        }
    }

    /// Non-overlapping occurrences of `needle` at or after `start`.
    ///
    /// ```rust
    /// use sstring::SString;
    ///
    /// let s = SString::from("aaaa");
    /// assert_eq!(s.count(0, b"aa"), 2);
    /// assert_eq!(s.count(0, b""), 0);
    /// ```
    #[must_use]
    pub fn count(&self, start: usize, needle: &[u8]) -> usize {
        let haystack = self.as_bytes();
        let mut count = 0;
        let mut cursor = start;
        while let Some(at) = find_from(haystack, cursor, needle) {
            count += 1;
            cursor = at + needle.len();
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::NPOS;

    const HAYSTACK: &str = "asdfasdfasdf";

    #[rstest]
    #[case(0, b"asdf", Some(0))]
    #[case(1, b"asdf", Some(4))]
    #[case(5, b"asdf", Some(8))]
    #[case(9, b"asdf", None)]
    #[case(0, b"fa", Some(3))]
    #[case(0, b"asdfasdfasdfa", None)]
    #[case(0, b"", None)]
    #[case(NPOS, b"a", None)]
    fn find(#[case] start: usize, #[case] needle: &[u8], #[case] expected: Option<usize>) {
        assert_eq!(SString::from(HAYSTACK).find(start, needle), expected);
    }

    #[rstest]
    #[case(NPOS, b"asdf", Some(8))]
    #[case(12, b"asdf", Some(8))]
    #[case(13, b"asdf", Some(8))]
    #[case(9, b"asdf", Some(4))]
    #[case(3, b"asdf", Some(0))]
    #[case(2, b"asdf", None)]
    #[case(NPOS, b"a", Some(8))]
    #[case(0, b"a", Some(0))]
    #[case(NPOS, b"", None)]
    #[case(NPOS, b"zz", None)]
    fn rfind(#[case] index: usize, #[case] needle: &[u8], #[case] expected: Option<usize>) {
        assert_eq!(SString::from(HAYSTACK).rfind(index, needle), expected);
    }

    #[test]
    fn rfind_on_empty() {
        assert_eq!(SString::empty().rfind(NPOS, b"a"), None);
        assert_eq!(SString::empty().find(0, b"a"), None);
    }

    #[test]
    fn search_is_binary_safe() {
        let s = SString::from_bytes(b"a\0b\0c\0b");
        assert_eq!(s.find(0, b"\0b"), Some(1));
        assert_eq!(s.rfind(NPOS, b"\0b"), Some(5));
        assert_eq!(s.count(0, b"\0"), 3);
    }

    #[rstest]
    #[case("asdfzzzasdzzzasdfzzzzasdasdf", 0, b"asdf", 3)]
    #[case("asdfzzzasdzzzasdfzzzzasdasdf", 1, b"asdf", 2)]
    #[case("aaaaa", 0, b"aa", 2)]
    #[case("", 0, b"asdf", 0)]
    fn count(
        #[case] haystack: &str,
        #[case] start: usize,
        #[case] needle: &[u8],
        #[case] expected: usize,
    ) {
        assert_eq!(SString::from(haystack).count(start, needle), expected);
    }

    #[test]
    fn memrchr_inclusive_bound() {
        let buf = b"asdfasdf";
        assert_eq!(memrchr(buf, b'f', buf.len()), Some(7));
        assert_eq!(memrchr(buf, b'd', buf.len()), Some(6));
        assert_eq!(memrchr(buf, b's', buf.len()), Some(5));
        assert_eq!(memrchr(buf, b'a', buf.len()), Some(4));
        assert_eq!(memrchr(buf, b'f', buf.len() - 2), Some(3));
        assert_eq!(memrchr(buf, b'a', 0), Some(0));
        assert_eq!(memrchr(buf, b'z', NPOS), None);
        assert_eq!(memrchr(buf, b'f', NPOS), Some(7));
    }
}
