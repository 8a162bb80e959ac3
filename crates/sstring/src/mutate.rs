//! In-place edits.
//!
//! Every mutator follows the same order: clamp indices, compute the required
//! capacity, grow (which may move the contents to a new allocation), move
//! bytes, then set the length and rewrite the terminator. Shifts that may
//! overlap go through [`raw::move_bytes`].

use crate::{
    error::AllocError,
    raw::{self, move_bytes},
    search::find_from,
    string::SString,
};

impl SString<'_> {
    /// Replaces the contents with `bytes`.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    pub fn copy(&mut self, bytes: &[u8]) -> Result<(), AllocError> {
        self.ensure_capacity(bytes.len())?;
        self.raw_mut()[..bytes.len()].copy_from_slice(bytes);
        self.set_len_terminated(bytes.len());
        Ok(())
    }

    /// Appends `bytes`.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    pub fn concat(&mut self, bytes: &[u8]) -> Result<(), AllocError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let len = self.len();
        let new_len = raw::checked_add(len, bytes.len())?;
        self.ensure_capacity(new_len)?;
        self.raw_mut()[len..new_len].copy_from_slice(bytes);
        self.set_len_terminated(new_len);
        Ok(())
    }

    /// Prepends `bytes`.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    pub fn left_concat(&mut self, bytes: &[u8]) -> Result<(), AllocError> {
        self.insert(0, bytes)
    }

    /// Inserts `bytes` before `index`, clamped to the length.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    pub fn insert(&mut self, index: usize, bytes: &[u8]) -> Result<(), AllocError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let len = self.len();
        let index = index.min(len);
        let new_len = raw::checked_add(len, bytes.len())?;
        self.ensure_capacity(new_len)?;
        let buf = self.raw_mut();
        move_bytes(buf, index..len, index + bytes.len());
        buf[index..index + bytes.len()].copy_from_slice(bytes);
        self.set_len_terminated(new_len);
        Ok(())
    }

    /// Overwrites from `index` (clamped to the length). The length only grows
    /// if the write runs past the current end.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    pub fn overlay(&mut self, index: usize, bytes: &[u8]) -> Result<(), AllocError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let len = self.len();
        let index = index.min(len);
        let end = raw::checked_add(index, bytes.len())?;
        self.ensure_capacity(end)?;
        self.raw_mut()[index..end].copy_from_slice(bytes);
        if end > len {
            self.set_len_terminated(end);
        }
        Ok(())
    }

    /// Removes every non-overlapping occurrence of `needle` at or after
    /// `start`.
    pub fn remove(&mut self, start: usize, needle: &[u8]) {
        if needle.is_empty() || start >= self.len() {
            return;
        }
        self.replace_shrinking(start, needle, b"");
    }

    /// Removes `[start, end)`; `end` is clamped to the length.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        let len = self.len();
        let end = end.min(len);
        if start >= end {
            return;
        }
        move_bytes(self.raw_mut(), end..len, start);
        self.set_len_terminated(len - (end - start));
    }

    /// Replaces every non-overlapping occurrence of `needle` at or after
    /// `start` with `with`.
    ///
    /// Shrinking replacements run as a single compaction pass. Growing ones
    /// count the matches first, grow once, shift the tail by the total
    /// growth, then fill the replacements left to right.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    pub fn replace(&mut self, start: usize, needle: &[u8], with: &[u8]) -> Result<(), AllocError> {
        if needle.is_empty() {
            return Ok(());
        }
        if with.is_empty() {
            self.remove(start, needle);
            return Ok(());
        }
        if start >= self.len() {
            return Ok(());
        }
        if with.len() <= needle.len() {
            self.replace_shrinking(start, needle, with);
            Ok(())
        } else {
            self.replace_growing(start, needle, with)
        }
    }

    /// Single pass with a write cursor (`to`) trailing a read cursor
    /// (`from`). Bytes between matches are moved down to `to` and the
    /// replacement is written after them.
    fn replace_shrinking(&mut self, start: usize, needle: &[u8], with: &[u8]) {
        debug_assert!(with.len() <= needle.len());
        let len = self.len();
        let buf = self.raw_mut();
        let Some(first) = find_from(&buf[..len], start, needle) else {
            return;
        };

        let mut to = first;
        let mut from = first;
        while let Some(at) = find_from(&buf[..len], from, needle) {
            move_bytes(buf, from..at, to);
            to += at - from;
            buf[to..to + with.len()].copy_from_slice(with);
            to += with.len();
            from = at + needle.len();
        }
        move_bytes(buf, from..len, to);
        let new_len = to + (len - from);
        self.set_len_terminated(new_len);
    }

    fn replace_growing(&mut self, start: usize, needle: &[u8], with: &[u8]) -> Result<(), AllocError> {
        debug_assert!(with.len() > needle.len());
        let Some(first) = self.find(start, needle) else {
            return Ok(());
        };
        let count = self.count(first + needle.len(), needle) + 1;
        let Some(growth) = (with.len() - needle.len()).checked_mul(count) else {
            return raw::capacity_overflow();
        };
        let len = self.len();
        let new_len = raw::checked_add(len, growth)?;
        self.ensure_capacity(new_len)?;

        let buf = self.raw_mut();
        let tail = first + needle.len();
        move_bytes(buf, tail..len, tail + growth);
        buf[first..first + with.len()].copy_from_slice(with);

        // `to` never passes `from`: the gap between them shrinks by the
        // per-match growth and closes on the last match.
        let mut to = first + with.len();
        let mut from = tail + growth;
        for _ in 1..count {
            let Some(at) = find_from(&buf[..new_len], from, needle) else {
                break;
            };
            move_bytes(buf, from..at, to);
            to += at - from;
            buf[to..to + with.len()].copy_from_slice(with);
            to += with.len();
            from = at + needle.len();
        }
        debug_assert_eq!(to, from);
        self.set_len_terminated(new_len);
        Ok(())
    }

    /// Replaces `[start, end)` with `bytes`. `end` is clamped to the length
    /// and `start` to `end`.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    pub fn replace_range(&mut self, start: usize, end: usize, bytes: &[u8]) -> Result<(), AllocError> {
        let len = self.len();
        let end = end.min(len);
        let start = start.min(end);
        let removed = end - start;
        let new_len = raw::checked_add(len - removed, bytes.len())?;
        if bytes.len() > removed {
            self.ensure_capacity(new_len)?;
        }
        let buf = self.raw_mut();
        if removed != bytes.len() {
            move_bytes(buf, end..len, start + bytes.len());
        }
        buf[start..start + bytes.len()].copy_from_slice(bytes);
        self.set_len_terminated(new_len);
        Ok(())
    }

    /// Strips bytes found in `charset` from both ends. An empty charset is a
    /// no-op.
    pub fn trim(&mut self, charset: &[u8]) {
        if charset.is_empty() {
            return;
        }
        self.trim_by(0, usize::MAX, |b| charset.contains(&b));
    }

    /// Strips bytes found in `charset` from both ends of `[start, end)`,
    /// closing the gap left behind. `end` is clamped to the length and
    /// `start` to `end`.
    ///
    /// ```rust
    /// use sstring::SString;
    ///
    /// let mut s = SString::from("asdfasdfasdf");
    /// s.trim_range(0, 10, b"as");
    /// assert_eq!(s, "dfasdfdf");
    /// ```
    pub fn trim_range(&mut self, start: usize, end: usize, charset: &[u8]) {
        if charset.is_empty() {
            return;
        }
        self.trim_by(start, end, |b| charset.contains(&b));
    }

    pub(crate) fn trim_by(&mut self, start: usize, end: usize, strip: impl Fn(u8) -> bool) {
        let len = self.len();
        let range_end = end.min(len);
        let range_start = start.min(range_end);
        if range_start == range_end {
            return;
        }

        let bytes = self.as_bytes();
        let mut keep_start = range_start;
        let mut keep_end = range_end;
        while keep_start < keep_end && strip(bytes[keep_start]) {
            keep_start += 1;
        }
        while keep_start < keep_end && strip(bytes[keep_end - 1]) {
            keep_end -= 1;
        }
        if keep_start == range_start && keep_end == range_end {
            return;
        }

        let kept = keep_end - keep_start;
        let buf = self.raw_mut();
        move_bytes(buf, keep_start..keep_end, range_start);
        move_bytes(buf, range_end..len, range_start + kept);
        self.set_len_terminated(len - (range_end - range_start - kept));
    }

    /// Reverses the bytes in place.
    pub fn reverse(&mut self) {
        self.as_mut_bytes().reverse();
    }

    /// Shortens to `index` bytes. Never grows or reallocates.
    pub fn truncate(&mut self, index: usize) {
        if index < self.len() {
            self.set_len_terminated(index);
        }
    }

    /// Sets the length to zero. The capacity is kept.
    pub fn clear(&mut self) {
        self.set_len_terminated(0);
    }
}
