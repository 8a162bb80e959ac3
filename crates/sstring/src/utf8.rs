//! Minimal UTF-8 codec.
//!
//! The top-level functions are strict (RFC 3629): at most four bytes and
//! only valid code points. [`legacy`] keeps the RFC 2279 1 to 7 byte forms
//! that can carry any `u32`.

/// Longest sequence either mode produces.
pub const SEQ_MAX: usize = 7;

/// `true` outside the surrogate range and at or below `0x10FFFF`.
#[inline]
#[must_use]
pub const fn is_valid_code_point(c: u32) -> bool {
    c < 0xD800 || (c > 0xDFFF && c <= 0x10_FFFF)
}

/// Bytes needed to encode `c`, derived from its most significant bit. Any
/// `u32` is accepted, so values past the Unicode ceiling report the legacy
/// 5 to 7 byte lengths.
#[inline]
#[must_use]
pub const fn encoded_len(c: u32) -> usize {
    if c < 0x80 {
        1
    } else {
        let bits = (u32::BITS - c.leading_zeros()) as usize;
        (bits + 3) / 5
    }
}

/// Encoded length of a valid code point, `0` for anything else.
#[must_use]
pub const fn code_point_len(c: u32) -> usize {
    if is_valid_code_point(c) { encoded_len(c) } else { 0 }
}

/// Total sequence length announced by a lead byte: `0` for continuation
/// bytes and for leads of five or more bytes.
#[must_use]
pub const fn sequence_len(lead: u8) -> usize {
    match legacy::sequence_len(lead) {
        n @ 1..=4 => n,
        _ => 0,
    }
}

/// Encodes `c` into `out`, returning the number of bytes written.
///
/// Returns `0` for invalid code points or when `out` is too short.
///
/// ```rust
/// use sstring::utf8;
///
/// let mut buf = [0u8; 4];
/// assert_eq!(utf8::encode(0x10FFFF, &mut buf), 4);
/// assert_eq!(buf, *b"\xF4\x8F\xBF\xBF");
/// assert_eq!(utf8::encode(0xD800, &mut buf), 0);
/// ```
#[must_use]
pub fn encode(c: u32, out: &mut [u8]) -> usize {
    if c >= 0x80 && !is_valid_code_point(c) {
        return 0;
    }
    legacy::encode(c, out)
}

/// Decodes one strict sequence from the front of `seq`.
///
/// Returns the code point and the bytes consumed; `(0, 0)` if the lead byte
/// is invalid, a continuation byte is malformed, or `seq` is cut short.
#[must_use]
pub fn decode(seq: &[u8]) -> (u32, usize) {
    match seq.first() {
        Some(&lead) if sequence_len(lead) != 0 => legacy::decode(seq),
        _ => (0, 0),
    }
}

/// Pre-RFC 3629 sequences of up to seven bytes.
///
/// These do not reject surrogates or values past `0x10FFFF`; they exist to
/// read and write data produced by older encoders.
pub mod legacy {
    pub use super::encoded_len;

    const CONTINUATION_MASK: u8 = 0xC0;
    const CONTINUATION_TAG: u8 = 0x80;

    #[inline]
    const fn is_continuation(b: u8) -> bool {
        b & CONTINUATION_MASK == CONTINUATION_TAG
    }

    /// Sequence length from the run of high set bits in `lead`: `1` for
    /// ASCII, `2..=7` for lead bytes, `0` for continuation bytes and `0xFF`.
    #[must_use]
    pub const fn sequence_len(lead: u8) -> usize {
        if lead < 0x80 {
            return 1;
        }
        if is_continuation(lead) || lead == 0xFF {
            return 0;
        }
        lead.leading_ones() as usize
    }

    /// Encodes any `u32`, returning the byte count or `0` if `out` is too
    /// short.
    ///
    /// ```rust
    /// use sstring::utf8::legacy;
    ///
    /// let mut buf = [0u8; 7];
    /// assert_eq!(legacy::encode(0xFFFF_FFFF, &mut buf), 7);
    /// assert_eq!(buf, *b"\xFE\x83\xBF\xBF\xBF\xBF\xBF");
    /// ```
    #[must_use]
    pub fn encode(c: u32, out: &mut [u8]) -> usize {
        let len = encoded_len(c);
        let Some(out) = out.get_mut(..len) else {
            return 0;
        };
        if len == 1 {
            out[0] = c as u8;
            return 1;
        }
        let mut rest = c;
        for byte in out[1..].iter_mut().rev() {
            *byte = CONTINUATION_TAG | (rest & 0x3F) as u8;
            rest >>= 6;
        }
        // `len` high bits set, then a zero, then whatever payload is left.
        let tag = !(0xFFu8 >> len);
        out[0] = tag | rest as u8;
        len
    }

    /// Decodes one sequence of up to seven bytes from the front of `seq`.
    ///
    /// Returns `(0, 0)` on an invalid lead byte, a malformed continuation
    /// byte, a cut-short sequence, or a payload wider than 32 bits.
    #[must_use]
    pub fn decode(seq: &[u8]) -> (u32, usize) {
        let Some(&lead) = seq.first() else {
            return (0, 0);
        };
        let len = sequence_len(lead);
        if len == 0 {
            return (0, 0);
        }
        if len == 1 {
            return (u32::from(lead), 1);
        }
        let Some(tail) = seq.get(1..len) else {
            return (0, 0);
        };
        let mut c = u64::from(lead & (0x7F >> len));
        for &b in tail {
            if !is_continuation(b) {
                return (0, 0);
            }
            c = (c << 6) | u64::from(b & 0x3F);
        }
        match u32::try_from(c) {
            Ok(c) => (c, len),
            Err(_) => (0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, true)]
    #[case(0xD7FF, true)]
    #[case(0xD800, false)]
    #[case(0xDFFE, false)]
    #[case(0xDFFF, false)]
    #[case(0xE000, true)]
    #[case(0x10_FFFF, true)]
    #[case(0x11_0000, false)]
    #[case(u32::MAX, false)]
    fn validity(#[case] c: u32, #[case] valid: bool) {
        assert_eq!(is_valid_code_point(c), valid);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(127, 1)]
    #[case(128, 2)]
    #[case(0x7FF, 2)]
    #[case(0x800, 3)]
    #[case(0xFFFF, 3)]
    #[case(0x1_0000, 4)]
    #[case(0x10_FFFF, 4)]
    #[case(0x1F_FFFF, 0)]
    #[case(0x20_0000, 0)]
    #[case(0x3FF_FFFF, 0)]
    #[case(0x400_0000, 0)]
    #[case(0x7FFF_FFFF, 0)]
    #[case(u32::MAX, 0)]
    fn strict_lengths(#[case] c: u32, #[case] len: usize) {
        assert_eq!(code_point_len(c), len);
    }

    #[rstest]
    #[case(0x1F_FFFF, 4)]
    #[case(0x20_0000, 5)]
    #[case(0x3FF_FFFF, 5)]
    #[case(0x400_0000, 6)]
    #[case(0x7FFF_FFFF, 6)]
    #[case(0x8000_0000, 7)]
    #[case(u32::MAX, 7)]
    fn legacy_lengths(#[case] c: u32, #[case] len: usize) {
        assert_eq!(encoded_len(c), len);
    }

    #[rstest]
    #[case(0x00, 1, 1)]
    #[case(0x7F, 1, 1)]
    #[case(0xC0, 2, 2)]
    #[case(0xE0, 3, 3)]
    #[case(0xF0, 4, 4)]
    #[case(0x80, 0, 0)]
    #[case(0xBF, 0, 0)]
    #[case(0xF8, 0, 5)]
    #[case(0xFC, 0, 6)]
    #[case(0xFE, 0, 7)]
    #[case(0xFF, 0, 0)]
    fn lead_bytes(#[case] lead: u8, #[case] strict: usize, #[case] old: usize) {
        assert_eq!(sequence_len(lead), strict);
        assert_eq!(legacy::sequence_len(lead), old);
    }

    #[rstest]
    #[case(0x0000_0000, b"\x00")]
    #[case(0x0000_007F, b"\x7F")]
    #[case(0x0000_0080, b"\xC2\x80")]
    #[case(0x0000_07FF, b"\xDF\xBF")]
    #[case(0x0000_0800, b"\xE0\xA0\x80")]
    #[case(0x0000_FFFF, b"\xEF\xBF\xBF")]
    #[case(0x0001_0000, b"\xF0\x90\x80\x80")]
    #[case(0x0010_FFFF, b"\xF4\x8F\xBF\xBF")]
    fn strict_round_trip(#[case] c: u32, #[case] seq: &[u8]) {
        let mut buf = [0u8; SEQ_MAX];
        let n = encode(c, &mut buf);
        assert_eq!(n, code_point_len(c));
        assert_eq!(&buf[..n], seq);
        assert_eq!(decode(seq), (c, seq.len()));
    }

    #[rstest]
    #[case(0x0020_0000, b"\xF8\x88\x80\x80\x80")]
    #[case(0x03FF_FFFF, b"\xFB\xBF\xBF\xBF\xBF")]
    #[case(0x0400_0000, b"\xFC\x84\x80\x80\x80\x80")]
    #[case(0x7FFF_FFFF, b"\xFD\xBF\xBF\xBF\xBF\xBF")]
    #[case(0x8000_0000, b"\xFE\x82\x80\x80\x80\x80\x80")]
    fn legacy_round_trip(#[case] c: u32, #[case] seq: &[u8]) {
        let mut buf = [0u8; SEQ_MAX];
        let n = legacy::encode(c, &mut buf);
        assert_eq!(&buf[..n], seq);
        assert_eq!(legacy::decode(seq), (c, seq.len()));
        assert_eq!(decode(seq), (0, 0));
        assert_eq!(encode(c, &mut buf), 0);
    }

    #[rstest]
    #[case(b"\xC2")]
    #[case(b"\xC2\x00")]
    #[case(b"\xE0\xA0\x00")]
    #[case(b"\xE0\x00\x80")]
    #[case(b"\xF0\x90\x80\xC0")]
    #[case(b"\x80\x80")]
    #[case(b"")]
    fn malformed(#[case] seq: &[u8]) {
        assert_eq!(decode(seq), (0, 0));
    }

    #[test]
    fn legacy_rejects_wide_payload() {
        assert_eq!(legacy::decode(b"\xFE\xBF\xBF\xBF\xBF\xBF\xBF"), (0, 0));
    }

    #[test]
    fn short_output() {
        let mut buf = [0u8; 2];
        assert_eq!(encode(0x800, &mut buf), 0);
        assert_eq!(encode(0x7F, &mut buf[..1]), 1);
    }
}
