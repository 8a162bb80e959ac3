//! C-style escape sequences: `unescape` decodes them in place, `escape`
//! produces them.
//!
//! Both directions work over the full `[0, len)` range, so embedded NULs
//! survive a round trip.

use crate::{
    error::AllocError,
    options::GrowthPolicy,
    string::SString,
    utf8,
};

/// Named single-character escapes, shared by both directions.
const NAMED: [(u8, u8); 11] = [
    (b'a', 0x07),
    (b'b', 0x08),
    (b'e', 0x1B),
    (b'f', 0x0C),
    (b'n', b'\n'),
    (b'r', b'\r'),
    (b't', b'\t'),
    (b'v', 0x0B),
    (b'\\', b'\\'),
    (b'\'', b'\''),
    (b'"', b'"'),
];

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

fn named_value(letter: u8) -> Option<u8> {
    if letter == b'?' {
        return Some(b'?');
    }
    NAMED.iter().find(|&&(l, _)| l == letter).map(|&(_, v)| v)
}

fn named_letter(byte: u8) -> Option<u8> {
    NAMED.iter().find(|&&(_, v)| v == byte).map(|&(l, _)| l)
}

#[inline]
fn hex_value(b: u8) -> Option<u32> {
    char::from(b).to_digit(16)
}

#[inline]
fn octal_value(b: u8) -> Option<u8> {
    matches!(b, b'0'..=b'7').then(|| b - b'0')
}

/// Reads up to `max` hex digits from the front of `input`.
fn read_hex(input: &[u8], max: usize) -> Option<(u32, usize)> {
    let mut value = 0u32;
    let mut used = 0;
    for &b in input.iter().take(max) {
        let Some(digit) = hex_value(b) else { break };
        value = (value << 4) | digit;
        used += 1;
    }
    (used > 0).then_some((value, used))
}

/// Reads one to three octal digits. The third digit is only taken when the
/// first is below `'4'`, which keeps the value in a byte.
fn read_octal(input: &[u8]) -> Option<(u8, usize)> {
    let first = octal_value(*input.first()?)?;
    let mut value = first;
    let mut used = 1;
    if let Some(second) = input.get(1).copied().and_then(octal_value) {
        value = (value << 3) | second;
        used = 2;
        if first < 4 {
            if let Some(third) = input.get(2).copied().and_then(octal_value) {
                value = (value << 3) | third;
                used = 3;
            }
        }
    }
    Some((value, used))
}

/// Decodes the escape sequence whose body (the bytes after the backslash)
/// starts `body`, writing the result to `out`.
///
/// Returns the bytes written and the body bytes consumed, or `None` when the
/// sequence is not recognised and must stay literal.
fn decode_escape(body: &[u8], out: &mut [u8; utf8::SEQ_MAX]) -> Option<(usize, usize)> {
    let (&letter, rest) = body.split_first()?;
    let (code_point, used) = match letter {
        b'x' => {
            let (value, used) = read_hex(rest, 2)?;
            out[0] = value as u8;
            return Some((1, used + 1));
        }
        b'u' => read_hex(rest, 4)?,
        b'U' => read_hex(rest, 8)?,
        b'0'..=b'7' => {
            let (value, used) = read_octal(body)?;
            out[0] = value;
            return Some((1, used));
        }
        _ => {
            out[0] = named_value(letter)?;
            return Some((1, 1));
        }
    };
    match utf8::encode(code_point, out) {
        0 => None,
        written => Some((written, used + 1)),
    }
}

impl SString<'_> {
    /// Decodes escape sequences in place.
    ///
    /// Recognises the named escapes (`\a \b \e \f \n \r \t \v \\ \' \" \?`),
    /// `\xH[H]`, `\uH[HHH]` and `\UH[HHHHHHH]` (encoded as UTF-8), and octal
    /// `\N[N[N]]`. Anything else, including `\u` escapes of invalid code
    /// points, is left as written. The result is never longer than the
    /// input, so this never allocates.
    ///
    /// ```rust
    /// use sstring::SString;
    ///
    /// let mut s = SString::from(r"tab\there \x41\u00e9 \z");
    /// s.unescape();
    /// assert_eq!(s, "tab\there A\u{e9} \\z");
    /// ```
    pub fn unescape(&mut self) {
        let len = self.len();
        let Some(first) = self.find(0, b"\\") else {
            return;
        };
        let buf = self.raw_mut();
        let mut to = first;
        let mut from = first;
        let mut scratch = [0u8; utf8::SEQ_MAX];

        while from < len {
            if buf[from] != b'\\' {
                buf[to] = buf[from];
                to += 1;
                from += 1;
                continue;
            }
            match decode_escape(&buf[from + 1..len], &mut scratch) {
                Some((written, used)) => {
                    buf[to..to + written].copy_from_slice(&scratch[..written]);
                    to += written;
                    from += 1 + used;
                }
                None => {
                    // Literal backslash and the byte after it, if any.
                    let n = (len - from).min(2);
                    buf.copy_within(from..from + n, to);
                    to += n;
                    from += n;
                }
            }
        }
        self.set_len_terminated(to);
    }

    /// Replaces the contents with their escaped form.
    ///
    /// The eleven named escapes are written by name, other control bytes
    /// (`0x00..=0x1F` and `0x7F`) as `\xHH`, and every other byte as is.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if the scratch buffer or the final copy cannot be
    /// allocated; the buffer is left unchanged.
    ///
    /// ```rust
    /// use sstring::SString;
    ///
    /// let mut s = SString::from_bytes(b"a\tb\0\x7F");
    /// s.escape().unwrap();
    /// assert_eq!(s, r"a\tb\x00\x7F");
    /// ```
    pub fn escape(&mut self) -> Result<(), AllocError> {
        if self.is_empty() {
            return Ok(());
        }
        let mut out = SString::empty_with(GrowthPolicy::Grow100);
        out.resize_exact(self.len().saturating_mul(2))?;

        for &b in self.as_bytes() {
            if let Some(letter) = named_letter(b) {
                out.concat(&[b'\\', letter])?;
            } else if b.is_ascii_control() {
                let hex = [
                    b'\\',
                    b'x',
                    HEX_UPPER[usize::from(b >> 4)],
                    HEX_UPPER[usize::from(b & 0x0F)],
                ];
                out.concat(&hex)?;
            } else {
                out.concat(&[b])?;
            }
        }
        self.copy(out.as_bytes())
    }
}
