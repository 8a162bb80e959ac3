//! Formatted writes on top of `concat`.

use core::fmt::{self, Write};

use crate::{
    error::{AllocError, FormatError},
    string::SString,
};

/// Forwards `core::fmt` output to a buffer and remembers why a write failed.
struct Appender<'s, 'a> {
    target: &'s mut SString<'a>,
    alloc_error: Option<AllocError>,
}

impl Write for Appender<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.target.concat(s.as_bytes()).map_err(|err| {
            self.alloc_error = Some(err);
            fmt::Error
        })
    }
}

impl Write for SString<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.concat(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

const U64_DIGITS: usize = 20;

/// Writes the decimal digits of `value` right-aligned into `buf`, returning
/// the index of the first digit.
fn decimal(mut value: u64, buf: &mut [u8; U64_DIGITS + 1]) -> usize {
    let mut at = buf.len();
    loop {
        at -= 1;
        buf[at] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            return at;
        }
    }
}

impl SString<'_> {
    /// Appends formatted text.
    ///
    /// # Errors
    ///
    /// [`FormatError::Alloc`] if growing fails, [`FormatError::Formatter`] if
    /// a formatting impl reports an error. Either way the previous contents
    /// are restored.
    ///
    /// ```rust
    /// use sstring::SString;
    ///
    /// let mut s = SString::from("x = ");
    /// s.cat_fmt(format_args!("{:>4}", 42)).unwrap();
    /// assert_eq!(s, "x =   42");
    /// ```
    pub fn cat_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), FormatError> {
        let mark = self.len();
        let mut appender = Appender {
            target: self,
            alloc_error: None,
        };
        match fmt::write(&mut appender, args) {
            Ok(()) => Ok(()),
            Err(fmt::Error) => {
                let err = appender
                    .alloc_error
                    .map_or(FormatError::Formatter, FormatError::Alloc);
                self.truncate(mark);
                Err(err)
            }
        }
    }

    /// Replaces the contents with formatted text.
    ///
    /// # Errors
    ///
    /// As [`SString::cat_fmt`], except the buffer is left empty on failure.
    pub fn copy_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), FormatError> {
        self.clear();
        self.cat_fmt(args)
    }

    /// Appends the decimal form of `value`.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    pub fn cat_i64(&mut self, value: i64) -> Result<(), AllocError> {
        let mut buf = [0u8; U64_DIGITS + 1];
        let mut at = decimal(value.unsigned_abs(), &mut buf);
        if value < 0 {
            at -= 1;
            buf[at] = b'-';
        }
        self.concat(&buf[at..])
    }

    /// Appends the decimal form of `value`.
    ///
    /// # Errors
    ///
    /// [`AllocError`] if growing fails; the buffer is left unchanged.
    pub fn cat_u64(&mut self, value: u64) -> Result<(), AllocError> {
        let mut buf = [0u8; U64_DIGITS + 1];
        let at = decimal(value, &mut buf);
        self.concat(&buf[at..])
    }
}

#[cfg(test)]
mod tests {
    use core::fmt::{self, Write as _};

    use rstest::rstest;

    use crate::{FormatError, SString};

    struct Failing;

    impl fmt::Display for Failing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("partial")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn copy_fmt() {
        let mut s = SString::new(0);
        s.copy_fmt(format_args!("{}", "asdf")).unwrap();
        assert_eq!(s, "asdf");
        s.check_invariants();

        let mut s = SString::from("old");
        assert_eq!(s.copy_fmt(format_args!("{}", Failing)), Err(FormatError::Formatter));
        assert!(s.is_empty());
        s.check_invariants();
    }

    #[test]
    fn cat_fmt() {
        let mut s = SString::new(0);
        s.cat_fmt(format_args!("{}", "hello world")).unwrap();
        s.cat_fmt(format_args!("{}", "hello world")).unwrap();
        assert_eq!(s, "hello worldhello world");

        assert_eq!(s.cat_fmt(format_args!("{}", Failing)), Err(FormatError::Formatter));
        assert_eq!(s, "hello worldhello world");
        s.check_invariants();
    }

    #[test]
    fn write_macro() {
        let mut s = SString::empty();
        write!(s, "{}-{:02x}", 7, 255).unwrap();
        assert_eq!(s, "7-ff");
    }

    #[rstest]
    #[case(0, "0")]
    #[case(1, "1")]
    #[case(-1, "-1")]
    #[case(i64::MAX, "9223372036854775807")]
    #[case(i64::MIN, "-9223372036854775808")]
    fn cat_i64(#[case] value: i64, #[case] expected: &str) {
        let mut s = SString::empty();
        s.cat_i64(value).unwrap();
        assert_eq!(s, expected);
    }

    #[rstest]
    #[case(0, "0")]
    #[case(1, "1")]
    #[case(u64::MAX, "18446744073709551615")]
    fn cat_u64(#[case] value: u64, #[case] expected: &str) {
        let mut s = SString::empty();
        s.cat_u64(value).unwrap();
        assert_eq!(s, expected);
    }

    #[test]
    fn cat_integers_append() {
        let mut s = SString::from("n=");
        s.cat_i64(-12).unwrap();
        s.concat(b",").unwrap();
        s.cat_u64(34).unwrap();
        assert_eq!(s, "n=-12,34");
        s.check_invariants();
    }
}
