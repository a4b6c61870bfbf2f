//! Numeral-to-integer conversion (strtoul).

use crate::ctype::{digit_value, is_space};
use crate::errno::{self, Error};
use crate::string::strlen;

/// Parses an unsigned numeral from the front of `s`.
///
/// Leading whitespace is skipped. With `base == 0` the base is guessed: a
/// `0x` prefix selects 16, a leading `0` followed by an octal digit selects
/// 8, anything else 10. A `0x` prefix is also accepted when `base == 16`.
/// Parsing stops at the first byte that is not a digit in the base (or at
/// NUL).
///
/// Returns `(value, consumed_bytes)`.
///
/// # Errors
///
/// - [`Error::OutOfRange`] if the value does not fit in `u64`.
/// - [`Error::BadNumber`] if no digit was found or `base` is not 0 or 2..=36.
pub fn parse_ulong(s: &[u8], base: u32) -> Result<(u64, usize), Error> {
    let s = &s[..strlen(s)];
    let len = s.len();
    let mut i = 0;

    while i < len && is_space(s[i]) {
        i += 1;
    }

    let mut base = base;
    if i + 1 < len && s[i] == b'0' {
        let next = s[i + 1];
        let hex_follows = i + 2 < len && s[i + 2].is_ascii_hexdigit();
        if (next == b'x' || next == b'X') && (base == 0 || base == 16) && hex_follows {
            base = 16;
            i += 2;
        } else if base == 0 && (b'0'..=b'7').contains(&next) {
            base = 8;
        }
    }
    if base == 0 {
        base = 10;
    }
    if !(2..=36).contains(&base) {
        return Err(Error::BadNumber);
    }

    let mut acc: u64 = 0;
    let mut found = false;
    while i < len {
        let Some(digit) = digit_value(s[i]).filter(|&d| d < base) else {
            break;
        };
        found = true;
        acc = acc
            .checked_mul(u64::from(base))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(Error::OutOfRange)?;
        i += 1;
    }

    if !found {
        return Err(Error::BadNumber);
    }
    Ok((acc, i))
}

/// C-style [`parse_ulong`]: on failure records the reason in the
/// thread-local last-error cell and returns `(0, 0)`.
///
/// Zero is also a legitimate result, so callers must consult
/// [`errno::last_error`] rather than trust the value alone. The cell is not
/// cleared on success.
pub fn strtoul(s: &[u8], base: u32) -> (u64, usize) {
    match parse_ulong(s, base) {
        Ok(parsed) => parsed,
        Err(err) => {
            errno::set_last_error(err.code());
            (0, 0)
        }
    }
}
