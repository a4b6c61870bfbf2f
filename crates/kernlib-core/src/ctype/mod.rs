//! Character classification and conversion.
//!
//! ASCII only; bytes at or above 0x80 are never classified as anything.
//! Whitespace follows the loader's definition (space, tab, CR, LF), which is
//! narrower than C's `isspace`.

/// Returns `true` if `c` is an alphabetic character (`[A-Za-z]`).
#[inline]
pub fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

/// Returns `true` if `c` is a decimal digit (`[0-9]`).
#[inline]
pub fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

/// Returns `true` if `c` is an alphanumeric character (`[A-Za-z0-9]`).
#[inline]
pub fn is_alnum(c: u8) -> bool {
    c.is_ascii_alphanumeric()
}

/// Returns `true` for space, tab, carriage return and newline.
#[inline]
pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

/// Returns `true` if `c` is a printable character (including space).
#[inline]
pub fn is_print(c: u8) -> bool {
    (b' '..=b'~').contains(&c)
}

/// Returns `true` if `c` is printable and not a space.
#[inline]
pub fn is_graph(c: u8) -> bool {
    (b'!'..=b'~').contains(&c)
}

/// Returns `true` if `c` is a hexadecimal digit (`[0-9A-Fa-f]`).
#[inline]
pub fn is_xdigit(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

/// Converts `c` to lowercase if it is an uppercase letter.
#[inline]
pub fn to_lower(c: u8) -> u8 {
    if c.is_ascii_uppercase() { c + 32 } else { c }
}

/// Value of `c` as a digit in bases up to 36, or `None`.
#[inline]
pub fn digit_value(c: u8) -> Option<u32> {
    match to_lower(c) {
        d @ b'0'..=b'9' => Some(u32::from(d - b'0')),
        d @ b'a'..=b'z' => Some(u32::from(d - b'a') + 10),
        _ => None,
    }
}
