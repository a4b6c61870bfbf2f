//! C-string operations: strlen, strcmp, strncmp, strchr, strrchr, strcpy,
//! stpcpy, strncpy, strcat, strdup, strndup.
//!
//! Strings are `&[u8]` slices where a NUL byte (`0x00`) marks the logical
//! end. A slice without a NUL is treated as if it were followed by one.

use crate::errno::Error;

/// Returns the length of a NUL-terminated byte string (not counting the NUL).
pub fn strlen(s: &[u8]) -> usize {
    s.iter().position(|&b| b == 0).unwrap_or(s.len())
}

fn byte_at(s: &[u8], i: usize) -> u8 {
    s.get(i).copied().unwrap_or(0)
}

/// Compares two NUL-terminated byte strings lexicographically.
///
/// Returns the difference of the first mismatching bytes, or zero.
pub fn strcmp(s1: &[u8], s2: &[u8]) -> i32 {
    let mut i = 0;
    loop {
        let a = byte_at(s1, i);
        let b = byte_at(s2, i);
        if a != b || a == 0 {
            return i32::from(a) - i32::from(b);
        }
        i += 1;
    }
}

/// Compares at most `n` bytes of two NUL-terminated byte strings.
pub fn strncmp(s1: &[u8], s2: &[u8], n: usize) -> i32 {
    for i in 0..n {
        let a = byte_at(s1, i);
        let b = byte_at(s2, i);
        if a != b || a == 0 {
            return i32::from(a) - i32::from(b);
        }
    }
    0
}

/// Index of the first `c` in the string, or `None`.
///
/// Searching for NUL finds nothing; the terminator is not part of the string.
pub fn strchr(s: &[u8], c: u8) -> Option<usize> {
    s[..strlen(s)].iter().position(|&b| b == c)
}

/// Index of the last `c` in the string, or `None`.
pub fn strrchr(s: &[u8], c: u8) -> Option<usize> {
    s[..strlen(s)].iter().rposition(|&b| b == c)
}

/// Copies `src` (up to its NUL) into `dest` and terminates it.
///
/// Returns the number of bytes written including the NUL.
///
/// # Panics
///
/// Panics if `dest` cannot hold the string plus NUL.
pub fn strcpy(dest: &mut [u8], src: &[u8]) -> usize {
    stpcpy(dest, src) + 1
}

/// Like [`strcpy`], but returns the index of the NUL written into `dest`.
///
/// # Panics
///
/// Panics if `dest` cannot hold the string plus NUL.
pub fn stpcpy(dest: &mut [u8], src: &[u8]) -> usize {
    let src_len = strlen(src);
    assert!(
        dest.len() > src_len,
        "stpcpy: destination buffer too small ({} bytes for {} byte string + NUL)",
        dest.len(),
        src_len
    );
    dest[..src_len].copy_from_slice(&src[..src_len]);
    dest[src_len] = 0;
    src_len
}

/// Copies at most `n` bytes of `src` into `dest`, NUL-padding the rest.
///
/// If `src` is `n` bytes or longer, `dest` is not terminated. Returns
/// `min(n, dest.len())`.
pub fn strncpy(dest: &mut [u8], src: &[u8], n: usize) -> usize {
    let count = n.min(dest.len());
    let copy_len = strlen(src).min(count);
    dest[..copy_len].copy_from_slice(&src[..copy_len]);
    dest[copy_len..count].fill(0);
    count
}

/// Appends `src` to the NUL-terminated string in `dest`.
///
/// Returns the length of the result (not counting the NUL).
///
/// # Panics
///
/// Panics if `dest` is too small.
pub fn strcat(dest: &mut [u8], src: &[u8]) -> usize {
    let dest_len = strlen(dest);
    dest_len + stpcpy(&mut dest[dest_len..], src)
}

/// Duplicates a string into a fresh NUL-terminated allocation.
pub fn strdup(s: &[u8]) -> Result<Vec<u8>, Error> {
    strndup(s, usize::MAX)
}

/// Duplicates at most `n` bytes of a string into a fresh NUL-terminated
/// allocation.
pub fn strndup(s: &[u8], n: usize) -> Result<Vec<u8>, Error> {
    let len = strlen(s).min(n);
    let mut out = Vec::new();
    out.try_reserve_exact(len + 1)?;
    out.extend_from_slice(&s[..len]);
    out.push(0);
    Ok(out)
}
