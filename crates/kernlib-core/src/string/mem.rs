//! Memory operations: memmove, memset, memcmp.

use core::cmp::Ordering;

/// Copies `n` bytes inside `buf` from offset `src` to offset `dest`.
///
/// The regions may overlap. Only `min(n, room at src, room at dest)` bytes
/// are moved; the count actually moved is returned.
pub fn memmove(buf: &mut [u8], dest: usize, src: usize, n: usize) -> usize {
    let len = buf.len();
    if dest >= len || src >= len {
        return 0;
    }
    let count = n.min(len - dest).min(len - src);
    buf.copy_within(src..src + count, dest);
    count
}

/// Fills the first `n` bytes of `dest` with `value`; returns the count set.
pub fn memset(dest: &mut [u8], value: u8, n: usize) -> usize {
    let count = n.min(dest.len());
    dest[..count].fill(value);
    count
}

/// Compares the first `n` bytes of `a` and `b`.
///
/// Only `min(n, a.len(), b.len())` bytes take part in the comparison.
pub fn memcmp(a: &[u8], b: &[u8], n: usize) -> Ordering {
    let count = n.min(a.len()).min(b.len());
    a[..count].cmp(&b[..count])
}
