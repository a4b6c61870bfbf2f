//! Process-wide limits.
//!
//! The token staging limit is read once from `KERNLIB_TOKEN_CAPACITY`:
//! - a positive numeral (decimal, `0x` hex or `0` octal): that many bytes.
//! - `unlimited` / `none`: no limit beyond available memory.
//! - unset, zero, or anything else: [`DEFAULT_TOKEN_CAPACITY`].
//!
//! The value is process-immutable once resolved. Per-call overrides go
//! through [`crate::cmdline::TokenizerConfig`].

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::stdlib::conversion::parse_ulong;

/// Environment variable consulted by [`token_capacity`].
pub const TOKEN_CAPACITY_ENV: &str = "KERNLIB_TOKEN_CAPACITY";

/// Staging bytes available to one tokenizer call unless configured otherwise.
pub const DEFAULT_TOKEN_CAPACITY: usize = 1024;

// 0 = unresolved; every resolved value is non-zero.
static CACHED_CAPACITY: AtomicUsize = AtomicUsize::new(0);

/// Parses a capacity setting. Never fails; unusable input maps to the
/// default.
#[must_use]
pub fn parse_token_capacity(raw: &str) -> usize {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("unlimited") || raw.eq_ignore_ascii_case("none") {
        return usize::MAX;
    }
    match parse_ulong(raw.as_bytes(), 0) {
        Ok((value, consumed)) if value > 0 && consumed == raw.len() => {
            usize::try_from(value).unwrap_or(usize::MAX)
        }
        _ => DEFAULT_TOKEN_CAPACITY,
    }
}

/// The process-wide token staging limit.
pub fn token_capacity() -> usize {
    let cached = CACHED_CAPACITY.load(Ordering::Relaxed);
    if cached != 0 {
        return cached;
    }
    let resolved = std::env::var(TOKEN_CAPACITY_ENV)
        .map(|raw| parse_token_capacity(&raw))
        .unwrap_or(DEFAULT_TOKEN_CAPACITY);
    // Racing resolvers read the same environment; first store wins.
    match CACHED_CAPACITY.compare_exchange(0, resolved, Ordering::Relaxed, Ordering::Relaxed) {
        Ok(_) => resolved,
        Err(existing) => existing,
    }
}
