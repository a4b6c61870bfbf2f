//! Formatted output engine.
//!
//! Renders a template plus a slice of typed arguments into a [`Sink`]. The
//! specifier grammar is small:
//!
//! ```text
//! %[-][width][.precision]conversion
//! ```
//!
//! - `-` pads on the right (left alignment); it always pads with spaces.
//! - `width` is decimal; a leading `0` selects zero fill.
//! - `precision` is decimal, defaults to 3 and only affects `f`.
//! - `conversion` is one of `p x u d c f C s`. Any other byte is emitted
//!   literally, so `%%` produces `%`.
//!
//! The engine never rejects a template. Missing arguments read as zero (or
//! null for `s`); numeric arguments coerce between each other.
//!
//! Design invariant: all formatting is bounded. Padding from a single
//! specifier is capped at [`MAX_PAD`] bytes and every numeric rendering fits
//! a fixed scratch buffer.

use super::sink::{BufferSink, DeviceSink, OutputDevice, Sink};
use crate::string::strlen;

/// Precision used by `f` when the specifier gives none.
pub const DEFAULT_PRECISION: usize = 3;

/// Largest honoured `f` precision; 10^18 is the largest power of ten in `u64`.
pub const MAX_PRECISION: usize = 18;

/// Cap on fill bytes emitted for one specifier.
pub const MAX_PAD: usize = 4096;

// ---------------------------------------------------------------------------
// Format spec types
// ---------------------------------------------------------------------------

/// Flags parsed from a format directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub zero_pad: bool,     // leading '0' in the width
}

/// A parsed format specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: usize,
    pub precision: usize,
    pub conversion: u8,
}

impl FormatSpec {
    fn fill(&self) -> u8 {
        if self.flags.zero_pad { b'0' } else { b' ' }
    }

    fn without_zero_pad(&self) -> Self {
        let mut spec = *self;
        spec.flags.zero_pad = false;
        spec
    }

    /// Whether this conversion consumes an argument.
    #[must_use]
    pub fn takes_arg(&self) -> bool {
        matches!(
            self.conversion,
            b'p' | b'x' | b'u' | b'd' | b'c' | b'f' | b'C' | b's'
        )
    }
}

// ---------------------------------------------------------------------------
// Format argument types
// ---------------------------------------------------------------------------

/// Typed argument value.
///
/// The variant records what the caller passed; the consuming specifier
/// decides how it is read (see the `as_*` coercions).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatArg<'a> {
    Signed(i64),
    Unsigned(u64),
    Pointer(usize),
    Char(u8),
    Float(f64),
    CodePoint(u32),
    /// A byte string; `None` is a null string pointer.
    Str(Option<&'a [u8]>),
}

/// What an absent argument reads as.
const MISSING: FormatArg<'static> = FormatArg::Unsigned(0);

impl<'a> FormatArg<'a> {
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        match *self {
            Self::Signed(v) => v as u64,
            Self::Unsigned(v) => v,
            Self::Pointer(p) => p as u64,
            Self::Char(c) => u64::from(c),
            Self::Float(f) => f as u64,
            Self::CodePoint(c) => u64::from(c),
            Self::Str(_) => 0,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match *self {
            Self::Signed(v) => v,
            Self::Unsigned(v) => v as i64,
            Self::Pointer(p) => p as i64,
            Self::Char(c) => i64::from(c),
            Self::Float(f) => f as i64,
            Self::CodePoint(c) => i64::from(c),
            Self::Str(_) => 0,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Signed(v) => v as f64,
            Self::Unsigned(v) => v as f64,
            Self::Pointer(p) => p as f64,
            Self::Char(c) => f64::from(c),
            Self::Float(f) => f,
            Self::CodePoint(c) => f64::from(c),
            Self::Str(_) => 0.0,
        }
    }

    /// The argument as a string; every non-string variant reads as null.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a [u8]> {
        match *self {
            Self::Str(s) => s,
            _ => None,
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for FormatArg<'_> {
                fn from(v: $ty) -> Self {
                    Self::$variant(v as _)
                }
            }
        )*
    };
}

impl_from_int!(Signed: i8, i16, i32, i64, isize);
impl_from_int!(Unsigned: u16, u32, u64, usize);

impl From<u8> for FormatArg<'_> {
    fn from(c: u8) -> Self {
        Self::Char(c)
    }
}

impl From<char> for FormatArg<'_> {
    fn from(c: char) -> Self {
        Self::CodePoint(u32::from(c))
    }
}

impl From<f32> for FormatArg<'_> {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<f64> for FormatArg<'_> {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl<T> From<*const T> for FormatArg<'_> {
    fn from(p: *const T) -> Self {
        Self::Pointer(p as usize)
    }
}

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Self::Str(Some(s))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for FormatArg<'a> {
    fn from(s: &'a [u8; N]) -> Self {
        Self::Str(Some(s.as_slice()))
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(Some(s.as_bytes()))
    }
}

impl<'a> From<Option<&'a str>> for FormatArg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Self::Str(s.map(str::as_bytes))
    }
}

impl<'a> From<Option<&'a [u8]>> for FormatArg<'a> {
    fn from(s: Option<&'a [u8]>) -> Self {
        Self::Str(s)
    }
}

// ---------------------------------------------------------------------------
// Segment: parsed pieces of a template
// ---------------------------------------------------------------------------

/// A segment of a parsed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSegment<'a> {
    /// Literal bytes to emit verbatim.
    Literal(&'a [u8]),
    /// A `%` directive.
    Spec(FormatSpec),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single specifier starting after the `%`.
///
/// Returns `(spec, bytes_consumed)`, or `None` if the template ends before
/// the conversion byte.
pub fn parse_format_spec(fmt: &[u8]) -> Option<(FormatSpec, usize)> {
    let len = fmt.len();
    let mut pos = 0;
    let mut flags = FormatFlags::default();

    if pos < len && fmt[pos] == b'-' {
        flags.left_justify = true;
        pos += 1;
    }

    let start = pos;
    while pos < len && fmt[pos].is_ascii_digit() {
        pos += 1;
    }
    let width = parse_decimal(&fmt[start..pos]);
    if pos > start && fmt[start] == b'0' && !flags.left_justify {
        flags.zero_pad = true;
    }

    let mut precision = DEFAULT_PRECISION;
    if pos < len && fmt[pos] == b'.' {
        pos += 1;
        let start = pos;
        while pos < len && fmt[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos > start {
            precision = parse_decimal(&fmt[start..pos]);
        }
    }

    let conversion = *fmt.get(pos)?;
    Some((
        FormatSpec {
            flags,
            width,
            precision,
            conversion,
        },
        pos + 1,
    ))
}

/// Iterate over segments of a template.
///
/// The template ends at its first NUL byte. An incomplete directive at the
/// very end (`"100%"`, `"%5"`) is yielded as a literal.
pub fn parse_format_string(fmt: &[u8]) -> Segments<'_> {
    Segments {
        fmt: &fmt[..strlen(fmt)],
        pos: 0,
    }
}

/// Iterator returned by [`parse_format_string`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    fmt: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = FormatSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let fmt = self.fmt;
        if self.pos >= fmt.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < fmt.len() && fmt[self.pos] != b'%' {
            self.pos += 1;
        }
        if self.pos > start {
            return Some(FormatSegment::Literal(&fmt[start..self.pos]));
        }
        match parse_format_spec(&fmt[self.pos + 1..]) {
            Some((spec, consumed)) => {
                self.pos += 1 + consumed;
                Some(FormatSegment::Spec(spec))
            }
            None => {
                self.pos = fmt.len();
                Some(FormatSegment::Literal(&fmt[start..]))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Formatter
// ---------------------------------------------------------------------------

/// Streaming renderer over a sink, counting every byte produced.
pub struct Formatter<'s, S: Sink + ?Sized> {
    sink: &'s mut S,
    produced: usize,
}

impl<'s, S: Sink + ?Sized> Formatter<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self { sink, produced: 0 }
    }

    /// Bytes produced so far, whether or not the sink kept them.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Renders a whole template.
    pub fn write_template(&mut self, fmt: &[u8], args: &[FormatArg<'_>]) {
        let mut args = args.iter().copied();
        for segment in parse_format_string(fmt) {
            match segment {
                FormatSegment::Literal(bytes) => self.write_bytes(bytes),
                FormatSegment::Spec(spec) if spec.takes_arg() => {
                    let arg = args.next().unwrap_or(MISSING);
                    self.write_spec(&spec, arg);
                }
                FormatSegment::Spec(spec) => self.write_byte(spec.conversion),
            }
        }
    }

    /// Renders one argument according to `spec`.
    pub fn write_spec(&mut self, spec: &FormatSpec, arg: FormatArg<'_>) {
        match spec.conversion {
            b'p' => {
                self.write_bytes(b"0x");
                self.write_uint(spec, arg.as_u64(), 16);
            }
            b'x' => self.write_uint(spec, arg.as_u64(), 16),
            b'u' => self.write_uint(spec, arg.as_u64(), 10),
            b'd' => {
                let value = arg.as_i64();
                let sign: &[u8] = if value < 0 { b"-" } else { b"" };
                let mut scratch = Scratch::new();
                scratch.push_digits(value.unsigned_abs(), 10, 1);
                self.write_field(spec, sign, scratch.as_bytes());
            }
            b'c' => self.write_byte(arg.as_u64() as u8),
            b'f' => self.write_float(spec, arg.as_f64()),
            b'C' => {
                let mut units = [0u8; 6];
                let n = encode_code_point(arg.as_u64() as u32, &mut units);
                self.write_bytes(&units[..n]);
            }
            b's' => match arg.as_str() {
                Some(s) => self.write_field(spec, b"", &s[..strlen(s)]),
                None => self.write_bytes(b"(null)"),
            },
            other => self.write_byte(other),
        }
    }

    /// Emits raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    /// Notifies the sink and returns the total produced.
    pub fn finish(self) -> usize {
        self.sink.finish(self.produced);
        self.produced
    }

    fn write_byte(&mut self, byte: u8) {
        self.sink.put(byte);
        self.produced += 1;
    }

    fn fill(&mut self, byte: u8, count: usize) {
        for _ in 0..count.min(MAX_PAD) {
            self.write_byte(byte);
        }
    }

    /// Emits `sign` + `body` padded to the spec width. Zero fill goes
    /// between sign and body.
    fn write_field(&mut self, spec: &FormatSpec, sign: &[u8], body: &[u8]) {
        let pad = spec.width.saturating_sub(sign.len() + body.len());
        if spec.flags.left_justify {
            self.write_bytes(sign);
            self.write_bytes(body);
            self.fill(b' ', pad);
        } else if spec.flags.zero_pad {
            self.write_bytes(sign);
            self.fill(b'0', pad);
            self.write_bytes(body);
        } else {
            self.fill(spec.fill(), pad);
            self.write_bytes(sign);
            self.write_bytes(body);
        }
    }

    fn write_uint(&mut self, spec: &FormatSpec, value: u64, base: u64) {
        let mut scratch = Scratch::new();
        scratch.push_digits(value, base, 1);
        self.write_field(spec, b"", scratch.as_bytes());
    }

    /// Fixed point with a truncated (not rounded) fraction.
    fn write_float(&mut self, spec: &FormatSpec, value: f64) {
        if value.is_nan() {
            return self.write_field(&spec.without_zero_pad(), b"", b"nan");
        }
        let sign: &[u8] = if value < 0.0 { b"-" } else { b"" };
        let magnitude = value.abs();
        if magnitude.is_infinite() {
            return self.write_field(&spec.without_zero_pad(), sign, b"inf");
        }

        let precision = spec.precision.min(MAX_PRECISION);
        let whole = magnitude.trunc();
        let scale = 10u64.pow(precision as u32);
        // Float error can push the scaled fraction up to `scale` itself.
        let fraction = (((magnitude - whole) * scale as f64) as u64).min(scale - 1);

        let mut scratch = Scratch::new();
        if whole < U64_LIMIT {
            scratch.push_digits(whole as u64, 10, 1);
        } else {
            scratch.push_large_integer(whole);
        }
        if precision > 0 {
            scratch.push(b'.');
            scratch.push_digits(fraction, 10, precision);
        }
        self.write_field(spec, sign, scratch.as_bytes());
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Renders `fmt` with `args` into `sink`; returns the number of bytes
/// produced.
pub fn render<S: Sink + ?Sized>(sink: &mut S, fmt: &[u8], args: &[FormatArg<'_>]) -> usize {
    let mut formatter = Formatter::new(sink);
    formatter.write_template(fmt, args);
    formatter.finish()
}

/// Renders into a caller buffer, truncating and NUL-terminating.
///
/// Returns the full length of the rendering, which exceeds
/// `buf.len() - 1` when the output was truncated.
pub fn sprintf_into(buf: &mut [u8], fmt: &[u8], args: &[FormatArg<'_>]) -> usize {
    render(&mut BufferSink::new(buf), fmt, args)
}

/// Renders into a fresh, unterminated byte vector.
#[must_use]
pub fn sprintf(fmt: &[u8], args: &[FormatArg<'_>]) -> Vec<u8> {
    let mut out = Vec::new();
    render(&mut out, fmt, args);
    out
}

/// Renders into a `String`, replacing invalid UTF-8 with U+FFFD.
#[must_use]
pub fn format_string(fmt: &str, args: &[FormatArg<'_>]) -> String {
    String::from_utf8_lossy(&sprintf(fmt.as_bytes(), args)).into_owned()
}

/// Streams the rendering to `device`, refreshing it once if anything was
/// produced.
pub fn vprintf<D: OutputDevice + ?Sized>(
    device: &mut D,
    fmt: &[u8],
    args: &[FormatArg<'_>],
) -> usize {
    render(&mut DeviceSink::new(device), fmt, args)
}

/// UTF-8 encodes `code` with the extended 1 to 6 unit scheme, which covers
/// values up to `0x7fff_ffff`. Larger values encode as `?`.
///
/// Returns the number of units written to `out`.
pub fn encode_code_point(code: u32, out: &mut [u8; 6]) -> usize {
    let (shift, lead) = match code {
        0..=0x7f => (0, 0x00),
        0x80..=0x7ff => (6, 0xc0),
        0x800..=0xffff => (12, 0xe0),
        0x1_0000..=0x1f_ffff => (18, 0xf0),
        0x20_0000..=0x3ff_ffff => (24, 0xf8),
        0x400_0000..=0x7fff_ffff => (30, 0xfc),
        _ => {
            out[0] = b'?';
            return 1;
        }
    };
    out[0] = lead | (code >> shift) as u8;
    let mut n = 1;
    let mut shift = shift;
    while shift > 0 {
        shift -= 6;
        out[n] = 0x80 | ((code >> shift) & 0x3f) as u8;
        n += 1;
    }
    n
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_decimal(digits: &[u8]) -> usize {
    let mut result = 0_usize;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add((d - b'0') as usize);
    }
    result
}

// 309 integer digits (f64::MAX) + '.' + 18 fraction digits.
const SCRATCH_LEN: usize = 330;

// 2^64: integer parts below this convert to u64 exactly.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

// Base-10^9 limbs; 35 cover 2^1024.
const LIMB_BASE: u64 = 1_000_000_000;
const LIMBS: usize = 36;

struct Scratch {
    buf: [u8; SCRATCH_LEN],
    len: usize,
}

impl Scratch {
    fn new() -> Self {
        Self {
            buf: [0; SCRATCH_LEN],
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) {
        if self.len < SCRATCH_LEN {
            self.buf[self.len] = byte;
            self.len += 1;
        }
    }

    /// Appends `value` in `base` with at least `min_digits` digits. Digits
    /// come out least significant first and the run is reversed in place.
    fn push_digits(&mut self, mut value: u64, base: u64, min_digits: usize) {
        let start = self.len;
        let mut count = 0;
        while value > 0 || count < min_digits {
            let digit = (value % base) as u8;
            self.push(if digit < 10 {
                b'0' + digit
            } else {
                b'a' + (digit - 10)
            });
            value /= base;
            count += 1;
        }
        self.buf[start..self.len].reverse();
    }

    /// Appends the exact decimal digits of an integral `whole >= 2^64`.
    fn push_large_integer(&mut self, whole: f64) {
        let bits = whole.to_bits();
        let mut shift = ((bits >> 52) & 0x7ff) as u32 - 1075;
        let mantissa = (bits & ((1 << 52) - 1)) | (1 << 52);

        let mut limbs = [0u64; LIMBS];
        limbs[0] = mantissa % LIMB_BASE;
        limbs[1] = (mantissa / LIMB_BASE) % LIMB_BASE;
        limbs[2] = mantissa / (LIMB_BASE * LIMB_BASE);
        let mut used = 3;

        while shift > 0 {
            let step = shift.min(32);
            let mut carry = 0;
            for limb in &mut limbs[..used] {
                let v = (*limb << step) + carry;
                *limb = v % LIMB_BASE;
                carry = v / LIMB_BASE;
            }
            while carry > 0 && used < LIMBS {
                limbs[used] = carry % LIMB_BASE;
                carry /= LIMB_BASE;
                used += 1;
            }
            shift -= step;
        }

        while used > 1 && limbs[used - 1] == 0 {
            used -= 1;
        }
        self.push_digits(limbs[used - 1], 10, 1);
        for &limb in limbs[..used - 1].iter().rev() {
            self.push_digits(limb, 10, 9);
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(template: &[u8], args: &[FormatArg<'_>]) -> Vec<u8> {
        sprintf(template, args)
    }

    #[test]
    fn test_parse_simple() {
        let (spec, consumed) = parse_format_spec(b"d").unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(spec.conversion, b'd');
        assert_eq!(spec.width, 0);
        assert_eq!(spec.precision, DEFAULT_PRECISION);
        assert_eq!(spec.flags, FormatFlags::default());
    }

    #[test]
    fn test_parse_width_precision() {
        let (spec, consumed) = parse_format_spec(b"10.5f").unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(spec.width, 10);
        assert_eq!(spec.precision, 5);
        assert!(!spec.flags.zero_pad);
    }

    #[test]
    fn test_parse_precision_without_width() {
        let (spec, consumed) = parse_format_spec(b".2f").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(spec.width, 0);
        assert_eq!(spec.precision, 2);
    }

    #[test]
    fn test_parse_flags() {
        let (spec, _) = parse_format_spec(b"08x").unwrap();
        assert!(spec.flags.zero_pad);
        assert_eq!(spec.width, 8);

        let (spec, _) = parse_format_spec(b"-08x").unwrap();
        assert!(spec.flags.left_justify);
        assert!(!spec.flags.zero_pad); // '-' forces space fill
    }

    #[test]
    fn test_parse_incomplete() {
        assert!(parse_format_spec(b"").is_none());
        assert!(parse_format_spec(b"-12.3").is_none());
    }

    #[test]
    fn test_parse_format_string_segments() {
        let segs: Vec<_> = parse_format_string(b"a%db%%").collect();
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[0], FormatSegment::Literal(b"a"));
        assert!(matches!(segs[1], FormatSegment::Spec(s) if s.conversion == b'd'));
        assert_eq!(segs[2], FormatSegment::Literal(b"b"));
        assert!(matches!(segs[3], FormatSegment::Spec(s) if s.conversion == b'%'));
    }

    #[test]
    fn test_segments_stop_at_nul() {
        let segs: Vec<_> = parse_format_string(b"ab\0%d").collect();
        assert_eq!(segs, vec![FormatSegment::Literal(b"ab")]);
    }

    #[test]
    fn test_signed() {
        assert_eq!(fmt(b"%d", &[42.into()]), b"42");
        assert_eq!(fmt(b"%d", &[(-7).into()]), b"-7");
        assert_eq!(fmt(b"%d", &[0.into()]), b"0");
        assert_eq!(fmt(b"%d", &[i64::MIN.into()]), b"-9223372036854775808");
    }

    #[test]
    fn test_width_and_fill() {
        assert_eq!(fmt(b"%5d", &[42.into()]), b"   42");
        assert_eq!(fmt(b"%-5d|", &[42.into()]), b"42   |");
        assert_eq!(fmt(b"%05d", &[42.into()]), b"00042");
        assert_eq!(fmt(b"%05d", &[(-42).into()]), b"-0042");
        assert_eq!(fmt(b"%-05d", &[42.into()]), b"42   ");
        assert_eq!(fmt(b"%1d", &[12345.into()]), b"12345");
    }

    #[test]
    fn test_unsigned_hex_pointer() {
        assert_eq!(fmt(b"%x", &[255u32.into()]), b"ff");
        assert_eq!(fmt(b"%08x", &[0xbeefu32.into()]), b"0000beef");
        assert_eq!(fmt(b"%u", &[u64::MAX.into()]), b"18446744073709551615");
        assert_eq!(fmt(b"%p", &[FormatArg::Pointer(0x1000)]), b"0x1000");
        assert_eq!(fmt(b"%8p", &[FormatArg::Pointer(0x1f)]), b"0x      1f");
    }

    #[test]
    fn test_negative_as_unsigned_wraps() {
        assert_eq!(fmt(b"%x", &[(-1i64).into()]), b"ffffffffffffffff");
    }

    #[test]
    fn test_char_is_never_padded() {
        assert_eq!(fmt(b"%c", &[b'A'.into()]), b"A");
        assert_eq!(fmt(b"%5c", &[b'A'.into()]), b"A");
        assert_eq!(fmt(b"%c", &[0x141u32.into()]), b"A");
    }

    #[test]
    fn test_strings() {
        assert_eq!(fmt(b"%s", &["hello".into()]), b"hello");
        assert_eq!(fmt(b"%8s", &["hi".into()]), b"      hi");
        assert_eq!(fmt(b"%-4s|", &["hi".into()]), b"hi  |");
        assert_eq!(fmt(b"[%s]", &[b"ab\0cd".into()]), b"[ab]");
    }

    #[test]
    fn test_null_string() {
        assert_eq!(fmt(b"%s", &[FormatArg::Str(None)]), b"(null)");
        assert_eq!(fmt(b"%10s", &[FormatArg::Str(None)]), b"(null)");
        assert_eq!(fmt(b"%s", &[5.into()]), b"(null)");
    }

    #[test]
    fn test_literal_fallbacks() {
        assert_eq!(fmt(b"%%", &[]), b"%");
        assert_eq!(fmt(b"100%", &[]), b"100%");
        assert_eq!(fmt(b"%q", &[]), b"q");
        assert_eq!(fmt(b"x%5", &[]), b"x%5");
        assert_eq!(fmt(b"%5%", &[]), b"%");
    }

    #[test]
    fn test_unknown_conversion_does_not_consume() {
        assert_eq!(fmt(b"%y%d", &[7.into()]), b"y7");
    }

    #[test]
    fn test_missing_args_read_as_zero() {
        assert_eq!(fmt(b"%d %x %s", &[]), b"0 0 (null)");
    }

    #[test]
    fn test_string_as_number_reads_zero() {
        assert_eq!(fmt(b"%d", &["abc".into()]), b"0");
    }

    #[test]
    fn test_float_truncates() {
        assert_eq!(fmt(b"%.2f", &[3.14159.into()]), b"3.14");
        assert_eq!(fmt(b"%f", &[2.5.into()]), b"2.500");
        assert_eq!(fmt(b"%.0f", &[7.9.into()]), b"7");
        assert_eq!(fmt(b"%.2f", &[2.999.into()]), b"2.99");
    }

    #[test]
    fn test_float_fraction_keeps_leading_zeros() {
        assert_eq!(fmt(b"%.3f", &[1.05.into()]), b"1.050");
        assert_eq!(fmt(b"%.4f", &[0.0625.into()]), b"0.0625");
    }

    #[test]
    fn test_float_fraction_is_not_rounded() {
        // 0.0012 * 10^4 is 11.999... in binary floating point.
        assert_eq!(fmt(b"%.4f", &[0.0012.into()]), b"0.0011");
    }

    #[test]
    fn test_float_integer_part_beyond_u64() {
        assert_eq!(fmt(b"%.1f", &[1e20.into()]), b"100000000000000000000.0");
        assert_eq!(
            fmt(b"%.0f", &[18_446_744_073_709_551_616.0.into()]),
            b"18446744073709551616"
        );
        assert_eq!(
            fmt(b"%.1f", &[(-1e25).into()]),
            b"-10000000000000000905969664.0"
        );
        let max = fmt(b"%.0f", &[f64::MAX.into()]);
        assert_eq!(max.len(), 309);
        assert!(max.starts_with(b"17976931348623157081"));
        assert!(max.ends_with(b"4858368"));
    }

    #[test]
    fn test_float_sign_and_width() {
        assert_eq!(fmt(b"%.1f", &[(-1.5).into()]), b"-1.5");
        assert_eq!(fmt(b"%8.2f", &[3.14159.into()]), b"    3.14");
        assert_eq!(fmt(b"%08.2f", &[(-3.14159).into()]), b"-0003.14");
        assert_eq!(fmt(b"%.1f", &[(-0.0).into()]), b"0.0");
    }

    #[test]
    fn test_float_missing_precision_digits_keep_default() {
        assert_eq!(fmt(b"%.f", &[1.5.into()]), b"1.500");
    }

    #[test]
    fn test_float_precision_clamped() {
        let out = fmt(b"%.40f", &[0.5.into()]);
        assert_eq!(out.len(), 2 + MAX_PRECISION);
        assert!(out.starts_with(b"0.5000"));
    }

    #[test]
    fn test_float_specials() {
        assert_eq!(fmt(b"%f", &[f64::NAN.into()]), b"nan");
        assert_eq!(fmt(b"%f", &[f64::INFINITY.into()]), b"inf");
        assert_eq!(fmt(b"%05f", &[f64::NEG_INFINITY.into()]), b" -inf");
    }

    #[test]
    fn test_code_points() {
        assert_eq!(fmt(b"%C", &['A'.into()]), b"A");
        assert_eq!(fmt(b"%C", &[0x20ACu32.into()]), b"\xE2\x82\xAC");
        assert_eq!(fmt(b"%C", &[0x10FFFFu32.into()]), b"\xF4\x8F\xBF\xBF");
        assert_eq!(
            fmt(b"%C", &[0x7fff_ffffu32.into()]),
            b"\xFD\xBF\xBF\xBF\xBF\xBF"
        );
        assert_eq!(fmt(b"%C", &[0x8000_0000u32.into()]), b"?");
        assert_eq!(fmt(b"%5C", &['A'.into()]), b"A");
    }

    #[test]
    fn test_encode_matches_std_for_scalar_values() {
        for c in ['a', 'é', 'Ω', '€', '😀'] {
            let mut units = [0u8; 6];
            let n = encode_code_point(u32::from(c), &mut units);
            let mut expected = [0u8; 4];
            assert_eq!(&units[..n], c.encode_utf8(&mut expected).as_bytes());
        }
    }

    #[test]
    fn test_pad_is_bounded() {
        let out = fmt(b"%99999999999999999999999d", &[1.into()]);
        assert_eq!(out.len(), MAX_PAD + 1);
    }

    #[test]
    fn test_sprintf_into_truncates_and_counts() {
        let mut buf = [0xFFu8; 4];
        assert_eq!(sprintf_into(&mut buf, b"hello", &[]), 5);
        assert_eq!(&buf, b"hel\0");

        let mut buf = [0xFFu8; 16];
        let n = sprintf_into(&mut buf, b"%s=%d", &["x".into(), 10.into()]);
        assert_eq!(n, 4);
        assert_eq!(&buf[..5], b"x=10\0");
    }

    #[test]
    fn test_format_string() {
        assert_eq!(format_string("%s:%u", &["disk".into(), 3u32.into()]), "disk:3");
    }

    #[derive(Default)]
    struct Console {
        out: Vec<u8>,
        refreshes: usize,
    }

    impl OutputDevice for Console {
        fn putchar(&mut self, byte: u8) {
            self.out.push(byte);
        }

        fn refresh(&mut self) {
            self.refreshes += 1;
        }
    }

    #[test]
    fn test_vprintf_streams_and_refreshes_once() {
        let mut console = Console::default();
        assert_eq!(vprintf(&mut console, b"%d-%d\n", &[1.into(), 2.into()]), 4);
        assert_eq!(console.out, b"1-2\n");
        assert_eq!(console.refreshes, 1);

        assert_eq!(vprintf(&mut console, b"", &[]), 0);
        assert_eq!(console.refreshes, 1);
    }
}
