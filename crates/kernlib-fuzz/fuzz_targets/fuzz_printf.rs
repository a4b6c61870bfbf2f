#![no_main]
use libfuzzer_sys::fuzz_target;

use kernlib_core::stdio::{FormatArg, sprintf, sprintf_into};

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let (word, template) = data.split_at(8);
    let mut raw = [0u8; 8];
    raw.copy_from_slice(word);
    let n = u64::from_le_bytes(raw);

    let args = [
        FormatArg::Signed(n as i64),
        FormatArg::Unsigned(n),
        FormatArg::Float(f64::from_bits(n)),
        FormatArg::Str(Some(template)),
        FormatArg::Str(None),
        FormatArg::CodePoint(n as u32),
    ];

    let full = sprintf(template, &args);
    let mut buf = [0u8; 32];
    let count = sprintf_into(&mut buf, template, &args);

    // The bounded form reports the same length and stores a NUL-terminated prefix.
    assert_eq!(count, full.len());
    let stored = count.min(buf.len() - 1);
    assert_eq!(&buf[..stored], &full[..stored]);
    assert_eq!(buf[stored], 0);
});
