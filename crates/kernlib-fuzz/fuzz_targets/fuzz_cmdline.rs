#![no_main]
use libfuzzer_sys::fuzz_target;

use kernlib_core::Error;
use kernlib_core::cmdline::{QueuedLines, TokenizerConfig, split_cmdline_with};
use kernlib_core::stdlib::env::EnvTable;

fuzz_target!(|data: &[u8]| {
    let mut parts = data.split(|&b| b == b'\n');
    let line = parts.next().unwrap_or_default();
    let mut lines: QueuedLines = parts.map(<[u8]>::to_vec).collect();
    let env: EnvTable = [("A", "x y"), ("root", "hd0")].into_iter().collect();

    let config = TokenizerConfig::with_limit(256);
    match split_cmdline_with(&config, line, &mut lines, &env) {
        Ok(argv) => {
            let packed = argv.as_packed();
            assert!(packed.len() <= 256);
            assert_eq!(packed.iter().filter(|&&b| b == 0).count(), argv.argc());
            for arg in argv.argv() {
                assert!(!arg.contains(&0));
            }
        }
        Err(
            Error::UnterminatedQuote
            | Error::UnterminatedVariable
            | Error::CapacityExceeded { .. },
        ) => {}
        Err(err) => panic!("unexpected error: {err:?}"),
    }
});
