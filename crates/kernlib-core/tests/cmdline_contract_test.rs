use kernlib_core::cmdline::{
    NoContinuation, QueuedLines, TokenizerConfig, split_cmdline, split_cmdline_with, split_line,
};
use kernlib_core::config::DEFAULT_TOKEN_CAPACITY;
use kernlib_core::errno::Error;
use kernlib_core::stdlib::env::{EnvTable, NoEnv};

fn env() -> EnvTable {
    [("prefix", "(hd0,1)/boot/pupa"), ("kernel", "vmlinuz"), ("x", "1")]
        .into_iter()
        .collect()
}

#[test]
fn split_matrix() {
    let env = env();
    let cases: &[(&[u8], &[&str])] = &[
        (b"hello \"a b\" 'c  d'", &["hello", "a b", "c  d"]),
        (b"linux $prefix/$kernel root=/dev/sda1", &[
            "linux",
            "(hd0,1)/boot/pupa/vmlinuz",
            "root=/dev/sda1",
        ]),
        (b"set x=${x}0", &["set", "x=10"]),
        (b"echo '$x' \"$x\"", &["echo", "$x", "1"]),
        (b"  \t  ", &[]),
        (b"a\\ b c", &["a b", "c"]),
        (b"echo $missing", &["echo", ""]),
    ];

    for (line, expected) in cases {
        let argv = split_line(line, &env)
            .unwrap_or_else(|err| panic!("{:?}: {err}", line.escape_ascii().to_string()));
        assert_eq!(argv.argc(), expected.len(), "{:?}", line.escape_ascii().to_string());
        assert_eq!(argv.to_strings(), *expected);
    }
}

#[test]
fn count_matches_materialized_tokens() {
    let argv = split_line(b"echo $NAME", &NoEnv).unwrap();
    assert_eq!(argv.argc(), 2);
    assert_eq!(argv.get(0), Some(&b"echo"[..]));
    assert_eq!(argv.get(1), Some(&b""[..]));
    assert_eq!(argv.as_packed(), b"echo\0\0");
    assert_eq!(argv.argv().count(), argv.argc());
}

#[test]
fn three_line_double_quote() {
    let mut lines = QueuedLines::new();
    lines.push("second ");
    lines.push("third\"");
    let argv = split_cmdline(b"menuentry \"first ", &mut lines, &NoEnv).unwrap();
    assert_eq!(argv.to_strings(), vec!["menuentry", "first second third"]);
    assert!(!argv.as_packed().contains(&b'\n'));
}

#[test]
fn exhausted_line_source_is_an_error() {
    let mut lines = QueuedLines::new();
    lines.push("still open");
    assert_eq!(
        split_cmdline(b"echo \"open", &mut lines, &NoEnv),
        Err(Error::UnterminatedQuote)
    );
}

#[test]
fn default_limit_matches_staging_size() {
    let config = TokenizerConfig::with_limit(DEFAULT_TOKEN_CAPACITY);

    let long = vec![b'a'; DEFAULT_TOKEN_CAPACITY - 1];
    assert!(split_cmdline_with(&config, &long, &mut NoContinuation, &NoEnv).is_ok());

    let too_long = vec![b'a'; DEFAULT_TOKEN_CAPACITY];
    assert_eq!(
        split_cmdline_with(&config, &too_long, &mut NoContinuation, &NoEnv),
        Err(Error::CapacityExceeded {
            limit: DEFAULT_TOKEN_CAPACITY
        })
    );
}

#[test]
fn unlimited_config_accepts_long_lines() {
    let long = vec![b'z'; 100_000];
    let config = TokenizerConfig::with_limit(usize::MAX);
    let argv = split_cmdline_with(&config, &long, &mut NoContinuation, &NoEnv).unwrap();
    assert_eq!(argv.get(0).map(<[u8]>::len), Some(100_000));
}
