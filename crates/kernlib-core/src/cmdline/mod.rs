//! Command-line splitting.
//!
//! [`split_cmdline`] turns one raw line into an [`ArgVector`]:
//!
//! - Blanks separate arguments.
//! - `"..."` keeps blanks, honours `\` escapes and `$` substitution.
//! - `'...'` is fully literal.
//! - Bare words honour `\` escapes and `$NAME` / `${NAME}` substitution and
//!   end at a blank or a quote.
//!
//! Every completed argument counts, including empty ones: `echo $UNSET`
//! yields `["echo", ""]`.

pub mod argv;
pub mod lexer;

pub use argv::ArgVector;
pub use lexer::{Lexer, LineSource, NoContinuation, QueuedLines, Symbol, TokenBuffer};

use crate::config;
use crate::errno::Error;
use crate::stdlib::env::EnvLookup;

/// Per-call tokenizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Staging bytes (tokens plus terminators) one call may use.
    pub limit: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            limit: config::token_capacity(),
        }
    }
}

impl TokenizerConfig {
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

/// Splits `line` into arguments using the process-wide staging limit.
///
/// `lines` is consulted only while a quoted argument is open at the end of
/// a line.
///
/// # Errors
///
/// - [`Error::UnterminatedQuote`] if `lines` runs dry inside a quote.
/// - [`Error::UnterminatedVariable`] for `${` without `}` on the same line.
/// - [`Error::CapacityExceeded`] past the staging limit.
/// - [`Error::OutOfMemory`] on allocation failure.
/// - Any error returned by `lines`.
pub fn split_cmdline<L, E>(line: &[u8], lines: &mut L, env: &E) -> Result<ArgVector, Error>
where
    L: LineSource + ?Sized,
    E: EnvLookup + ?Sized,
{
    split_cmdline_with(&TokenizerConfig::default(), line, lines, env)
}

/// [`split_cmdline`] with explicit settings.
pub fn split_cmdline_with<L, E>(
    config: &TokenizerConfig,
    line: &[u8],
    lines: &mut L,
    env: &E,
) -> Result<ArgVector, Error>
where
    L: LineSource + ?Sized,
    E: EnvLookup + ?Sized,
{
    Lexer::new(line, lines, env, config.limit).finish()
}

/// Splits a single self-contained line; open quotes are errors.
pub fn split_line<E: EnvLookup + ?Sized>(line: &[u8], env: &E) -> Result<ArgVector, Error> {
    split_cmdline(line, &mut NoContinuation, env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib::env::{EnvTable, NoEnv};

    fn words(line: &[u8]) -> Vec<String> {
        split_line(line, &NoEnv).unwrap().to_strings()
    }

    fn env() -> EnvTable {
        [("NAME", "world"), ("root", "hd0,1"), ("EMPTY", "")]
            .into_iter()
            .collect()
    }

    #[test]
    fn mixed_quoting() {
        assert_eq!(words(b"hello \"a b\" 'c  d'"), vec!["hello", "a b", "c  d"]);
    }

    #[test]
    fn blank_lines_have_no_arguments() {
        assert!(split_line(b"", &NoEnv).unwrap().is_empty());
        assert!(split_line(b"  \t \r", &NoEnv).unwrap().is_empty());
    }

    #[test]
    fn unset_variable_yields_empty_argument() {
        let argv = split_line(b"echo $NAME", &NoEnv).unwrap();
        assert_eq!(argv.argc(), 2);
        assert_eq!(argv.to_strings(), vec!["echo", ""]);
    }

    #[test]
    fn variables_substitute() {
        let env = env();
        let split = |line: &[u8]| split_line(line, &env).unwrap().to_strings();
        assert_eq!(split(b"echo $NAME"), vec!["echo", "world"]);
        assert_eq!(split(b"${NAME}x"), vec!["worldx"]);
        assert_eq!(split(b"$NAME.x"), vec!["world.x"]);
        assert_eq!(split(b"\"($root)/boot\""), vec!["(hd0,1)/boot"]);
        assert_eq!(split(b"a$EMPTY-b"), vec!["a-b"]);
    }

    #[test]
    fn substituted_value_is_not_rescanned() {
        let env: EnvTable = [("A", "$B \"x"), ("B", "no")].into_iter().collect();
        let argv = split_line(b"$A", &env).unwrap();
        assert_eq!(argv.to_strings(), vec!["$B \"x"]);
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(words(br"'a$b\c'"), vec![r"a$b\c"]);
    }

    #[test]
    fn escapes() {
        assert_eq!(words(br#""a\"b""#), vec![r#"a"b"#]);
        assert_eq!(words(br#""x\\y""#), vec![r"x\y"]);
        assert_eq!(words(br"a\ b"), vec!["a b"]);
        assert_eq!(words(br"a\$b"), vec!["a$b"]);
        assert_eq!(words(br"ab\"), vec!["ab"]);
    }

    #[test]
    fn quotes_end_arguments() {
        assert_eq!(words(b"\"a\"b"), vec!["a", "b"]);
        assert_eq!(words(b"a\"b c\""), vec!["a", "b c"]);
        assert_eq!(words(b"\"\""), vec![""]);
    }

    #[test]
    fn line_ends_at_newline_or_nul() {
        assert_eq!(words(b"a\nb"), vec!["a"]);
        assert_eq!(words(b"a\0b"), vec!["a"]);
    }

    #[test]
    fn control_bytes_separate_and_high_bytes_join() {
        assert_eq!(words(b"a\x01b"), vec!["a", "b"]);
        assert_eq!(words("héllo wörld".as_bytes()), vec!["héllo", "wörld"]);
    }

    #[test]
    fn continuation_joins_without_newline() {
        let mut lines: QueuedLines = ["def", "ghi\" tail"].into_iter().collect();
        let argv = split_cmdline(b"\"abc", &mut lines, &NoEnv).unwrap();
        assert_eq!(argv.to_strings(), vec!["abcdefghi", "tail"]);
        assert_eq!(lines.remaining(), 0);
    }

    #[test]
    fn single_quote_continues_too() {
        let mut lines: QueuedLines = ["b'"].into_iter().collect();
        let argv = split_cmdline(b"'a", &mut lines, &NoEnv).unwrap();
        assert_eq!(argv.to_strings(), vec!["ab"]);
    }

    #[test]
    fn escaped_line_break_in_double_quotes_joins() {
        let mut lines: QueuedLines = ["b\""].into_iter().collect();
        let argv = split_cmdline(b"\"a\\", &mut lines, &NoEnv).unwrap();
        assert_eq!(argv.to_strings(), vec!["ab"]);
    }

    #[test]
    fn line_source_untouched_without_open_quote() {
        let mut source = |_: &mut Vec<u8>| -> Result<bool, Error> {
            panic!("line source must not be called")
        };
        let argv = split_cmdline(b"a 'b' \"c\"", &mut source, &NoEnv).unwrap();
        assert_eq!(argv.argc(), 3);
    }

    #[test]
    fn unterminated_quote() {
        assert_eq!(split_line(b"\"abc", &NoEnv), Err(Error::UnterminatedQuote));
        assert_eq!(split_line(b"'abc", &NoEnv), Err(Error::UnterminatedQuote));
    }

    #[test]
    fn line_source_errors_propagate() {
        let mut source =
            |_: &mut Vec<u8>| -> Result<bool, Error> { Err(Error::LineSource("eof".into())) };
        assert_eq!(
            split_cmdline(b"\"abc", &mut source, &NoEnv),
            Err(Error::LineSource("eof".into()))
        );
    }

    #[test]
    fn unterminated_variable() {
        assert_eq!(
            split_line(b"${NAME", &NoEnv),
            Err(Error::UnterminatedVariable)
        );
    }

    #[test]
    fn capacity_limit() {
        let config = TokenizerConfig::with_limit(8);
        let ok = split_cmdline_with(&config, b"abc def", &mut NoContinuation, &NoEnv).unwrap();
        assert_eq!(ok.as_packed(), b"abc\0def\0");
        assert_eq!(
            split_cmdline_with(&config, b"abcdefgh", &mut NoContinuation, &NoEnv),
            Err(Error::CapacityExceeded { limit: 8 })
        );
    }

    #[test]
    fn capacity_counts_substituted_bytes() {
        let env = env();
        let config = TokenizerConfig::with_limit(4);
        assert_eq!(
            split_cmdline_with(&config, b"$NAME", &mut NoContinuation, &env),
            Err(Error::CapacityExceeded { limit: 4 })
        );
    }
}
