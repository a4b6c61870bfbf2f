//! Command-line lexer.
//!
//! Scans a raw line one [`Symbol`] at a time with a single pushback slot.
//! Each argument is lexed in one of three modes picked by its first byte:
//! double-quoted, single-quoted or bare. Quoted arguments left open at the
//! end of the line continue on lines pulled from a [`LineSource`]; the line
//! break itself is not part of the argument.
//!
//! Resolved bytes are staged in a [`TokenBuffer`], NUL-delimited, and handed
//! to [`ArgVector::from_staging`] once the line is exhausted.

use std::collections::VecDeque;

use super::argv::ArgVector;
use crate::ctype::{is_alnum, is_graph};
use crate::errno::Error;
use crate::stdlib::env::EnvLookup;
use crate::string::strlen;

/// One unit of lexer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Byte(u8),
    /// End of the current line: its end, a NUL byte or a `\n`.
    EndOfLine,
}

// ---------------------------------------------------------------------------
// Line sources
// ---------------------------------------------------------------------------

/// Supplies continuation lines for quoted arguments that span lines.
pub trait LineSource {
    /// Appends the next line (without its terminator) to `line`.
    ///
    /// Returns `Ok(false)` when no more lines are available.
    fn read_line(&mut self, line: &mut Vec<u8>) -> Result<bool, Error>;
}

impl<F> LineSource for F
where
    F: FnMut(&mut Vec<u8>) -> Result<bool, Error>,
{
    fn read_line(&mut self, line: &mut Vec<u8>) -> Result<bool, Error> {
        self(line)
    }
}

/// A line source with nothing to offer; open quotes are errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContinuation;

impl LineSource for NoContinuation {
    fn read_line(&mut self, _line: &mut Vec<u8>) -> Result<bool, Error> {
        Ok(false)
    }
}

/// Lines queued up front, handed out in order.
#[derive(Debug, Clone, Default)]
pub struct QueuedLines {
    lines: VecDeque<Vec<u8>>,
}

impl QueuedLines {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<Vec<u8>>) {
        self.lines.push_back(line.into());
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl<T: Into<Vec<u8>>> FromIterator<T> for QueuedLines {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for QueuedLines {
    fn read_line(&mut self, line: &mut Vec<u8>) -> Result<bool, Error> {
        let Some(next) = self.lines.pop_front() else {
            return Ok(false);
        };
        line.try_reserve(next.len())?;
        line.extend_from_slice(&next);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Token staging
// ---------------------------------------------------------------------------

/// Growable staging area with a hard byte limit.
///
/// The limit covers token bytes and their NUL terminators.
#[derive(Debug)]
pub struct TokenBuffer {
    bytes: Vec<u8>,
    limit: usize,
}

impl TokenBuffer {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<(), Error> {
        if self.bytes.len() >= self.limit {
            return Err(Error::CapacityExceeded { limit: self.limit });
        }
        self.bytes.try_reserve(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), Error> {
        bytes.iter().try_for_each(|&b| self.push(b))
    }

    /// Ends the current token.
    pub fn terminate(&mut self) -> Result<(), Error> {
        self.push(0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// Bytes skipped between arguments: space, tab, CR, other controls and DEL.
fn is_blank(b: u8) -> bool {
    b < 0x80 && !is_graph(b)
}

/// Bytes that extend a bare word. Quotes end it; bytes >= 0x80 belong to it.
fn is_word_byte(b: u8) -> bool {
    (is_graph(b) || b >= 0x80) && b != b'"' && b != b'\''
}

/// Tokenizer state for one command line.
pub struct Lexer<'a, L: LineSource + ?Sized, E: EnvLookup + ?Sized> {
    first: &'a [u8],
    continued: Vec<u8>,
    on_continuation: bool,
    pos: usize,
    at_eol: bool,
    pushback: Option<Symbol>,
    lines: &'a mut L,
    env: &'a E,
    staging: TokenBuffer,
    name: Vec<u8>,
    argc: usize,
}

impl<'a, L: LineSource + ?Sized, E: EnvLookup + ?Sized> Lexer<'a, L, E> {
    pub fn new(line: &'a [u8], lines: &'a mut L, env: &'a E, limit: usize) -> Self {
        Self {
            first: line,
            continued: Vec::new(),
            on_continuation: false,
            pos: 0,
            at_eol: false,
            pushback: None,
            lines,
            env,
            staging: TokenBuffer::new(limit),
            name: Vec::new(),
            argc: 0,
        }
    }

    /// Arguments completed so far.
    pub fn argc(&self) -> usize {
        self.argc
    }

    /// Lexes the next argument into the staging buffer.
    ///
    /// Returns `Ok(false)` once the line holds no further argument.
    pub fn next_arg(&mut self) -> Result<bool, Error> {
        let start = loop {
            match self.next_symbol() {
                Symbol::Byte(b) if is_blank(b) => {}
                sym => break sym,
            }
        };
        match start {
            Symbol::EndOfLine => return Ok(false),
            Symbol::Byte(b'"') => self.double_quoted()?,
            Symbol::Byte(b'\'') => self.single_quoted()?,
            sym => {
                self.push_back(sym);
                self.bare_word()?;
            }
        }
        self.staging.terminate()?;
        self.argc += 1;
        Ok(true)
    }

    /// Lexes every remaining argument and packs the result.
    pub fn finish(mut self) -> Result<ArgVector, Error> {
        while self.next_arg()? {}
        ArgVector::from_staging(self.staging.as_bytes(), self.argc)
    }

    /// Reads one symbol, honouring the pushback slot. End of line is sticky
    /// until a continuation line is fetched.
    pub fn next_symbol(&mut self) -> Symbol {
        if let Some(sym) = self.pushback.take() {
            return sym;
        }
        if self.at_eol {
            return Symbol::EndOfLine;
        }
        let line = if self.on_continuation {
            &self.continued[..]
        } else {
            self.first
        };
        match line.get(self.pos) {
            Some(&b) if b != 0 && b != b'\n' => {
                self.pos += 1;
                Symbol::Byte(b)
            }
            _ => {
                self.at_eol = true;
                Symbol::EndOfLine
            }
        }
    }

    /// Returns `sym` to the input. Only one symbol can be pending.
    pub(crate) fn push_back(&mut self, sym: Symbol) {
        assert!(self.pushback.is_none(), "pushback slot already full");
        self.pushback = Some(sym);
    }

    fn continue_line(&mut self) -> Result<(), Error> {
        self.continued.clear();
        if !self.lines.read_line(&mut self.continued)? {
            return Err(Error::UnterminatedQuote);
        }
        self.on_continuation = true;
        self.pos = 0;
        self.at_eol = false;
        Ok(())
    }

    fn double_quoted(&mut self) -> Result<(), Error> {
        loop {
            match self.next_symbol() {
                Symbol::EndOfLine => self.continue_line()?,
                Symbol::Byte(b'"') => return Ok(()),
                Symbol::Byte(b'\\') => match self.next_symbol() {
                    Symbol::Byte(b) => self.staging.push(b)?,
                    // Escaped line break: join with the next line.
                    Symbol::EndOfLine => self.continue_line()?,
                },
                Symbol::Byte(b'$') => self.substitute()?,
                Symbol::Byte(b) => self.staging.push(b)?,
            }
        }
    }

    fn single_quoted(&mut self) -> Result<(), Error> {
        loop {
            match self.next_symbol() {
                Symbol::EndOfLine => self.continue_line()?,
                Symbol::Byte(b'\'') => return Ok(()),
                Symbol::Byte(b) => self.staging.push(b)?,
            }
        }
    }

    fn bare_word(&mut self) -> Result<(), Error> {
        loop {
            match self.next_symbol() {
                Symbol::Byte(b'\\') => {
                    if let Symbol::Byte(b) = self.next_symbol() {
                        self.staging.push(b)?;
                    }
                }
                Symbol::Byte(b'$') => self.substitute()?,
                Symbol::Byte(b) if is_word_byte(b) => self.staging.push(b)?,
                sym => {
                    self.push_back(sym);
                    return Ok(());
                }
            }
        }
    }

    /// Handles the text after a `$`: `{NAME}` or a run of alphanumerics.
    fn substitute(&mut self) -> Result<(), Error> {
        self.name.clear();
        match self.next_symbol() {
            Symbol::Byte(b'{') => loop {
                match self.next_symbol() {
                    Symbol::Byte(b'}') => break,
                    Symbol::Byte(b) => {
                        self.name.try_reserve(1)?;
                        self.name.push(b);
                    }
                    Symbol::EndOfLine => return Err(Error::UnterminatedVariable),
                }
            },
            mut sym => {
                while let Symbol::Byte(b) = sym {
                    if !is_alnum(b) {
                        break;
                    }
                    self.name.try_reserve(1)?;
                    self.name.push(b);
                    sym = self.next_symbol();
                }
                self.push_back(sym);
            }
        }

        let env = self.env;
        if let Some(value) = env.lookup(&self.name) {
            self.staging.extend(&value[..strlen(value)])?;
        }
        Ok(())
    }
}
