//! Error kinds shared by every fallible routine in the library.
//!
//! Fallible operations return [`Error`] directly. The thread-local
//! last-error cell exists only for the C-style numeral entry point
//! ([`crate::stdlib::conversion::strtoul`]), whose callers read the cell
//! after a zero return because zero is also a legitimate value.

use std::cell::Cell;

use thiserror::Error;

/// Failure reasons surfaced to the command-interpreter layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Numeral-to-integer conversion overflowed the target width.
    #[error("overflow is detected")]
    OutOfRange,
    /// Numeral contains no valid digit.
    #[error("unrecognized number")]
    BadNumber,
    /// An allocation could not be satisfied.
    #[error("out of memory")]
    OutOfMemory,
    /// The token staging buffer would grow past its configured limit.
    #[error("command line exceeds {limit} bytes")]
    CapacityExceeded { limit: usize },
    /// A quoted argument was still open when the line source ran dry.
    #[error("unterminated quote")]
    UnterminatedQuote,
    /// A `${` reference reached the end of the line before its `}`.
    #[error("unterminated variable reference")]
    UnterminatedVariable,
    /// The line source reported a failure of its own.
    #[error("line source failed: {0}")]
    LineSource(String),
}

impl Error {
    /// Stable symbolic name, suitable for fixtures and logs.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::OutOfRange => ErrorCode::OutOfRange,
            Self::BadNumber => ErrorCode::BadNumber,
            Self::OutOfMemory => ErrorCode::OutOfMemory,
            Self::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            Self::UnterminatedQuote => ErrorCode::UnterminatedQuote,
            Self::UnterminatedVariable => ErrorCode::UnterminatedVariable,
            Self::LineSource(_) => ErrorCode::LineSource,
        }
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

/// Payload-free error discriminant, cheap to store in the last-error cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    OutOfRange,
    BadNumber,
    OutOfMemory,
    CapacityExceeded,
    UnterminatedQuote,
    UnterminatedVariable,
    LineSource,
}

impl ErrorCode {
    /// Symbolic name (`"OutOfRange"`, `"BadNumber"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutOfRange => "OutOfRange",
            Self::BadNumber => "BadNumber",
            Self::OutOfMemory => "OutOfMemory",
            Self::CapacityExceeded => "CapacityExceeded",
            Self::UnterminatedQuote => "UnterminatedQuote",
            Self::UnterminatedVariable => "UnterminatedVariable",
            Self::LineSource => "LineSource",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

thread_local! {
    static LAST_ERROR: Cell<Option<ErrorCode>> = const { Cell::new(None) };
}

/// Returns the last failure recorded on this thread.
pub fn last_error() -> Option<ErrorCode> {
    LAST_ERROR.get()
}

/// Records a failure on this thread.
pub fn set_last_error(code: ErrorCode) {
    LAST_ERROR.set(Some(code));
}

/// Resets the cell; returns what was there.
pub fn clear_last_error() -> Option<ErrorCode> {
    LAST_ERROR.replace(None)
}
