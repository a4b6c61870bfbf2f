//! # kernlib-core
//!
//! Text processing for a freestanding, bootloader-class runtime.
//!
//! - [`stdio`]: a small printf-style formatting engine writing to a bounded
//!   buffer, a growable buffer or a character device.
//! - [`cmdline`]: a shell-like command-line tokenizer with quoting,
//!   escapes, `$VAR` substitution and multi-line continuation.
//!
//! The byte-string, classification and numeral helpers they are built on
//! are exported as well. No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod cmdline;
pub mod config;
pub mod ctype;
pub mod errno;
pub mod stdio;
pub mod stdlib;
pub mod string;

pub use cmdline::{ArgVector, split_cmdline};
pub use errno::Error;
pub use stdio::{FormatArg, render, sprintf, sprintf_into, vprintf};
