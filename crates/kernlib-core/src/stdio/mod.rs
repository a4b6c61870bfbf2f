//! Formatted output.
//!
//! [`printf`] holds the template parser and value renderers; [`sink`] the
//! destinations rendered bytes go to.

pub mod printf;
pub mod sink;

pub use printf::{
    FormatArg, FormatSpec, Formatter, format_string, render, sprintf, sprintf_into, vprintf,
};
pub use sink::{BufferSink, DeviceSink, OutputDevice, Sink, WriteDevice};
