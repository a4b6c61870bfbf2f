//! Conformance testing harness for kernlib.
//!
//! This crate provides:
//! - Fixture sets: JSON reference cases for the formatter, the command-line
//!   tokenizer and numeral conversion
//! - Execution: run one case against `kernlib-core` and render its output
//! - Verification + reports: markdown and JSON conformance summaries
//! - Structured logs: JSONL run records plus a SHA-256 artifact index

#![forbid(unsafe_code)]

pub mod diff;
pub mod error;
pub mod execute;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::VerificationResult;
