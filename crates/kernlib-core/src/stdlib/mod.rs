//! Standard library helpers: numeral conversion and environment lookup.

pub mod conversion;
pub mod env;

pub use conversion::{parse_ulong, strtoul};
pub use env::{EnvLookup, EnvTable, NoEnv};
