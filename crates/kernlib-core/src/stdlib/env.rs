//! Environment variable lookup.
//!
//! The tokenizer resolves `$NAME` through [`EnvLookup`]; absence of a
//! variable is not an error. [`EnvTable`] is the loader's own variable store.

use std::collections::{BTreeMap, HashMap};

/// Read access to a set of environment variables.
pub trait EnvLookup {
    /// Value of `name`, or `None` if it is not set.
    fn lookup(&self, name: &[u8]) -> Option<&[u8]>;
}

/// An environment with no variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnv;

impl EnvLookup for NoEnv {
    fn lookup(&self, _name: &[u8]) -> Option<&[u8]> {
        None
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, name: &[u8]) -> Option<&[u8]> {
        let name = std::str::from_utf8(name).ok()?;
        self.get(name).map(String::as_bytes)
    }
}

impl<T: EnvLookup + ?Sized> EnvLookup for &T {
    fn lookup(&self, name: &[u8]) -> Option<&[u8]> {
        (**self).lookup(name)
    }
}

/// Ordered variable table keyed by raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvTable {
    vars: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl EnvTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`. Returns `false` (and stores nothing) if the
    /// name or value is not acceptable, see [`valid_env_name`].
    pub fn set(&mut self, name: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> bool {
        let (name, value) = (name.as_ref(), value.as_ref());
        if !valid_env_name(name) || !valid_env_value(value) {
            return false;
        }
        self.vars.insert(name.to_vec(), value.to_vec());
        true
    }

    /// Removes `name`; returns its old value.
    pub fn unset(&mut self, name: &[u8]) -> Option<Vec<u8>> {
        self.vars.remove(name)
    }

    /// Parses a `NAME=VALUE` assignment and stores it.
    pub fn set_entry(&mut self, entry: &[u8]) -> bool {
        let Some(eq) = entry.iter().position(|&b| b == b'=') else {
            return false;
        };
        self.set(&entry[..eq], &entry[eq + 1..])
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.vars.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

impl EnvLookup for EnvTable {
    fn lookup(&self, name: &[u8]) -> Option<&[u8]> {
        self.vars.get(name).map(Vec::as_slice)
    }
}

impl<K: AsRef<[u8]>, V: AsRef<[u8]>> FromIterator<(K, V)> for EnvTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, value) in iter {
            table.set(name, value);
        }
        table
    }
}

/// Validates that `name` is a legal variable name: non-empty, no `'='`, no
/// embedded NUL.
pub fn valid_env_name(name: &[u8]) -> bool {
    !name.is_empty() && !name.contains(&b'=') && !name.contains(&0)
}

/// Validates that `value` contains no embedded NUL bytes.
pub fn valid_env_value(value: &[u8]) -> bool {
    !value.contains(&0)
}
