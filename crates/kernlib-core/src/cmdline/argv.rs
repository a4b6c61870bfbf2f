//! Argument vector: packed NUL-delimited tokens plus an offsets table.

use std::ops::Index;

use crate::errno::Error;

/// The arguments of one command line.
///
/// Token bytes live in a single allocation, each token followed by a NUL;
/// `offsets[i]` is where token `i` starts. Both tables are owned here and
/// released together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgVector {
    packed: Vec<u8>,
    offsets: Vec<usize>,
}

impl ArgVector {
    /// Copies `staging` (NUL-terminated tokens) into an exactly sized
    /// allocation and indexes it.
    ///
    /// `argc` sizes the offsets table; it must equal the number of NULs in
    /// `staging`.
    pub fn from_staging(staging: &[u8], argc: usize) -> Result<Self, Error> {
        let mut packed = Vec::new();
        packed.try_reserve_exact(staging.len())?;
        packed.extend_from_slice(staging);

        let mut offsets = Vec::new();
        offsets.try_reserve_exact(argc)?;
        let mut start = 0;
        for (i, &b) in packed.iter().enumerate() {
            if b == 0 {
                offsets.push(start);
                start = i + 1;
            }
        }
        debug_assert_eq!(offsets.len(), argc, "token count mismatch");

        Ok(Self { packed, offsets })
    }

    /// Number of arguments.
    pub fn argc(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Argument `i` without its terminator.
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        let start = *self.offsets.get(i)?;
        let end = match self.offsets.get(i + 1) {
            Some(&next) => next - 1,
            None => self.packed.len() - 1,
        };
        Some(&self.packed[start..end])
    }

    /// Arguments in order, without terminators.
    pub fn argv(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        (0..self.argc()).map(move |i| &self[i])
    }

    /// Arguments as strings, replacing invalid UTF-8 with U+FFFD.
    pub fn to_strings(&self) -> Vec<String> {
        self.argv()
            .map(|arg| String::from_utf8_lossy(arg).into_owned())
            .collect()
    }

    /// The packed NUL-delimited layout.
    pub fn as_packed(&self) -> &[u8] {
        &self.packed
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

impl Index<usize> for ArgVector {
    type Output = [u8];

    fn index(&self, i: usize) -> &[u8] {
        match self.get(i) {
            Some(arg) => arg,
            None => panic!("argument {i} out of range for argc {}", self.argc()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_and_indexes() {
        let argv = ArgVector::from_staging(b"ls\0-l\0\0", 3).unwrap();
        assert_eq!(argv.argc(), 3);
        assert_eq!(argv.get(0), Some(&b"ls"[..]));
        assert_eq!(argv.get(1), Some(&b"-l"[..]));
        assert_eq!(argv.get(2), Some(&b""[..]));
        assert_eq!(argv.get(3), None);
        assert_eq!(argv.offsets(), &[0, 3, 6]);
        assert_eq!(argv.as_packed(), b"ls\0-l\0\0");
        assert_eq!(&argv[1], b"-l");
    }

    #[test]
    fn empty_vector() {
        let argv = ArgVector::from_staging(b"", 0).unwrap();
        assert!(argv.is_empty());
        assert_eq!(argv.argv().len(), 0);
        assert!(argv.to_strings().is_empty());
    }

    #[test]
    fn lossy_strings() {
        let argv = ArgVector::from_staging(b"ok\0\xFF\0", 2).unwrap();
        assert_eq!(argv.to_strings(), vec!["ok".to_string(), "\u{FFFD}".to_string()]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_out_of_range_panics() {
        let argv = ArgVector::from_staging(b"a\0", 1).unwrap();
        let _ = &argv[1];
    }
}
