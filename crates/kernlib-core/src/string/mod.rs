//! String and memory primitives.
//!
//! Safe slice-based versions of the loader's byte and C-string helpers. A
//! C string is modelled as a `&[u8]` whose logical end is the first NUL byte
//! (or the end of the slice).

pub mod mem;
pub mod str;

pub use mem::{memcmp, memmove, memset};
pub use str::{
    stpcpy, strcat, strchr, strcmp, strcpy, strdup, strlen, strncmp, strncpy, strndup, strrchr,
};
