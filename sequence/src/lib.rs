#![deny(clippy::pedantic)]
#![deny(clippy::cargo)]
// Some of our dependencies transitively depend on different versions of the same crates, like syn
// and bitflags.
#![allow(clippy::multiple_crate_versions)]

pub mod fib;
pub mod oracle;
#[cfg(any(feature = "test", test))]
pub mod test_utils;
