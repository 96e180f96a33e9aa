//! Integrity digests for framed records.

pub mod digest;

pub use digest::*;
