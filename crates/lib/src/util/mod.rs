//! Shared utilities.
//!
//! Path normalization and comparison keys, plus test helpers.

pub mod path;

#[cfg(test)]
pub mod testutil;
