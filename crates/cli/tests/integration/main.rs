//! CLI integration tests that run a fake generator.

#![cfg(unix)]

mod common;
