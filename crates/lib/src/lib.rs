//! slicedep-lib: incremental dependency tracking for Slice code generation
//!
//! This crate decides, per Slice source file, whether the generated artifacts
//! are current and regenerates them when they are not:
//! - `timestamp`: filesystem existence and modification-time queries
//! - `record`: the persisted per-source dependency record
//! - `evaluate`: the staleness decision engine
//! - `generate`: running the external generator and recording its dependencies
//! - `orchestrate`: the batch surface consumed by a host build
//!
//! `generator` holds the per-generator artifact and option rules, and
//! `config` turns a JSON manifest into a batch.

pub mod config;
pub mod consts;
pub mod evaluate;
pub mod generate;
pub mod generator;
pub mod orchestrate;
pub mod record;
pub mod source;
pub mod timestamp;
pub mod util;
