//! Dependency records.
//!
//! One record per source, stored next to its generated files:
//!
//! ```text
//! {outputDir}/
//! ├── Foo.cpp
//! ├── Foo.h
//! └── slice2cpp.Foo.d     # DependencyRecord (JSON)
//! ```
//!
//! Records are only ever replaced whole, after a successful generation.

mod store;
mod types;

pub use store::{load, save};
pub use types::{DependencyRecord, RecordError, RecordLoad};
