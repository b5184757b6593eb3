//! Deterministic JSON serialization for files written to disk.
//!
//! - Keys in `BTreeMap`s come out sorted
//! - 2-space indentation
//! - Trailing newline

mod json;

pub use json::*;
