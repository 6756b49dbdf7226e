//! Command implementations for km_diff.

pub mod diff;

pub use diff::{DiffCommand, DiffStats};
