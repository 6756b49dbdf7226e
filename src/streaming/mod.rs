//! Shared streaming components for matrix commands:
//! - Buffer sizing
//! - Row output formatting
//! - Inline sort validation
//!
//! Everything here works on one row at a time, so memory stays bounded by
//! the longest line of each input.

pub mod buffers;
pub mod output;
pub mod validation;

pub use output::MatrixWriter;
pub use validation::KeySortValidator;
