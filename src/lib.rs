//! km_diff: difference between two sorted k-mer matrices
//!
//! A k-mer matrix is a text file where each row starts with a k-mer and
//! continues with one count per sample. Given two matrices sorted under the
//! same order, this library keeps the rows of the first matrix whose k-mer
//! does not appear in the second one.
//!
//! # Features
//!
//! - **Streaming I/O**: one row per matrix in memory, inputs read once
//! - **Two key orders**: lexicographic, or kmtricks order `A < C < T < G`
//!
//! # Example
//!
//! ```rust,no_run
//! use km_diff::{commands::DiffCommand, kmer::KmerSize};
//!
//! let cmd = DiffCommand::new(KmerSize::new(31).unwrap());
//! let mut out = std::io::stdout();
//! let stats = cmd.run("a.mat", "b.mat", &mut out).unwrap();
//! eprintln!("{}", stats);
//! ```

pub mod commands;
pub mod config;
pub mod kmer;
pub mod matrix;
pub mod streaming;

// Re-export commonly used types
pub use commands::{DiffCommand, DiffStats};
pub use kmer::{KeyOrder, KmerSize};
pub use matrix::{MatrixError, MatrixReader, Row};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
