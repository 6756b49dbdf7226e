//! Streaming difference of two sorted k-mer matrices.
//!
//! Emits every row of the left matrix whose k-mer is absent from the right
//! matrix. Both inputs are read once, forward only, with one row of each
//! held at a time.
//!
//! # Phases
//!
//! - **Merging**: both matrices have rows. Matching k-mers are dropped, left
//!   k-mers smaller than the current right k-mer are written unchanged, and
//!   the right matrix is advanced past smaller right k-mers.
//! - **Drain**: the right matrix is exhausted. Every remaining left row is
//!   written with one `0` column per right-matrix sample appended.
//! - **Done**: the left matrix is exhausted. Remaining right rows are not read.
//!
//! # Requirements
//!
//! Both matrices MUST be sorted under the selected [`KeyOrder`]. Nothing is
//! checked unless `check_sorted` is set; unsorted input gives an unspecified
//! subset of the left matrix.

use crate::kmer::{KeyOrder, KmerSize};
use crate::matrix::{MatrixError, MatrixReader};
use crate::streaming::MatrixWriter;
use log::info;
use std::cmp::Ordering;
use std::io::{Read, Write};
use std::path::Path;

/// Matrix difference command configuration.
#[derive(Debug, Clone, Default)]
pub struct DiffCommand {
    /// Length of the k-mer key at the start of each row
    pub kmer_size: KmerSize,
    /// Order both matrices are sorted by
    pub order: KeyOrder,
    /// Fail on keys that decrease instead of trusting the input order
    pub check_sorted: bool,
}

/// Statistics from a matrix difference run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiffStats {
    /// Sample columns in the first row of the left matrix
    pub left_samples: usize,
    /// Sample columns in the first row of the right matrix
    pub right_samples: usize,
    /// Left rows read
    pub left_rows: usize,
    /// Right rows read
    pub right_rows: usize,
    /// Rows written to the output
    pub rows_written: usize,
    /// Left rows dropped because the right matrix has the same k-mer
    pub rows_matched: usize,
    /// Rows written with zero padding after the right matrix ran out
    pub rows_padded: usize,
}

impl std::fmt::Display for DiffStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Left: {} rows ({} samples), Right: {} rows ({} samples), Written: {}, Matched: {}, Padded: {}",
            self.left_rows,
            self.left_samples,
            self.right_rows,
            self.right_samples,
            self.rows_written,
            self.rows_matched,
            self.rows_padded
        )
    }
}

impl DiffCommand {
    pub fn new(kmer_size: KmerSize) -> Self {
        Self {
            kmer_size,
            order: KeyOrder::Lexicographic,
            check_sorted: false,
        }
    }

    /// Open both matrices, left first. `-` reads standard input.
    pub fn open<P: AsRef<Path>>(
        &self,
        left_path: P,
        right_path: P,
    ) -> Result<(MatrixReader<Box<dyn Read>>, MatrixReader<Box<dyn Read>>), MatrixError> {
        let left = MatrixReader::from_path(left_path, self.kmer_size)?;
        let right = MatrixReader::from_path(right_path, self.kmer_size)?;
        Ok((left, right))
    }

    fn prepare<R: Read>(&self, reader: MatrixReader<R>) -> MatrixReader<R> {
        if self.check_sorted {
            reader.with_sort_check(self.order)
        } else {
            reader
        }
    }

    /// Execute the difference on two sorted matrix files.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        left_path: P,
        right_path: P,
        output: &mut W,
    ) -> Result<DiffStats, MatrixError> {
        let (left, right) = self.open(left_path, right_path)?;
        self.run_readers(left, right, output)
    }

    /// Execute the difference on two readers.
    ///
    /// When `check_sorted` is set both readers validate key order as they
    /// are consumed.
    pub fn run_readers<L: Read, R: Read, W: Write>(
        &self,
        left: MatrixReader<L>,
        right: MatrixReader<R>,
        output: &mut W,
    ) -> Result<DiffStats, MatrixError> {
        let mut left = self.prepare(left);
        let mut right = self.prepare(right);
        let mut output = MatrixWriter::new(output);
        let mut stats = DiffStats::default();

        // A failed run writes nothing still sitting in the buffer
        match self.merge(&mut left, &mut right, &mut output, &mut stats) {
            Ok(()) => {
                output.flush()?;
                Ok(stats)
            }
            Err(e) => {
                output.discard();
                Err(e)
            }
        }
    }

    fn merge<L: Read, R: Read, W: Write>(
        &self,
        left: &mut MatrixReader<L>,
        right: &mut MatrixReader<R>,
        output: &mut MatrixWriter<W>,
        stats: &mut DiffStats,
    ) -> Result<(), MatrixError> {
        // Widths come from the first row of each matrix
        if left.advance()? {
            stats.left_rows += 1;
        }
        stats.left_samples = left.row().map_or(0, |row| row.sample_count());
        info!("samples in 1st matrix: {}", stats.left_samples);

        if right.advance()? {
            stats.right_rows += 1;
        }
        stats.right_samples = right.row().map_or(0, |row| row.sample_count());
        info!("samples in 2nd matrix: {}", stats.right_samples);

        while let (Some(l), Some(r)) = (left.row(), right.row()) {
            match self.order.compare(l.key(), r.key()) {
                Ordering::Equal => {
                    stats.rows_matched += 1;
                    if left.advance()? {
                        stats.left_rows += 1;
                    }
                    if right.advance()? {
                        stats.right_rows += 1;
                    }
                }
                Ordering::Less => {
                    output.write_row(&l)?;
                    stats.rows_written += 1;
                    if left.advance()? {
                        stats.left_rows += 1;
                    }
                }
                Ordering::Greater => {
                    if right.advance()? {
                        stats.right_rows += 1;
                    }
                }
            }
        }

        // Right matrix exhausted: pad surviving left rows to the right width
        while let Some(l) = left.row() {
            output.write_padded(&l, stats.right_samples)?;
            stats.rows_written += 1;
            stats.rows_padded += 1;
            if left.advance()? {
                stats.left_rows += 1;
            }
        }

        Ok(())
    }
}
