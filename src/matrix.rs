//! Streaming k-mer matrix reader.
//!
//! A matrix is a text file with one row per line: a k-mer key followed by
//! whitespace-separated sample counts. Rows are read one at a time into a
//! single reusable line buffer, so memory is bounded by the longest line.

use crate::config::is_strict_keys;
use crate::kmer::{is_nucleotide, KeyOrder, KmerSize};
use crate::streaming::buffers::{DEFAULT_INPUT_BUFFER, DEFAULT_LINE_BUFFER};
use crate::streaming::validation::KeySortValidator;
use log::warn;
use memchr::memchr2;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading or diffing matrices.
#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot open file \"{}\": {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Cannot open output file \"{}\": {source}", .path.display())]
    Output { path: PathBuf, source: io::Error },

    #[error("Invalid value of k: {0}")]
    InvalidKmerSize(i64),

    #[error("{name}: line {line}: invalid byte {byte:?} at position {position} of the k-mer")]
    InvalidKey {
        name: String,
        line: usize,
        position: usize,
        byte: char,
    },

    #[error("{name}: line {line}: {len} bytes is shorter than k={kmer_size}")]
    ShortLine {
        name: String,
        line: usize,
        len: usize,
        kmer_size: usize,
    },

    #[error("Matrix not sorted: {0}")]
    Unsorted(String),
}

pub type Result<T> = std::result::Result<T, MatrixError>;

/// One matrix row, borrowed from the reader's line buffer.
///
/// The line terminator is already stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    line: &'a [u8],
    kmer_size: usize,
}

impl<'a> Row<'a> {
    /// Wrap a line that starts with a validated k-mer of `kmer_size` bytes.
    pub(crate) fn new(line: &'a [u8], kmer_size: usize) -> Self {
        debug_assert!(line.len() >= kmer_size);
        Self { line, kmer_size }
    }

    /// The whole line without its terminator.
    #[inline]
    pub fn line(&self) -> &'a [u8] {
        self.line
    }

    #[inline]
    pub fn key(&self) -> &'a [u8] {
        &self.line[..self.kmer_size]
    }

    /// Everything after the key, separator included.
    #[inline]
    pub fn tail(&self) -> &'a [u8] {
        &self.line[self.kmer_size..]
    }

    /// Sample columns: the text after the first token and the blanks following it.
    pub fn samples(&self) -> &'a [u8] {
        let line = self.line;
        let first_end = memchr2(b' ', b'\t', line).unwrap_or(line.len());
        let skip = line[first_end..]
            .iter()
            .take_while(|&&b| is_blank(b))
            .count();
        &line[first_end + skip..]
    }

    /// Number of sample columns, i.e. tokens after the first one.
    pub fn sample_count(&self) -> usize {
        count_tokens(self.line).saturating_sub(1)
    }
}

#[inline(always)]
fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Count blank-separated tokens in a line.
pub fn count_tokens(line: &[u8]) -> usize {
    line.split(|&b| is_blank(b) || b == b'\n')
        .filter(|tok| !tok.is_empty())
        .count()
}

/// Strip one trailing `\n` or `\r\n`.
#[inline]
fn strip_terminator(line: &[u8]) -> &[u8] {
    match line {
        [rest @ .., b'\r', b'\n'] => rest,
        [rest @ .., b'\n'] => rest,
        _ => line,
    }
}

/// A forward-only reader over one matrix.
///
/// Once the reader reaches end of stream (true EOF, a blank line, or a
/// malformed row in lenient mode) it stays there; no further lines are read.
pub struct MatrixReader<R: Read> {
    reader: BufReader<R>,
    name: String,
    kmer_size: usize,
    line_number: usize,
    buffer: Vec<u8>,
    line_len: usize,
    has_row: bool,
    exhausted: bool,
    sort_check: Option<KeySortValidator>,
}

impl MatrixReader<Box<dyn Read>> {
    /// Open a matrix file. `-` reads from standard input.
    pub fn from_path<P: AsRef<Path>>(path: P, kmer_size: KmerSize) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let source: Box<dyn Read> = if path == Path::new("-") {
            Box::new(io::stdin())
        } else {
            let file = File::open(path).map_err(|source| MatrixError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            Box::new(file)
        };
        Ok(Self::with_capacity(source, name, kmer_size, DEFAULT_INPUT_BUFFER))
    }
}

impl<R: Read> MatrixReader<R> {
    /// Create a reader over any readable source. `name` is used in diagnostics.
    pub fn new(reader: R, name: impl Into<String>, kmer_size: KmerSize) -> Self {
        Self::with_capacity(reader, name, kmer_size, DEFAULT_INPUT_BUFFER)
    }

    /// Create a reader with custom buffer capacity.
    pub fn with_capacity(
        reader: R,
        name: impl Into<String>,
        kmer_size: KmerSize,
        capacity: usize,
    ) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            name: name.into(),
            kmer_size: kmer_size.get(),
            line_number: 0,
            buffer: Vec::with_capacity(DEFAULT_LINE_BUFFER),
            line_len: 0,
            has_row: false,
            exhausted: false,
            sort_check: None,
        }
    }

    /// Check that keys never decrease under `order` while reading.
    pub fn with_sort_check(mut self, order: KeyOrder) -> Self {
        self.sort_check = Some(KeySortValidator::new(order, self.name.clone()));
        self
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Current row, or None before the first `advance` and once the stream has ended.
    #[inline]
    pub fn row(&self) -> Option<Row<'_>> {
        if self.has_row {
            Some(Row::new(&self.buffer[..self.line_len], self.kmer_size))
        } else {
            None
        }
    }

    /// Move to the next row. Returns false at end of stream.
    pub fn advance(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        let result = self.read_next();
        self.has_row = matches!(result, Ok(true));
        self.exhausted = !self.has_row;
        result
    }

    /// Advance and return the new current row.
    pub fn next_row(&mut self) -> Result<Option<Row<'_>>> {
        self.advance()?;
        Ok(self.row())
    }

    fn read_next(&mut self) -> Result<bool> {
        self.buffer.clear();
        let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(false);
        }
        self.line_number += 1;

        let k = self.kmer_size;
        let line = strip_terminator(&self.buffer);
        if line.iter().all(|&b| is_blank(b) || b == b'\r') {
            // A blank last line is tolerated; anywhere else it hides the rows after it
            if self.reader.fill_buf()?.is_empty() {
                return Ok(false);
            }
            return self.malformed(MatrixError::ShortLine {
                name: self.name.clone(),
                line: self.line_number,
                len: 0,
                kmer_size: k,
            });
        }

        if line.len() < k {
            return self.malformed(MatrixError::ShortLine {
                name: self.name.clone(),
                line: self.line_number,
                len: line.len(),
                kmer_size: k,
            });
        }

        if let Some(position) = self.buffer[..k].iter().position(|&b| !is_nucleotide(b)) {
            return self.malformed(MatrixError::InvalidKey {
                name: self.name.clone(),
                line: self.line_number,
                position,
                byte: self.buffer[position] as char,
            });
        }

        self.line_len = line.len();
        if let Some(validator) = self.sort_check.as_mut() {
            validator.validate(&self.buffer[..k], self.line_number)?;
        }
        Ok(true)
    }

    /// Lenient mode ends the stream with a warning; strict mode fails.
    fn malformed(&self, err: MatrixError) -> Result<bool> {
        if is_strict_keys() {
            return Err(err);
        }
        warn!("input does not seem valid, ignoring the rest of the matrix: {}", err);
        Ok(false)
    }
}
