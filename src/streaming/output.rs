//! Row formatting for matrix output.
//!
//! Sample columns are never parsed; they are copied through as raw bytes.

use crate::matrix::{MatrixError, Row};
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use std::io::{BufWriter, Write};

/// Zero-valued sample column appended when padding a row.
const ZERO_COLUMN: &[u8] = b" 0";

/// Buffered matrix row writer.
pub struct MatrixWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> MatrixWriter<W> {
    /// Create a new MatrixWriter with the default 2MB buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    /// Create a new MatrixWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
        }
    }

    /// Write a row unchanged: key, original tail, newline.
    #[inline]
    pub fn write_row(&mut self, row: &Row<'_>) -> Result<(), MatrixError> {
        self.writer.write_all(row.key())?;
        self.writer.write_all(row.tail())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write key, the row's sample columns, then `zeros` extra `0` columns.
    ///
    /// Whitespace between the key and the first sample is normalized to a
    /// single space.
    #[inline]
    pub fn write_padded(&mut self, row: &Row<'_>, zeros: usize) -> Result<(), MatrixError> {
        self.writer.write_all(row.key())?;
        let samples = row.samples();
        if !samples.is_empty() {
            self.writer.write_all(b" ")?;
            self.writer.write_all(samples)?;
        }
        for _ in 0..zeros {
            self.writer.write_all(ZERO_COLUMN)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), MatrixError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Drop buffered rows without writing them.
    ///
    /// Rows already flushed to the underlying writer stay written.
    pub fn discard(self) {
        let (_inner, _unwritten) = self.writer.into_parts();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut MatrixWriter<&mut Vec<u8>>)) -> String {
        let mut output = Vec::new();
        {
            let mut writer = MatrixWriter::new(&mut output);
            f(&mut writer);
            writer.flush().unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_write_row_verbatim() {
        let row = Row::new(b"AAA\t1  2", 3);
        assert_eq!(render(|w| w.write_row(&row).unwrap()), "AAA\t1  2\n");
    }

    #[test]
    fn test_write_padded() {
        let row = Row::new(b"TTT 3 3", 3);
        assert_eq!(render(|w| w.write_padded(&row, 2).unwrap()), "TTT 3 3 0 0\n");
    }

    #[test]
    fn test_write_padded_normalizes_key_separator() {
        let row = Row::new(b"TTT\t\t3\t3", 3);
        assert_eq!(render(|w| w.write_padded(&row, 1).unwrap()), "TTT 3\t3 0\n");
    }

    #[test]
    fn test_write_padded_without_samples() {
        let row = Row::new(b"ACGT", 4);
        assert_eq!(render(|w| w.write_padded(&row, 3).unwrap()), "ACGT 0 0 0\n");
    }

    #[test]
    fn test_discard_drops_buffered_rows() {
        let mut output = Vec::new();
        {
            let mut writer = MatrixWriter::new(&mut output);
            writer.write_row(&Row::new(b"AAA 1", 3)).unwrap();
            writer.discard();
        }
        assert!(output.is_empty());
    }

    #[test]
    fn test_write_padded_zero_width() {
        let row = Row::new(b"ACG 5", 3);
        assert_eq!(render(|w| w.write_padded(&row, 0).unwrap()), "ACG 5\n");
    }
}
