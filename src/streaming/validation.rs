//! Sort validation for streaming operations.
//!
//! The merge relies on both matrices being sorted under the same key order.
//! Validation is inline: each key is checked against the previous one as
//! the stream is read, so inputs are never read twice.

use crate::kmer::KeyOrder;
use crate::matrix::MatrixError;
use std::cmp::Ordering;

/// Inline key-order validator for use within streaming loops.
///
/// Equal consecutive keys are accepted; only a decrease is an error.
#[derive(Debug)]
pub struct KeySortValidator {
    order: KeyOrder,
    file_id: String,
    prev_key: Vec<u8>,
    record_count: usize,
}

impl KeySortValidator {
    pub fn new(order: KeyOrder, file_id: impl Into<String>) -> Self {
        Self {
            order,
            file_id: file_id.into(),
            prev_key: Vec::new(),
            record_count: 0,
        }
    }

    /// Validate that `key` does not sort before the previous key.
    #[inline]
    pub fn validate(&mut self, key: &[u8], line: usize) -> Result<(), MatrixError> {
        self.record_count += 1;

        if self.record_count > 1 && self.order.compare(key, &self.prev_key) == Ordering::Less {
            return Err(MatrixError::Unsorted(format!(
                "{}: k-mer {} at line {} comes after {} under {} order",
                self.file_id,
                String::from_utf8_lossy(key),
                line,
                String::from_utf8_lossy(&self.prev_key),
                self.order
            )));
        }

        self.prev_key.clear();
        self.prev_key.extend_from_slice(key);
        Ok(())
    }

    /// Number of keys validated so far.
    pub fn record_count(&self) -> usize {
        self.record_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_keys_pass() {
        let mut v = KeySortValidator::new(KeyOrder::Lexicographic, "a");
        for (i, key) in [b"AAA", b"AAC", b"AAC", b"GTA", b"TTT"].iter().enumerate() {
            v.validate(*key, i + 1).unwrap();
        }
        assert_eq!(v.record_count(), 5);
    }

    #[test]
    fn test_decrease_is_reported() {
        let mut v = KeySortValidator::new(KeyOrder::Lexicographic, "left.txt");
        v.validate(b"CCC", 1).unwrap();
        let err = v.validate(b"AAA", 2).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("left.txt"));
        assert!(msg.contains("line 2"));
    }

    #[test]
    fn test_rank_order_validation() {
        let mut v = KeySortValidator::new(KeyOrder::NucleotideRank, "m");
        v.validate(b"ACT", 1).unwrap();
        v.validate(b"ACG", 2).unwrap();
        assert!(v.validate(b"ACT", 3).is_err());
    }
}
