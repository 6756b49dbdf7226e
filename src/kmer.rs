//! K-mer keys and the two total orders used to merge matrices.
//!
//! Keys are compared as raw bytes. Two orders are supported:
//!
//! - **Lexicographic**: plain byte order, `A < C < G < T`.
//! - **Nucleotide rank**: the order used by kmtricks, `A < C < T < G`.
//!
//! Both lookup tables are built at compile time and never change.

use crate::matrix::MatrixError;
use std::cmp::Ordering;
use std::fmt;

/// Default k-mer length.
pub const DEFAULT_KMER_SIZE: usize = 31;

const fn build_nucleotide_table() -> [bool; 256] {
    let mut table = [false; 256];
    table[b'A' as usize] = true;
    table[b'C' as usize] = true;
    table[b'G' as usize] = true;
    table[b'T' as usize] = true;
    table
}

const fn build_rank_table() -> [u8; 256] {
    let mut table = [1u8; 256];
    table[b'A' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'T' as usize] = 2;
    table[b'G' as usize] = 3;
    table
}

static NUCLEOTIDES: [bool; 256] = build_nucleotide_table();
static RANKS: [u8; 256] = build_rank_table();

/// Returns true if `byte` is one of `A`, `C`, `G`, `T`.
#[inline(always)]
pub fn is_nucleotide(byte: u8) -> bool {
    NUCLEOTIDES[byte as usize]
}

/// Rank of a byte in kmtricks order. Anything that is not a nucleotide ranks as `C`.
#[inline(always)]
pub fn rank(byte: u8) -> u8 {
    RANKS[byte as usize]
}

/// Compare two keys in kmtricks order.
///
/// Returns the signed rank difference at the first position where the keys
/// differ. Only the sign is meaningful. Keys that agree on their common
/// prefix compare equal.
#[inline]
pub fn rank_cmp(a: &[u8], b: &[u8]) -> i32 {
    match a.iter().zip(b).find(|(x, y)| x != y) {
        Some((&x, &y)) => rank(x) as i32 - rank(y) as i32,
        None => 0,
    }
}

/// Validated k-mer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KmerSize(usize);

impl KmerSize {
    /// Build a k-mer size from a raw integer, rejecting values `<= 0`.
    pub fn new(k: i64) -> Result<Self, MatrixError> {
        if k <= 0 {
            return Err(MatrixError::InvalidKmerSize(k));
        }
        usize::try_from(k)
            .map(KmerSize)
            .map_err(|_| MatrixError::InvalidKmerSize(k))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for KmerSize {
    fn default() -> Self {
        KmerSize(DEFAULT_KMER_SIZE)
    }
}

/// Order under which both matrices were sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Byte-wise order (`A < C < G < T`).
    #[default]
    Lexicographic,
    /// kmtricks nucleotide order (`A < C < T < G`).
    NucleotideRank,
}

impl KeyOrder {
    /// Compare two keys under this order.
    #[inline]
    pub fn compare(self, a: &[u8], b: &[u8]) -> Ordering {
        match self {
            KeyOrder::Lexicographic => a.cmp(b),
            KeyOrder::NucleotideRank => rank_cmp(a, b).cmp(&0),
        }
    }
}

impl fmt::Display for KeyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOrder::Lexicographic => write!(f, "lexicographic"),
            KeyOrder::NucleotideRank => write!(f, "kmtricks (A<C<T<G)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nucleotide_table() {
        for b in b"ACGT" {
            assert!(is_nucleotide(*b));
        }
        for b in b"acgtNn \t\n\r0X" {
            assert!(!is_nucleotide(*b), "{} should not be a nucleotide", *b as char);
        }
    }

    #[test]
    fn test_rank_table() {
        assert_eq!(rank(b'A'), 0);
        assert_eq!(rank(b'C'), 1);
        assert_eq!(rank(b'T'), 2);
        assert_eq!(rank(b'G'), 3);
        assert_eq!(rank(b'\n'), 1);
        assert_eq!(rank(0), 1);
        assert_eq!(rank(b'a'), 1);
    }

    #[test]
    fn test_rank_order_single_chars() {
        let order = KeyOrder::NucleotideRank;
        assert_eq!(order.compare(b"A", b"C"), Ordering::Less);
        assert_eq!(order.compare(b"C", b"T"), Ordering::Less);
        assert_eq!(order.compare(b"T", b"G"), Ordering::Less);
        assert_eq!(order.compare(b"G", b"A"), Ordering::Greater);
    }

    #[test]
    fn test_rank_cmp_returns_rank_difference() {
        assert_eq!(rank_cmp(b"AAG", b"AAA"), 3);
        assert_eq!(rank_cmp(b"AAA", b"AAG"), -3);
        assert_eq!(rank_cmp(b"ACA", b"ATA"), -1);
        assert_eq!(rank_cmp(b"ACGT", b"ACGT"), 0);
    }

    #[test]
    fn test_first_difference_decides() {
        let order = KeyOrder::NucleotideRank;
        // Differ at index 2: T < G in rank order, the reverse of byte order.
        assert_eq!(order.compare(b"ACTAA", b"ACGAA"), Ordering::Less);
        assert_eq!(KeyOrder::Lexicographic.compare(b"ACTAA", b"ACGAA"), Ordering::Greater);
        // Later positions are ignored once a difference is found.
        assert_eq!(order.compare(b"AAGGG", b"ACAAA"), Ordering::Less);
    }

    #[test]
    fn test_self_comparison_is_equal() {
        for key in [&b"A"[..], b"ACGT", b"GGGGGGG", b"TCAG"] {
            assert_eq!(KeyOrder::Lexicographic.compare(key, key), Ordering::Equal);
            assert_eq!(KeyOrder::NucleotideRank.compare(key, key), Ordering::Equal);
        }
    }

    #[test]
    fn test_lexicographic_matches_byte_order() {
        let order = KeyOrder::Lexicographic;
        assert_eq!(order.compare(b"AAA", b"AAC"), Ordering::Less);
        assert_eq!(order.compare(b"GGG", b"TTT"), Ordering::Less);
        assert_eq!(order.compare(b"TTT", b"GGG"), Ordering::Greater);
    }

    #[test]
    fn test_kmer_size_validation() {
        assert_eq!(KmerSize::new(31).unwrap().get(), 31);
        assert_eq!(KmerSize::default().get(), DEFAULT_KMER_SIZE);
        assert!(matches!(KmerSize::new(0), Err(MatrixError::InvalidKmerSize(0))));
        assert!(matches!(KmerSize::new(-4), Err(MatrixError::InvalidKmerSize(-4))));
    }
}
