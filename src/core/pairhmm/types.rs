//! Core data types for the PairHMM evaluator.

use crate::error::{PairHmmError, Result};

/// Code for the unknown base N. A=0, C=1, G=2, T=3, N=4.
pub const BASE_N: u8 = 4;

/// Encode an ASCII base into the 5-symbol alphabet.
///
/// Lowercase is accepted; any symbol outside ACGT maps to the unknown base,
/// which matches against everything in the emission model.
#[inline]
pub fn encode_base(b: u8) -> u8 {
    match b {
        b'A' | b'a' => 0,
        b'C' | b'c' => 1,
        b'G' | b'g' => 2,
        b'T' | b't' => 3,
        _ => BASE_N,
    }
}

/// One unit of work: a candidate haplotype, a sequencing read and the four
/// per-read-base quality tracks.
///
/// Instances can only be built through [`TestCase::new`], which enforces the
/// structural invariants (non-empty sequences, quality tracks as long as the
/// read) so the kernel never sees malformed input. Immutable once built.
#[derive(Debug, Clone)]
pub struct TestCase {
    haplotype: Vec<u8>,
    read: Vec<u8>,
    base_quality: Vec<u8>,
    insertion_quality: Vec<u8>,
    deletion_quality: Vec<u8>,
    gap_continuation_quality: Vec<u8>,
}

impl TestCase {
    /// Build a test case from ASCII sequences and raw integer quality
    /// scores. Bases are encoded into the 5-symbol alphabet here.
    pub fn new(
        haplotype: &[u8],
        read: &[u8],
        base_quality: Vec<u8>,
        insertion_quality: Vec<u8>,
        deletion_quality: Vec<u8>,
        gap_continuation_quality: Vec<u8>,
    ) -> Result<Self> {
        if haplotype.is_empty() {
            return Err(PairHmmError::InvalidTestCase("empty haplotype".into()));
        }
        if read.is_empty() {
            return Err(PairHmmError::InvalidTestCase("empty read".into()));
        }
        let read_len = read.len();
        for (name, track) in [
            ("base_quality", &base_quality),
            ("insertion_quality", &insertion_quality),
            ("deletion_quality", &deletion_quality),
            ("gap_continuation_quality", &gap_continuation_quality),
        ] {
            if track.len() != read_len {
                return Err(PairHmmError::InvalidTestCase(format!(
                    "{} has length {} but read has length {}",
                    name,
                    track.len(),
                    read_len
                )));
            }
        }

        Ok(TestCase {
            haplotype: haplotype.iter().map(|&b| encode_base(b)).collect(),
            read: read.iter().map(|&b| encode_base(b)).collect(),
            base_quality,
            insertion_quality,
            deletion_quality,
            gap_continuation_quality,
        })
    }

    /// Encoded haplotype bases (A=0 .. N=4).
    #[inline]
    pub fn haplotype(&self) -> &[u8] {
        &self.haplotype
    }

    /// Encoded read bases (A=0 .. N=4).
    #[inline]
    pub fn read(&self) -> &[u8] {
        &self.read
    }

    #[inline]
    pub fn base_quality(&self) -> &[u8] {
        &self.base_quality
    }

    #[inline]
    pub fn insertion_quality(&self) -> &[u8] {
        &self.insertion_quality
    }

    #[inline]
    pub fn deletion_quality(&self) -> &[u8] {
        &self.deletion_quality
    }

    #[inline]
    pub fn gap_continuation_quality(&self) -> &[u8] {
        &self.gap_continuation_quality
    }

    #[inline]
    pub fn hap_len(&self) -> usize {
        self.haplotype.len()
    }

    #[inline]
    pub fn read_len(&self) -> usize {
        self.read.len()
    }
}

/// Numeric precision a result was produced at. Pairs start at the fast tier
/// and may escalate to the slow tier, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionTier {
    FastF32,
    SlowF64,
}

/// Per-pair escalation state.
///
/// Legal transitions:
/// `Pending -> FastEvaluated -> {Accepted | Escalated}`,
/// `Escalated -> FinalEvaluated -> Accepted`.
/// `Accepted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    Pending,
    FastEvaluated,
    Escalated,
    FinalEvaluated,
    Accepted,
}

/// Float seam for code shared between the f32 and f64 tiers (scalar kernel,
/// SoA packing). Deliberately tiny; the SIMD side has its own contract in
/// `compute::simd_abstraction`.
pub trait Precision:
    Copy + PartialOrd + std::ops::Add<Output = Self> + std::ops::Mul<Output = Self>
{
    const ZERO: Self;

    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Precision for f32 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Precision for f64 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        v
    }
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_bases_case_insensitively() {
        assert_eq!(encode_base(b'A'), 0);
        assert_eq!(encode_base(b'c'), 1);
        assert_eq!(encode_base(b'G'), 2);
        assert_eq!(encode_base(b't'), 3);
        assert_eq!(encode_base(b'N'), BASE_N);
        assert_eq!(encode_base(b'X'), BASE_N);
    }

    #[test]
    fn rejects_empty_sequences() {
        assert!(TestCase::new(b"", b"A", vec![30], vec![40], vec![40], vec![10]).is_err());
        assert!(TestCase::new(b"ACGT", b"", vec![], vec![], vec![], vec![]).is_err());
    }

    #[test]
    fn rejects_quality_length_mismatch() {
        let err = TestCase::new(b"ACGT", b"AC", vec![30], vec![40, 40], vec![40, 40], vec![10, 10]);
        assert!(err.is_err());
    }

    #[test]
    fn builds_and_encodes() {
        let tc = TestCase::new(
            b"ACGTN",
            b"AG",
            vec![30, 30],
            vec![40, 40],
            vec![40, 40],
            vec![10, 10],
        )
        .unwrap();
        assert_eq!(tc.haplotype(), &[0, 1, 2, 3, 4]);
        assert_eq!(tc.read(), &[0, 2]);
        assert_eq!(tc.hap_len(), 5);
        assert_eq!(tc.read_len(), 2);
    }
}
