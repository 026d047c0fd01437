// Enable unstable features for AVX-512 support (requires nightly Rust)
#![cfg_attr(feature = "avx512", feature(stdarch_x86_avx512))]
#![cfg_attr(feature = "avx512", feature(avx512_target_feature))]

//! FerrousPairHmm - vectorized PairHMM forward-algorithm evaluator.
//!
//! Computes, for batches of (haplotype, read) pairs, the log10 probability
//! that a sequencing read was generated from a candidate haplotype under a
//! three-state pair hidden Markov model (match/insertion/deletion), given
//! per-base quality-derived error probabilities and gap-open /
//! gap-continuation probabilities. This is the genotype-likelihood core
//! consumed by variant-calling pipelines.
//!
//! The evaluator runs every pair through a reduced-precision (f32) SIMD
//! backend first and transparently re-evaluates numerically unreliable
//! pairs in f64. Backend width (SSE2/NEON, AVX, optionally AVX-512) is
//! detected once at construction; a scalar fallback keeps results correct
//! on hardware without vector units.

pub mod core;
pub mod defaults;
pub mod error;
pub mod io;

pub use crate::core::pairhmm::evaluator::{PairHmm, PairHmmConfig};
pub use crate::core::pairhmm::types::TestCase;
pub use crate::error::{PairHmmError, Result};
