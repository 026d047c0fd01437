//! Core computation modules: SIMD abstraction and the PairHMM evaluator.

pub mod compute;
pub mod pairhmm;
