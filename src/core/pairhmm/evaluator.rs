//! Batch evaluator with precision escalation.
//!
//! `PairHmm` owns the backend selection and the per-tier scratch arenas and
//! exposes the one logical operation of the core: an ordered batch of test
//! cases in, an equally long, index-aligned sequence of log10 likelihoods
//! out.
//!
//! ## Escalation policy
//!
//! Every pair is first evaluated in the fast f32 tier. A fast result is
//! accepted only if its raw scaled sum is finite and at least the
//! configured confidence floor; anything else (underflow to zero, NaN/Inf,
//! sub-floor mass) marks the pair suspect. Suspects are collected and
//! re-evaluated in the f64 tier as a second batch-level pass, keeping the
//! hot loop free of per-pair branching. A pair whose f64 sum is still zero
//! or non-finite reports the configured sentinel: an effectively impossible
//! alignment, not an error.
//!
//! Escalation is exact: no pair escalates speculatively, and no suspect
//! fast value is ever reported.

use crate::core::compute::simd_abstraction::simd::{
    detect_optimal_simd_engine, simd_engine_description, simd_lane_widths, SimdEngineType,
};
use crate::core::pairhmm::dispatch::{forward_chunk_f32, forward_chunk_f64};
use crate::core::pairhmm::types::{PairState, PrecisionTier, TestCase};
use crate::core::pairhmm::workspace::LaneBuffers;
use crate::defaults::{
    DEFAULT_IMPOSSIBLE_LOG10, DEFAULT_MIN_ACCEPTED, LOG10_INITIAL_CONSTANT_F32,
    LOG10_INITIAL_CONSTANT_F64,
};

/// Tunable policy knobs. The numeric conventions (log10, scaling
/// constants) are fixed; the floor and the impossible-alignment sentinel
/// are policy and stay configurable.
#[derive(Debug, Clone, Copy)]
pub struct PairHmmConfig {
    /// Raw scaled f32 sums below this value are suspect and re-run in f64.
    pub min_accepted: f32,
    /// Reported when even the f64 tier yields zero or non-finite mass.
    pub impossible_log10: f64,
}

impl Default for PairHmmConfig {
    fn default() -> Self {
        PairHmmConfig {
            min_accepted: DEFAULT_MIN_ACCEPTED,
            impossible_log10: DEFAULT_IMPOSSIBLE_LOG10,
        }
    }
}

/// The PairHMM evaluator. One instance per worker thread; instances are
/// cheap apart from their scratch arenas, which grow to the largest pair
/// seen and are reused across batches.
pub struct PairHmm {
    engine: SimdEngineType,
    config: PairHmmConfig,
    bufs_f32: LaneBuffers<f32>,
    bufs_f64: LaneBuffers<f64>,
}

impl PairHmm {
    /// Create an evaluator bound to the widest SIMD engine the CPU
    /// supports. The selection is fixed for the evaluator's lifetime.
    pub fn new() -> Self {
        Self::with_config(PairHmmConfig::default())
    }

    pub fn with_config(config: PairHmmConfig) -> Self {
        let engine = detect_optimal_simd_engine();
        log::debug!("PairHMM backend: {}", simd_engine_description(engine));
        Self::with_engine_and_config(engine, config)
    }

    /// Bind to a specific engine instead of detecting one. Intended for
    /// parity tests and benchmarks; the engine must be supported on the
    /// running CPU.
    pub fn with_engine(engine: SimdEngineType) -> Self {
        Self::with_engine_and_config(engine, PairHmmConfig::default())
    }

    pub fn with_engine_and_config(engine: SimdEngineType, config: PairHmmConfig) -> Self {
        PairHmm {
            engine,
            config,
            bufs_f32: LaneBuffers::new(),
            bufs_f64: LaneBuffers::new(),
        }
    }

    pub fn engine(&self) -> SimdEngineType {
        self.engine
    }

    /// Compute one log10 likelihood per test case, index-aligned with the
    /// input batch.
    pub fn compute_likelihoods(&mut self, batch: &[TestCase]) -> Vec<f64> {
        self.compute_likelihoods_tiered(batch)
            .into_iter()
            .map(|(ll, _)| ll)
            .collect()
    }

    /// Like [`compute_likelihoods`](Self::compute_likelihoods), but also
    /// reports which precision tier produced each result.
    pub fn compute_likelihoods_tiered(
        &mut self,
        batch: &[TestCase],
    ) -> Vec<(f64, PrecisionTier)> {
        let n = batch.len();
        let mut results = vec![(0.0f64, PrecisionTier::FastF32); n];
        if n == 0 {
            return results;
        }
        let mut states = vec![PairState::Pending; n];
        let (f32_lanes, f64_lanes) = simd_lane_widths(self.engine);

        let refs: Vec<&TestCase> = batch.iter().collect();
        let mut raw = vec![0.0f64; f32_lanes];
        let mut suspects: Vec<usize> = Vec::new();

        for (c, chunk) in refs.chunks(f32_lanes).enumerate() {
            let base = c * f32_lanes;
            forward_chunk_f32(self.engine, &mut self.bufs_f32, chunk, &mut raw[..chunk.len()]);
            for (k, &sum) in raw[..chunk.len()].iter().enumerate() {
                let idx = base + k;
                states[idx] = PairState::FastEvaluated;
                if sum.is_finite() && sum >= self.config.min_accepted as f64 {
                    results[idx] = (
                        sum.log10() - LOG10_INITIAL_CONSTANT_F32,
                        PrecisionTier::FastF32,
                    );
                    states[idx] = PairState::Accepted;
                } else {
                    states[idx] = PairState::Escalated;
                    suspects.push(idx);
                }
            }
        }

        if !suspects.is_empty() {
            log::debug!(
                "re-evaluating {} of {} pairs in the f64 tier",
                suspects.len(),
                n
            );
            let mut raw64 = vec![0.0f64; f64_lanes];
            for group in suspects.chunks(f64_lanes) {
                let chunk: Vec<&TestCase> = group.iter().map(|&idx| &batch[idx]).collect();
                forward_chunk_f64(
                    self.engine,
                    &mut self.bufs_f64,
                    &chunk,
                    &mut raw64[..chunk.len()],
                );
                for (k, &idx) in group.iter().enumerate() {
                    states[idx] = PairState::FinalEvaluated;
                    let sum = raw64[k];
                    let ll = if sum.is_finite() && sum > 0.0 {
                        sum.log10() - LOG10_INITIAL_CONSTANT_F64
                    } else {
                        self.config.impossible_log10
                    };
                    results[idx] = (ll, PrecisionTier::SlowF64);
                    states[idx] = PairState::Accepted;
                }
            }
        }

        debug_assert!(states.iter().all(|&s| s == PairState::Accepted));
        results
    }

    /// Convenience wrapper for a single pair.
    pub fn compute_likelihood(&mut self, tc: &TestCase) -> f64 {
        self.compute_likelihoods(std::slice::from_ref(tc))[0]
    }
}

impl Default for PairHmm {
    fn default() -> Self {
        Self::new()
    }
}
