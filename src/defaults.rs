//! Numeric policy constants for the PairHMM evaluator.
//!
//! The forward recurrence works on probabilities scaled by a large power of
//! two so that mass stays representable as long as the floating-point format
//! allows. Each precision tier carries its own scaling constant; the final
//! log10 likelihood subtracts the matching `LOG10_INITIAL_CONSTANT_*`.

/// log10(2), used to derive the log-space scaling offsets below.
const LOG10_2: f64 = 0.301_029_995_663_981_2;

/// Binary exponent of the f32-tier scaling constant (2^120).
///
/// 2^120 sits comfortably below f32::MAX (2^128) while leaving the widest
/// possible runway before the recurrence underflows to zero.
pub const INITIAL_CONSTANT_EXP_F32: i32 = 120;

/// Binary exponent of the f64-tier scaling constant (2^1020).
pub const INITIAL_CONSTANT_EXP_F64: i32 = 1020;

/// log10 of the f32-tier scaling constant.
pub const LOG10_INITIAL_CONSTANT_F32: f64 = INITIAL_CONSTANT_EXP_F32 as f64 * LOG10_2;

/// log10 of the f64-tier scaling constant.
pub const LOG10_INITIAL_CONSTANT_F64: f64 = INITIAL_CONSTANT_EXP_F64 as f64 * LOG10_2;

/// Minimum raw (scaled) probability sum the fast tier may report before the
/// pair is considered suspect and re-evaluated in f64.
pub const DEFAULT_MIN_ACCEPTED: f32 = 1e-28;

/// Log10 value reported for a pair whose f64 evaluation still produced a
/// zero or non-finite sum: an effectively impossible alignment.
pub const DEFAULT_IMPOSSIBLE_LOG10: f64 = f64::NEG_INFINITY;

/// Clamp applied to quality-derived event probabilities. Exact 0 or 1 would
/// make forward transitions permanently impossible or certain.
pub const EVENT_PROB_EPSILON: f64 = 1e-10;

/// Returns the f32-tier scaling constant (2^120).
#[inline]
pub fn initial_constant_f32() -> f32 {
    (INITIAL_CONSTANT_EXP_F32 as f32).exp2()
}

/// Returns the f64-tier scaling constant (2^1020).
#[inline]
pub fn initial_constant_f64() -> f64 {
    (INITIAL_CONSTANT_EXP_F64 as f64).exp2()
}
