//! 512-bit kernel entry points (AVX-512F on x86_64, `avx512` feature).
//!
//! 16 pairs per call in the f32 tier, 8 in the f64 tier.

use crate::core::compute::simd_abstraction::{Engine512F32, Engine512F64};
use crate::core::pairhmm::kernel::{forward_kernel, KernelInputs};
use crate::core::pairhmm::workspace::MatrixRows;

/// Safety: requires AVX-512F support (guaranteed by runtime dispatch);
/// inputs must be packed at stride 16.
#[target_feature(enable = "avx512f")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn forward_f32_batch16(
    inputs: &KernelInputs<'_, f32>,
    rows: &mut MatrixRows<f32>,
    out: &mut [f64],
) {
    forward_kernel::<Engine512F32>(inputs, rows, out)
}

/// Safety: requires AVX-512F support (guaranteed by runtime dispatch);
/// inputs must be packed at stride 8.
#[target_feature(enable = "avx512f")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn forward_f64_batch8(
    inputs: &KernelInputs<'_, f64>,
    rows: &mut MatrixRows<f64>,
    out: &mut [f64],
) {
    forward_kernel::<Engine512F64>(inputs, rows, out)
}
