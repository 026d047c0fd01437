//! 256-bit kernel entry points (AVX on x86_64).
//!
//! 8 pairs per call in the f32 tier, 4 in the f64 tier. The forward
//! recurrence uses float arithmetic only, so plain AVX suffices; AVX2 is
//! not required.

use crate::core::compute::simd_abstraction::{Engine256F32, Engine256F64};
use crate::core::pairhmm::kernel::{forward_kernel, KernelInputs};
use crate::core::pairhmm::workspace::MatrixRows;

/// Safety: requires AVX support (guaranteed by runtime dispatch); inputs
/// must be packed at stride 8.
#[target_feature(enable = "avx")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn forward_f32_batch8(
    inputs: &KernelInputs<'_, f32>,
    rows: &mut MatrixRows<f32>,
    out: &mut [f64],
) {
    forward_kernel::<Engine256F32>(inputs, rows, out)
}

/// Safety: requires AVX support (guaranteed by runtime dispatch); inputs
/// must be packed at stride 4.
#[target_feature(enable = "avx")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn forward_f64_batch4(
    inputs: &KernelInputs<'_, f64>,
    rows: &mut MatrixRows<f64>,
    out: &mut [f64],
) {
    forward_kernel::<Engine256F64>(inputs, rows, out)
}
