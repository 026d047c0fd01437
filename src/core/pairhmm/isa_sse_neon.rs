//! 128-bit kernel entry points (SSE2 on x86_64, NEON on aarch64).
//!
//! Thin bindings of the shared kernel to the baseline 128-bit engines:
//! 4 pairs per call in the f32 tier, 2 in the f64 tier. No `target_feature`
//! attribute is needed because SSE2 and NEON are baseline on their
//! architectures.

use crate::core::compute::simd_abstraction::{Engine128F32, Engine128F64};
use crate::core::pairhmm::kernel::{forward_kernel, KernelInputs};
use crate::core::pairhmm::workspace::MatrixRows;

/// Safety: inputs must be packed at stride 4.
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn forward_f32_batch4(
    inputs: &KernelInputs<'_, f32>,
    rows: &mut MatrixRows<f32>,
    out: &mut [f64],
) {
    forward_kernel::<Engine128F32>(inputs, rows, out)
}

/// Safety: inputs must be packed at stride 2.
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn forward_f64_batch2(
    inputs: &KernelInputs<'_, f64>,
    rows: &mut MatrixRows<f64>,
    out: &mut [f64],
) {
    forward_kernel::<Engine128F64>(inputs, rows, out)
}
