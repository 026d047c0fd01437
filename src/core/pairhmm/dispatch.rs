//! Dispatch to the appropriate forward kernel based on engine type.
//!
//! One lane group (at most the engine's lane count of pairs) goes in, raw
//! scaled probability sums come out. Routing is a plain match on the
//! detected `SimdEngineType`; the scalar kernel handles hardware without
//! vector units, at identical semantics.

use crate::core::compute::simd_abstraction::simd::{simd_lane_widths, SimdEngineType};
use crate::core::pairhmm::scalar::forward_scalar;
use crate::core::pairhmm::types::TestCase;
use crate::core::pairhmm::workspace::LaneBuffers;
use crate::defaults::{initial_constant_f32, initial_constant_f64};

/// Evaluate one lane group in the fast (f32) tier.
///
/// `out[k]` receives the raw scaled sum for `chunk[k]`.
pub fn forward_chunk_f32(
    engine: SimdEngineType,
    bufs: &mut LaneBuffers<f32>,
    chunk: &[&TestCase],
    out: &mut [f64],
) {
    debug_assert!(out.len() >= chunk.len());
    let init = initial_constant_f32() as f64;

    if engine == SimdEngineType::Scalar {
        for (k, tc) in chunk.iter().enumerate() {
            out[k] = forward_scalar::<f32>(tc, &mut bufs.rows, init);
        }
        return;
    }

    let (f32_lanes, _) = simd_lane_widths(engine);
    debug_assert!(chunk.len() <= f32_lanes);
    bufs.pack(chunk, f32_lanes, init);
    let (inputs, rows) = bufs.kernel_io();

    match engine {
        #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
        SimdEngineType::Engine128 => unsafe {
            super::isa_sse_neon::forward_f32_batch4(&inputs, rows, out)
        },
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        SimdEngineType::Engine128 => {
            unreachable!("128-bit engine unavailable on this architecture")
        }
        #[cfg(target_arch = "x86_64")]
        SimdEngineType::Engine256 => unsafe {
            super::isa_avx::forward_f32_batch8(&inputs, rows, out)
        },
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdEngineType::Engine512 => unsafe {
            super::isa_avx512::forward_f32_batch16(&inputs, rows, out)
        },
        SimdEngineType::Scalar => unreachable!(),
    }
}

/// Evaluate one lane group in the slow (f64) tier.
pub fn forward_chunk_f64(
    engine: SimdEngineType,
    bufs: &mut LaneBuffers<f64>,
    chunk: &[&TestCase],
    out: &mut [f64],
) {
    debug_assert!(out.len() >= chunk.len());
    let init = initial_constant_f64();

    if engine == SimdEngineType::Scalar {
        for (k, tc) in chunk.iter().enumerate() {
            out[k] = forward_scalar::<f64>(tc, &mut bufs.rows, init);
        }
        return;
    }

    let (_, f64_lanes) = simd_lane_widths(engine);
    debug_assert!(chunk.len() <= f64_lanes);
    bufs.pack(chunk, f64_lanes, init);
    let (inputs, rows) = bufs.kernel_io();

    match engine {
        #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
        SimdEngineType::Engine128 => unsafe {
            super::isa_sse_neon::forward_f64_batch2(&inputs, rows, out)
        },
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        SimdEngineType::Engine128 => {
            unreachable!("128-bit engine unavailable on this architecture")
        }
        #[cfg(target_arch = "x86_64")]
        SimdEngineType::Engine256 => unsafe {
            super::isa_avx::forward_f64_batch4(&inputs, rows, out)
        },
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdEngineType::Engine512 => unsafe {
            super::isa_avx512::forward_f64_batch8(&inputs, rows, out)
        },
        SimdEngineType::Scalar => unreachable!(),
    }
}
