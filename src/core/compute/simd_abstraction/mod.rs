//! SIMD abstraction layer
//!
//! This module exposes a single, portable surface area for the handful of
//! hot SIMD operations used by the forward kernel. It hides ISA differences
//! between x86_64 (SSE2/AVX/AVX-512F) and aarch64 (NEON) behind the
//! `SimdFloat` trait, while preserving zero-cost calls to architecture
//! intrinsics.
//!
//! The abstraction is intentionally small and opinionated: all functions are
//! unsafe and operate on architecture-specific vector types, but with a
//! uniform API and identical semantics across widths. The forward recurrence
//! is purely additive/multiplicative, so the contract is tiny: broadcast,
//! load/store, add, multiply, equality compare, and mask select.
//!
//! ## Engines and widths
//!
//! Each engine is specific to one precision tier:
//! - `Engine128F32` / `Engine128F64`: 128-bit vectors - 4 f32 / 2 f64 lanes
//!   (SSE2 on x86_64; NEON on aarch64)
//! - `Engine256F32` / `Engine256F64`: 256-bit vectors - 8 f32 / 4 f64 lanes
//!   (AVX on x86_64)
//! - `Engine512F32` / `Engine512F64`: 512-bit vectors - 16 f32 / 8 f64 lanes
//!   (AVX-512F on x86_64, behind the `avx512` feature)
//!
//! ## Runtime dispatch pattern
//!
//! Feature detection runs once at evaluator construction and the chosen
//! engine is kept in a lightweight enum (`simd::SimdEngineType`).
//! Performance-critical paths switch on that enum to call the best
//! available implementation; see `core::pairhmm::dispatch`.
//!
//! ## Safety model
//!
//! All trait functions are `unsafe` because they may require specific CPU
//! features (e.g. AVX) and dereference raw pointers for loads/stores.
//! Callers must ensure that the chosen engine matches the CPU's supported
//! features (handled by runtime detection in this crate) and that pointer
//! arguments are valid for the accessed width.

/// Minimal SIMD contract for the forward kernel, one precision at a time.
///
/// `Mask` is engine-specific: a full-width all-ones/all-zeros vector on
/// SSE/AVX/NEON, a compact mask register on AVX-512.
pub trait SimdFloat: Copy {
    /// Scalar element type (f32 or f64).
    type Elem: Copy;
    /// Architecture-specific vector type.
    type Vec: Copy;
    /// Comparison-result type consumed by `blendv`.
    type Mask: Copy;

    /// Number of lanes processed in parallel.
    const LANES: usize;

    /// All lanes zero.
    unsafe fn setzero() -> Self::Vec;
    /// Broadcast a scalar into all lanes.
    unsafe fn set1(x: Self::Elem) -> Self::Vec;
    /// Load a vector from an unaligned pointer.
    unsafe fn loadu(p: *const Self::Elem) -> Self::Vec;
    /// Store a vector to an unaligned pointer.
    unsafe fn storeu(p: *mut Self::Elem, v: Self::Vec);
    /// Per-lane addition.
    unsafe fn add(a: Self::Vec, b: Self::Vec) -> Self::Vec;
    /// Per-lane multiplication.
    unsafe fn mul(a: Self::Vec, b: Self::Vec) -> Self::Vec;
    /// Per-lane ordered equality compare.
    unsafe fn cmpeq(a: Self::Vec, b: Self::Vec) -> Self::Mask;
    /// Combine two comparison masks (lane-wise OR).
    unsafe fn mask_or(a: Self::Mask, b: Self::Mask) -> Self::Mask;
    /// Select lanes from `b` where the mask is set, else from `a`.
    unsafe fn blendv(a: Self::Vec, b: Self::Vec, mask: Self::Mask) -> Self::Vec;
}

pub mod engine128;
#[cfg(target_arch = "x86_64")]
pub mod engine256;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub mod engine512;
pub mod simd;

pub use engine128::{Engine128F32, Engine128F64};
#[cfg(target_arch = "x86_64")]
pub use engine256::{Engine256F32, Engine256F64};
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub use engine512::{Engine512F32, Engine512F64};
pub use simd::{detect_optimal_simd_engine, simd_engine_description, SimdEngineType};
