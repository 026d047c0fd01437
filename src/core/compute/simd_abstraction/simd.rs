//! Runtime SIMD engine detection and management.
//!
//! Detection runs once (at evaluator construction); the result is a plain
//! enum that hot paths match on. The selection is never re-evaluated per
//! batch.

/// Available SIMD engine types based on CPU capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdEngineType {
    /// No vector unit (or forced off) - scalar kernel only
    Scalar,
    /// 128-bit SIMD (SSE2/NEON)
    Engine128,
    /// 256-bit SIMD (AVX) - x86_64 only
    #[cfg(target_arch = "x86_64")]
    Engine256,
    /// 512-bit SIMD (AVX-512F) - x86_64 only (requires avx512 feature flag)
    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
    Engine512,
}

/// Detects the optimal SIMD engine based on CPU features
///
/// Environment variable overrides for testing/debugging:
/// - `FERROUS_PAIRHMM_FORCE_SCALAR=1`: Force the scalar kernel everywhere
/// - `FERROUS_PAIRHMM_FORCE_SSE=1`: Force the 128-bit engine (x86_64 only)
/// - `FERROUS_PAIRHMM_FORCE_AVX=1`: Force the 256-bit engine, skipping
///   AVX-512 (x86_64 only)
pub fn detect_optimal_simd_engine() -> SimdEngineType {
    if std::env::var("FERROUS_PAIRHMM_FORCE_SCALAR")
        .map(|v| v == "1")
        .unwrap_or(false)
    {
        log::info!("FERROUS_PAIRHMM_FORCE_SCALAR=1: Using scalar kernel");
        return SimdEngineType::Scalar;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if std::env::var("FERROUS_PAIRHMM_FORCE_SSE")
            .map(|v| v == "1")
            .unwrap_or(false)
        {
            log::info!("FERROUS_PAIRHMM_FORCE_SSE=1: Using SSE (128-bit) engine");
            return SimdEngineType::Engine128;
        }

        #[cfg(feature = "avx512")]
        {
            let force_avx = std::env::var("FERROUS_PAIRHMM_FORCE_AVX")
                .map(|v| v == "1")
                .unwrap_or(false);
            if !force_avx && is_x86_feature_detected!("avx512f") {
                return SimdEngineType::Engine512;
            }
            if force_avx {
                log::info!("FERROUS_PAIRHMM_FORCE_AVX=1: Using AVX (256-bit) engine");
            }
        }

        if is_x86_feature_detected!("avx") {
            return SimdEngineType::Engine256;
        }

        // SSE2 is baseline on x86_64
        SimdEngineType::Engine128
    }

    #[cfg(target_arch = "aarch64")]
    {
        // NEON is baseline on aarch64
        SimdEngineType::Engine128
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdEngineType::Scalar
    }
}

/// Returns a human-readable description of the SIMD engine
pub fn simd_engine_description(engine: SimdEngineType) -> &'static str {
    match engine {
        SimdEngineType::Scalar => "scalar (no SIMD)",
        SimdEngineType::Engine128 => {
            #[cfg(target_arch = "x86_64")]
            {
                "SSE2 (128-bit, 4 f32 / 2 f64 lanes)"
            }
            #[cfg(not(target_arch = "x86_64"))]
            {
                "NEON (128-bit, 4 f32 / 2 f64 lanes)"
            }
        }
        #[cfg(target_arch = "x86_64")]
        SimdEngineType::Engine256 => "AVX (256-bit, 8 f32 / 4 f64 lanes)",
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdEngineType::Engine512 => "AVX-512 (512-bit, 16 f32 / 8 f64 lanes)",
    }
}

/// Returns the lane counts `(f32_lanes, f64_lanes)` for a given engine.
///
/// These are the chunk sizes the batching layer packs pairs into: the fast
/// pass groups `f32_lanes` pairs per kernel call, the escalation pass
/// `f64_lanes`.
pub fn simd_lane_widths(engine: SimdEngineType) -> (usize, usize) {
    match engine {
        SimdEngineType::Scalar => (1, 1),
        SimdEngineType::Engine128 => (4, 2),
        #[cfg(target_arch = "x86_64")]
        SimdEngineType::Engine256 => (8, 4),
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdEngineType::Engine512 => (16, 8),
    }
}
