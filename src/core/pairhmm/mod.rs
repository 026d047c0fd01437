pub mod dispatch;
pub mod evaluator;
pub mod kernel;
pub mod quality;
pub mod scalar;
pub mod types;
pub mod workspace;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
pub mod isa_sse_neon;
#[cfg(target_arch = "x86_64")]
pub mod isa_avx;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub mod isa_avx512;

// Re-export the public surface of the evaluator
pub use evaluator::{PairHmm, PairHmmConfig};
pub use types::{PairState, PrecisionTier, TestCase};
