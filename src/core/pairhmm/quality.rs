//! Quality score to probability conversion.
//!
//! The standard logarithmic quality transform `p = 10^(-q/10)` over the
//! full `u8` domain, precomputed once and shared read-only across all
//! concurrent kernel invocations. Values are clamped away from exact 0 and
//! 1: an exact 0 would make a forward transition permanently impossible, an
//! exact 1 permanently certain.

use lazy_static::lazy_static;

use crate::defaults::EVENT_PROB_EPSILON;

lazy_static! {
    /// `QUAL_TO_ERROR_PROB[q] = clamp(10^(-q/10))` for q in 0..=255.
    static ref QUAL_TO_ERROR_PROB: [f64; 256] = {
        let mut table = [0.0f64; 256];
        for (q, slot) in table.iter_mut().enumerate() {
            let p = 10f64.powf(-(q as f64) / 10.0);
            *slot = p.clamp(EVENT_PROB_EPSILON, 1.0 - EVENT_PROB_EPSILON);
        }
        table
    };
}

/// Probability that the event encoded by quality `q` (mismatch, gap open,
/// gap continuation) occurs.
#[inline]
pub fn qual_to_error_prob(q: u8) -> f64 {
    QUAL_TO_ERROR_PROB[q as usize]
}

/// Probability that the event encoded by quality `q` does not occur.
#[inline]
pub fn qual_to_prob(q: u8) -> f64 {
    1.0 - qual_to_error_prob(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_phred_values() {
        assert!((qual_to_error_prob(10) - 0.1).abs() < 1e-12);
        assert!((qual_to_error_prob(20) - 0.01).abs() < 1e-12);
        assert!((qual_to_error_prob(30) - 0.001).abs() < 1e-12);
        assert!((qual_to_prob(20) - 0.99).abs() < 1e-12);
    }

    #[test]
    fn clamped_at_the_ends() {
        // q = 0 would map to exactly 1.0 without the clamp
        assert!(qual_to_error_prob(0) < 1.0);
        assert!(qual_to_error_prob(0) > 1.0 - 2.0 * EVENT_PROB_EPSILON);
        // very high qualities are floored, never zero
        assert!(qual_to_error_prob(255) >= EVENT_PROB_EPSILON);
    }

    #[test]
    fn monotonically_non_increasing() {
        for q in 0..255u8 {
            assert!(qual_to_error_prob(q) >= qual_to_error_prob(q + 1));
        }
    }
}
