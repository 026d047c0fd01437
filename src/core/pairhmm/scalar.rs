//! Scalar forward kernel.
//!
//! The direct, single-pair implementation of the three-state forward
//! recurrence. It serves as the fallback backend on hardware without vector
//! units and as the reference the SIMD kernels are tested against: a SIMD
//! lane must reproduce this function's result for the same pair at the same
//! precision.
//!
//! The recurrence works on probabilities scaled by the tier's initial
//! constant. Row 0 seeds the deletion matrix with `constant / hap_len` at
//! every haplotype position (alignment may start anywhere on the
//! haplotype); column 0 stays at zero (no read base consumed yet means no
//! mass). The returned value is the raw scaled sum of the final row across
//! all three matrices; the caller converts to log10.

use crate::core::pairhmm::quality::qual_to_error_prob;
use crate::core::pairhmm::types::{Precision, TestCase, BASE_N};
use crate::core::pairhmm::workspace::MatrixRows;

/// Run the forward recurrence for one pair at precision `F`, reusing the
/// given rolling rows. Returns the raw scaled probability sum as f64.
pub fn forward_scalar<F: Precision>(
    tc: &TestCase,
    rows: &mut MatrixRows<F>,
    initial_constant: f64,
) -> f64 {
    let hap = tc.haplotype();
    let read = tc.read();
    let cols = hap.len();

    rows.ensure(1, cols);

    let init_d = F::from_f64(initial_constant / cols as f64);
    for j in 0..=cols {
        rows.m_prev[j] = F::ZERO;
        rows.i_prev[j] = F::ZERO;
        rows.d_prev[j] = init_d;
    }

    let bq = tc.base_quality();
    let iq = tc.insertion_quality();
    let dq = tc.deletion_quality();
    let gq = tc.gap_continuation_quality();

    for i in 1..=read.len() {
        let p_err = qual_to_error_prob(bq[i - 1]);
        let p_ins = qual_to_error_prob(iq[i - 1]);
        let p_del = qual_to_error_prob(dq[i - 1]);
        let p_gcp = qual_to_error_prob(gq[i - 1]);

        let t_match_match = F::from_f64((1.0 - (p_ins + p_del)).max(0.0));
        let t_indel_match = F::from_f64(1.0 - p_gcp);
        let t_match_ins = F::from_f64(p_ins);
        let t_ins_ins = F::from_f64(p_gcp);
        let t_match_del = F::from_f64(p_del);
        let t_del_del = F::from_f64(p_gcp);

        let emit_match = F::from_f64(1.0 - p_err);
        let emit_mismatch = F::from_f64(p_err / 3.0);

        let read_base = read[i - 1];

        rows.m_curr[0] = F::ZERO;
        rows.i_curr[0] = F::ZERO;
        rows.d_curr[0] = F::ZERO;

        for j in 1..=cols {
            let hap_base = hap[j - 1];
            let matches = read_base == hap_base || read_base == BASE_N || hap_base == BASE_N;
            let prior = if matches { emit_match } else { emit_mismatch };

            let m_val = prior
                * (rows.m_prev[j - 1] * t_match_match
                    + (rows.i_prev[j - 1] + rows.d_prev[j - 1]) * t_indel_match);
            let i_val = rows.m_prev[j] * t_match_ins + rows.i_prev[j] * t_ins_ins;
            let d_val = rows.m_curr[j - 1] * t_match_del + rows.d_curr[j - 1] * t_del_del;

            rows.m_curr[j] = m_val;
            rows.i_curr[j] = i_val;
            rows.d_curr[j] = d_val;
        }

        rows.swap();
    }

    // After the final swap the last computed row sits in the `prev` slots.
    let mut acc = F::ZERO;
    for j in 1..=cols {
        acc = acc + rows.m_prev[j] + rows.i_prev[j] + rows.d_prev[j];
    }
    acc.to_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{initial_constant_f64, LOG10_INITIAL_CONSTANT_F64};

    fn uniform_case(hap: &[u8], read: &[u8], q: u8) -> TestCase {
        let n = read.len();
        TestCase::new(hap, read, vec![q; n], vec![45; n], vec![45; n], vec![10; n]).unwrap()
    }

    fn log10_likelihood(tc: &TestCase) -> f64 {
        let mut rows = MatrixRows::new();
        let sum = forward_scalar::<f64>(tc, &mut rows, initial_constant_f64());
        sum.log10() - LOG10_INITIAL_CONSTANT_F64
    }

    #[test]
    fn perfect_prefix_match_scores_near_zero() {
        // A high-confidence read identical to a haplotype substring loses
        // almost no mass; log10 should be close to 0.
        let tc = uniform_case(b"ACGTACGT", b"ACGT", 60);
        let ll = log10_likelihood(&tc);
        assert!(ll < 0.0, "log-likelihood must be negative, got {ll}");
        assert!(ll > -1.0, "expected near-zero log-likelihood, got {ll}");
    }

    #[test]
    fn dissimilar_read_scores_much_lower() {
        let matching = uniform_case(b"ACGTACGT", b"ACGT", 40);
        let clashing = uniform_case(b"ACGTACGT", b"TTTT", 40);
        let ll_match = log10_likelihood(&matching);
        let ll_clash = log10_likelihood(&clashing);
        assert!(
            ll_match > ll_clash + 5.0,
            "expected a wide gap, got {ll_match} vs {ll_clash}"
        );
    }

    #[test]
    fn unknown_bases_match_everything() {
        let with_n = uniform_case(b"ACGTACGT", b"ANGT", 40);
        let exact = uniform_case(b"ACGTACGT", b"ACGT", 40);
        let ll_n = log10_likelihood(&with_n);
        let ll_exact = log10_likelihood(&exact);
        // an N read base is treated as a match, so the two should be close
        assert!((ll_n - ll_exact).abs() < 0.1, "{ll_n} vs {ll_exact}");
    }

    #[test]
    fn result_is_deterministic() {
        let tc = uniform_case(b"ACGTACGTACGTACGT", b"CGTAC", 35);
        let mut rows = MatrixRows::new();
        let a = forward_scalar::<f64>(&tc, &mut rows, initial_constant_f64());
        let b = forward_scalar::<f64>(&tc, &mut rows, initial_constant_f64());
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn f32_tier_underflows_on_long_low_quality_reads() {
        // Every row is a mismatch costing p_err/3 (~2^-2.6); 400 rows
        // exhaust the f32 range even with the 2^120 scaling.
        let len = 400;
        let hap = vec![b'A'; len + 16];
        let read = vec![b'C'; len];
        let tc = TestCase::new(
            &hap,
            &read,
            vec![3; len],
            vec![45; len],
            vec![45; len],
            vec![10; len],
        )
        .unwrap();

        let mut rows32 = MatrixRows::new();
        let fast = forward_scalar::<f32>(&tc, &mut rows32, 2.0f64.powi(120));
        assert_eq!(fast, 0.0, "expected f32 underflow, got {fast}");

        let mut rows64 = MatrixRows::new();
        let slow = forward_scalar::<f64>(&tc, &mut rows64, initial_constant_f64());
        assert!(slow > 0.0, "f64 tier must survive, got {slow}");
    }
}
