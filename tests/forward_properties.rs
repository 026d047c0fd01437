// tests/forward_properties.rs
// Model-level properties of the forward evaluator: determinism, order
// preservation, similarity monotonicity and the prefix-match boundary.

use ferrous_pairhmm::{PairHmm, TestCase};

fn uniform_case(hap: &[u8], read: &[u8], q: u8) -> TestCase {
    let n = read.len();
    TestCase::new(hap, read, vec![q; n], vec![45; n], vec![45; n], vec![10; n]).unwrap()
}

#[test]
fn results_are_deterministic_across_evaluators() {
    let batch = vec![
        uniform_case(b"ACGTACGTACGTACGT", b"ACGTAC", 35),
        uniform_case(b"ACGTACGTACGTACGT", b"TTGTAC", 35),
        uniform_case(b"GGGGCCCCGGGGCCCC", b"GCCG", 35),
    ];
    let a = PairHmm::new().compute_likelihoods(&batch);
    let b = PairHmm::new().compute_likelihoods(&batch);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

#[test]
fn batched_results_equal_single_pair_results() {
    // Batching must not change any pair's value: the i-th result belongs
    // to the i-th input no matter how lanes are grouped.
    let batch: Vec<TestCase> = (0..11)
        .map(|k| {
            let hap = b"ACGTACGTACGTACGTACGT";
            let read = &hap[k..k + 6];
            uniform_case(hap, read, 30 + (k % 10) as u8)
        })
        .collect();

    let mut hmm = PairHmm::new();
    let together = hmm.compute_likelihoods(&batch);

    for (k, tc) in batch.iter().enumerate() {
        let alone = hmm.compute_likelihood(tc);
        assert_eq!(
            together[k].to_bits(),
            alone.to_bits(),
            "pair {k} changed value when batched"
        );
    }
}

#[test]
fn likelihood_is_monotone_in_read_similarity() {
    // Fewer mismatches against a fixed haplotype must never lower the
    // likelihood.
    let hap = b"ACGTACGTACGTACGT";
    let reads: [&[u8]; 4] = [b"ACGTACGT", b"ACGTACGA", b"ACGAACGA", b"TCGAACGA"];

    let mut hmm = PairHmm::new();
    let lls: Vec<f64> = reads
        .iter()
        .map(|r| hmm.compute_likelihood(&uniform_case(hap, r, 30)))
        .collect();

    for w in lls.windows(2) {
        assert!(
            w[0] >= w[1],
            "likelihood increased with more mismatches: {lls:?}"
        );
    }
}

#[test]
fn perfect_prefix_match_scores_near_zero() {
    // A read identical to a haplotype substring with maximal-confidence
    // qualities loses almost no mass.
    let mut hmm = PairHmm::new();
    let ll = hmm.compute_likelihood(&uniform_case(b"ACGTACGT", b"ACGT", 60));
    assert!(ll < 0.0);
    assert!(ll > -1.0, "expected near-zero log10 likelihood, got {ll}");
}

#[test]
fn matching_read_beats_clashing_read() {
    // ACGT vs TTTT against the same haplotype under the same qualities.
    let mut hmm = PairHmm::new();
    let ll_match = hmm.compute_likelihood(&uniform_case(b"ACGTACGT", b"ACGT", 40));
    let ll_clash = hmm.compute_likelihood(&uniform_case(b"ACGTACGT", b"TTTT", 40));
    assert!(
        ll_match > ll_clash + 5.0,
        "expected a wide margin: {ll_match} vs {ll_clash}"
    );
}

#[test]
fn longer_haplotype_dilutes_the_start_distribution() {
    // Boundary mass is split across haplotype start positions, so doubling
    // the haplotype with non-matching sequence costs about log10(2).
    let mut hmm = PairHmm::new();
    let short = hmm.compute_likelihood(&uniform_case(b"ACGTACGT", b"ACGT", 50));
    let long = hmm.compute_likelihood(&uniform_case(b"ACGTACGTCCCCCCCC", b"ACGT", 50));
    let delta = short - long;
    assert!(
        (delta - 2f64.log10()).abs() < 0.15,
        "expected ~log10(2) dilution, got {delta}"
    );
}
