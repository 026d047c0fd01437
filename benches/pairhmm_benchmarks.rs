use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ferrous_pairhmm::core::compute::simd_abstraction::simd::{
    detect_optimal_simd_engine, SimdEngineType,
};
use ferrous_pairhmm::{PairHmm, TestCase};

fn generate_random_sequence(len: usize, seed: u64) -> Vec<u8> {
    // Simple LCG random number generator for reproducible sequences
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            b"ACGT"[(rng / 65536) as usize % 4]
        })
        .collect()
}

fn generate_sequence_with_mutations(seq: &[u8], mutation_rate: f64, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    seq.iter()
        .map(|&base| {
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            let rand_val = (rng % 1000) as f64 / 1000.0;
            if rand_val < mutation_rate {
                let idx = b"ACGT".iter().position(|&b| b == base).unwrap_or(0);
                b"ACGT"[(idx + 1 + ((rng / 1000) % 3) as usize) % 4]
            } else {
                base
            }
        })
        .collect()
}

fn build_batch(n_pairs: usize, hap_len: usize, read_len: usize) -> Vec<TestCase> {
    (0..n_pairs)
        .map(|k| {
            let hap = generate_random_sequence(hap_len, 0xFEED + k as u64);
            let read_src = generate_sequence_with_mutations(&hap[..read_len], 0.02, 0xBEEF + k as u64);
            TestCase::new(
                &hap,
                &read_src,
                vec![30; read_len],
                vec![45; read_len],
                vec![45; read_len],
                vec![10; read_len],
            )
            .unwrap()
        })
        .collect()
}

/// Benchmark the detected SIMD backend against the scalar kernel at
/// typical short-read lengths.
fn bench_scalar_vs_simd(c: &mut Criterion) {
    let engine = detect_optimal_simd_engine();

    let mut group = c.benchmark_group("pairhmm_forward");
    for &read_len in &[50usize, 100, 150] {
        let hap_len = read_len * 2;
        let batch = build_batch(64, hap_len, read_len);
        group.throughput(Throughput::Elements(batch.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("scalar", read_len),
            &batch,
            |b, batch| {
                let mut hmm = PairHmm::with_engine(SimdEngineType::Scalar);
                b.iter(|| black_box(hmm.compute_likelihoods(black_box(batch))));
            },
        );

        group.bench_with_input(
            BenchmarkId::new(format!("{engine:?}"), read_len),
            &batch,
            |b, batch| {
                let mut hmm = PairHmm::with_engine(engine);
                b.iter(|| black_box(hmm.compute_likelihoods(black_box(batch))));
            },
        );
    }
    group.finish();
}

/// Benchmark batch-size scaling at a fixed read length.
fn bench_batch_sizes(c: &mut Criterion) {
    let engine = detect_optimal_simd_engine();

    let mut group = c.benchmark_group("pairhmm_batch_size");
    for &n_pairs in &[8usize, 64, 256] {
        let batch = build_batch(n_pairs, 200, 100);
        group.throughput(Throughput::Elements(n_pairs as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_pairs),
            &batch,
            |b, batch| {
                let mut hmm = PairHmm::with_engine(engine);
                b.iter(|| black_box(hmm.compute_likelihoods(black_box(batch))));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_scalar_vs_simd, bench_batch_sizes);
criterion_main!(benches);
