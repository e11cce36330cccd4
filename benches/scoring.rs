use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lodestar::EMBEDDING_DIM;
use lodestar::quantize::{EmbeddingVector, quantize};
use lodestar::scoring::{ScoreResult, cosine_similarity_i8, select_scores};

fn pseudo_embedding(seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1);
    (0..EMBEDDING_DIM)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as f32 / (1u64 << 31) as f32) * 2.0 - 1.0
        })
        .collect()
}

fn corpus(n: usize) -> Vec<EmbeddingVector> {
    (0..n as u64)
        .map(|i| quantize(&pseudo_embedding(i)).unwrap())
        .collect()
}

fn bench_quantize(c: &mut Criterion) {
    let embedding = pseudo_embedding(42);
    c.bench_function("quantize_256", |b| {
        b.iter(|| quantize(black_box(&embedding)).unwrap());
    });
}

fn bench_cosine(c: &mut Criterion) {
    let a = quantize(&pseudo_embedding(1)).unwrap();
    let b_vec = quantize(&pseudo_embedding(2)).unwrap();
    c.bench_function("cosine_i8_256", |b| {
        b.iter(|| cosine_similarity_i8(black_box(a.as_slice()), black_box(b_vec.as_slice())));
    });
}

fn bench_score_and_select(c: &mut Criterion) {
    let query = quantize(&pseudo_embedding(u64::MAX)).unwrap();
    let mut group = c.benchmark_group("score_and_select");

    for n in [1_000usize, 10_000] {
        let vectors = corpus(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &vectors, |b, vectors| {
            b.iter(|| {
                let candidates: Vec<ScoreResult> = vectors
                    .iter()
                    .enumerate()
                    .map(|(i, v)| {
                        ScoreResult::new(
                            i.to_string(),
                            cosine_similarity_i8(query.as_slice(), v.as_slice()),
                        )
                    })
                    .collect();
                select_scores(black_box(candidates))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_quantize, bench_cosine, bench_score_and_select);
criterion_main!(benches);
