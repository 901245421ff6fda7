use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use word2vec2d::prelude::*;

const N_WORDS: usize = 20_000;
const DIMS: usize = 100;

fn word2vec_data() -> Vec<u8> {
    let mut rng = XorShiftRng::seed_from_u64(42);
    let mut data = format!("{} {}\n", N_WORDS, DIMS).into_bytes();

    for idx in 0..N_WORDS {
        if idx == 0 {
            data.extend_from_slice(SENTINEL.as_bytes());
        } else {
            data.extend_from_slice(format!("word{}", idx).as_bytes());
        }
        data.push(b' ');

        for _ in 0..DIMS {
            data.extend_from_slice(&rng.gen_range(-1f32..1f32).to_le_bytes());
        }
        data.push(b'\n');
    }

    data
}

fn decode_benchmark(c: &mut Criterion) {
    let data = word2vec_data();

    c.bench_function("decode-all", |b| b.iter(|| decode(black_box(&data), 0)));

    c.bench_function("decode-limit-1250", |b| {
        b.iter(|| decode(black_box(&data), 1250))
    });
}

criterion_group!(benches, decode_benchmark);
criterion_main!(benches);
