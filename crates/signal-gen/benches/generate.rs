use criterion::{black_box, criterion_group, criterion_main, Criterion};
use signal_gen::{generate, GeneratorParams};

fn bench_generate(c: &mut Criterion) {
    let params = GeneratorParams::default();
    c.bench_function("generate_15000_samples", |b| {
        b.iter(|| generate(black_box(&params)))
    });
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
