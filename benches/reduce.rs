use automata_minimizer::prelude::*;
use automata_minimizer::random::{random_dfa, random_nfa};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_determinize(c: &mut Criterion) {
    let mut group = c.benchmark_group("determinize");
    for size in [4, 8, 12] {
        let nfa = random_nfa(size, 2, 0.25, 0.05, size as u64);
        group.bench_with_input(BenchmarkId::from_parameter(size), &nfa, |b, nfa| {
            b.iter(|| black_box(nfa.determinize()))
        });
    }
    group.finish();
}

fn bench_minimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimize");
    for size in [16, 64, 256] {
        let dfa = random_dfa(size, 3, 0.9, size as u64);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dfa, |b, dfa| {
            b.iter(|| black_box(dfa.minimize()))
        });
    }
    group.finish();
}

fn bench_reduce(c: &mut Criterion) {
    let automaton = Automaton::from(random_nfa(10, 2, 0.2, 0.05, 42));
    c.bench_function("reduce", |b| b.iter(|| black_box(automaton.reduce())));
}

criterion_group!(benches, bench_determinize, bench_minimize, bench_reduce);
criterion_main!(benches);
