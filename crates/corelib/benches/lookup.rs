use corelib::{HashRing, RingBuilder, Xxh3Partitioner};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn ring_of(nodes: usize) -> HashRing {
    let mut ring = HashRing::new();
    for i in 0..nodes {
        ring.add_node(&format!("cell{}", i)).unwrap();
    }
    ring
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for nodes in [2usize, 16, 128] {
        let ring = ring_of(nodes);
        group.bench_with_input(BenchmarkId::new("md5", nodes), &ring, |b, ring| {
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                black_box(ring.lookup(&format!("rider:{}", i)).unwrap());
            })
        });
    }

    let ring = RingBuilder::new()
        .with_partitioner(Xxh3Partitioner)
        .add_node("cell1")
        .add_node("cell2")
        .build()
        .unwrap();
    group.bench_function("xxh3/2", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            black_box(ring.lookup(&format!("rider:{}", i)).unwrap());
        })
    });
    group.finish();
}

fn bench_membership(c: &mut Criterion) {
    let mut ring = ring_of(16);
    c.bench_function("add_remove/16", |b| {
        b.iter(|| {
            ring.add_node("churn").unwrap();
            ring.remove_node("churn").unwrap();
        })
    });
}

criterion_group!(benches, bench_lookup, bench_membership);
criterion_main!(benches);
