//! Criterion benchmarks for the core heap operations
//!
//! Workloads are deterministic (an LCG stands in for a RNG) so runs are
//! comparable across machines and commits.
//!
//! ```bash
//! cargo bench --bench heap_benchmark
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fibheap::FibonacciHeap;

/// Deterministic pseudo-random priorities.
fn priorities(n: usize) -> Vec<u64> {
    let mut state = 0x9e3779b97f4a7c15u64;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            state >> 33
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[1_000usize, 10_000, 100_000] {
        let input = priorities(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let mut heap = FibonacciHeap::new();
                for (i, &p) in input.iter().enumerate() {
                    heap.insert(p, i);
                }
                black_box(heap.len())
            });
        });
    }
    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_then_drain");
    for &n in &[1_000usize, 10_000] {
        let input = priorities(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let mut heap = FibonacciHeap::new();
                for (i, &p) in input.iter().enumerate() {
                    heap.insert(p, i);
                }
                let mut acc = 0u64;
                while let Some((p, _)) = heap.extract_min() {
                    acc = acc.wrapping_add(p);
                }
                black_box(acc)
            });
        });
    }
    group.finish();
}

fn bench_decrease_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrease_key");
    for &n in &[1_000usize, 10_000] {
        let input = priorities(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let mut heap = FibonacciHeap::new();
                let handles: Vec<_> = input
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| heap.insert(p | 1, i))
                    .collect();
                // One extraction shapes the trees before the decreases.
                let _ = heap.extract_min();
                for (i, h) in handles.iter().enumerate() {
                    if heap.contains(h) {
                        let _ = heap.decrease_key(h, (i as u64) >> 1);
                    }
                }
                black_box(heap.len())
            });
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for &n in &[1_000usize, 10_000] {
        let input = priorities(2 * n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let mut heap1 = FibonacciHeap::new();
                let mut heap2 = FibonacciHeap::new();
                for (i, &p) in input[..n].iter().enumerate() {
                    heap1.insert(p, i);
                }
                for (i, &p) in input[n..].iter().enumerate() {
                    heap2.insert(p, n + i);
                }
                heap1.merge(heap2);
                black_box(heap1.len())
            });
        });
    }
    group.finish();
}

/// Chain of small merges into one accumulator heap; the merge itself is
/// constant-time pointer surgery, so this should scale with the inserts.
fn bench_merge_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_chain");
    for &chunks in &[100usize, 1_000] {
        let input = priorities(chunks * 16);
        group.bench_with_input(BenchmarkId::from_parameter(chunks), &input, |b, input| {
            b.iter(|| {
                let mut heap = FibonacciHeap::new();
                for (chunk, slice) in input.chunks(16).enumerate() {
                    let mut other = FibonacciHeap::new();
                    for (i, &p) in slice.iter().enumerate() {
                        other.insert(p, chunk * 16 + i);
                    }
                    heap.merge(other);
                }
                black_box(heap.len())
            });
        });
    }
    group.finish();
}

/// Dijkstra-like mix: insert everything, then interleave extractions with
/// bursts of decrease_key on survivors.
fn bench_sift_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("sift_workload");
    for &n in &[1_000usize, 10_000] {
        let input = priorities(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let mut heap = FibonacciHeap::new();
                let handles: Vec<_> = input
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| heap.insert(p.max(1) << 8, i))
                    .collect();

                let mut acc = 0u64;
                let mut cursor = 0usize;
                while let Some((p, _)) = heap.extract_min() {
                    acc = acc.wrapping_add(p);
                    // Relax a handful of "neighbors".
                    for step in 0..4 {
                        let idx = (cursor + step * 31) % handles.len();
                        let h = &handles[idx];
                        if heap.contains(h) {
                            let _ = heap.decrease_key(h, p.wrapping_add(step as u64));
                        }
                    }
                    cursor += 1;
                }
                black_box(acc)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_drain,
    bench_decrease_key,
    bench_merge,
    bench_merge_chain,
    bench_sift_workload
);
criterion_main!(benches);
