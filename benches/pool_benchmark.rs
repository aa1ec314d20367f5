/*!
 * Thread Pool Benchmarks
 *
 * Submission/completion throughput at several pool sizes, plus raw queue
 * handoff latency.
 */

use analysis_core::{SyncQueue, ThreadPool};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_submit_await(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_await");

    for threads in [2usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, &threads| {
                let pool = ThreadPool::new(threads);
                b.iter(|| {
                    for n in 0..128u64 {
                        pool.submit(move || black_box(n * 3));
                    }
                    pool.await_completion();
                });
                pool.shutdown();
            },
        );
    }

    group.finish();
}

fn bench_queue_handoff(c: &mut Criterion) {
    c.bench_function("queue_push_pop", |b| {
        let queue = SyncQueue::new();
        b.iter(|| {
            queue.push(black_box(1u64));
            black_box(queue.pop());
        });
    });
}

criterion_group!(benches, bench_submit_await, bench_queue_handoff);
criterion_main!(benches);
