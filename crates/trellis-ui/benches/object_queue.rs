//! Benchmarks for the refresh queue.
//!
//! Compares the lock-free queue against a mutex-guarded `VecDeque` for:
//! - Single-threaded push/drain bursts
//! - Several producers feeding one consumer

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use parking_lot::Mutex;
use trellis_ui::ObjectQueue;

fn bench_burst(c: &mut Criterion) {
    trellis_core::logging::init();
    let mut group = c.benchmark_group("queue/burst");

    for count in [16, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("object_queue", count), &count, |b, &count| {
            let queue = ObjectQueue::new();
            b.iter(|| {
                for i in 0..count {
                    queue.push(black_box(i));
                }
                black_box(queue.drain().count())
            });
        });

        group.bench_with_input(BenchmarkId::new("mutex_deque", count), &count, |b, &count| {
            let queue = Mutex::new(VecDeque::new());
            b.iter(|| {
                for i in 0..count {
                    queue.lock().push_back(black_box(i));
                }
                black_box(queue.lock().drain(..).count())
            });
        });
    }

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    const PER_PRODUCER: usize = 2_000;
    let mut group = c.benchmark_group("queue/contended");

    for producers in [2, 4] {
        group.bench_with_input(
            BenchmarkId::new("object_queue", producers),
            &producers,
            |b, &producers| {
                let queue = Arc::new(ObjectQueue::new());
                b.iter(|| {
                    thread::scope(|scope| {
                        for _ in 0..producers {
                            let queue = &queue;
                            scope.spawn(move || {
                                for i in 0..PER_PRODUCER {
                                    queue.push(i);
                                }
                            });
                        }
                        let mut received = 0;
                        while received < producers * PER_PRODUCER {
                            received += queue.drain().count();
                        }
                    });
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("mutex_deque", producers),
            &producers,
            |b, &producers| {
                let queue = Arc::new(Mutex::new(VecDeque::new()));
                b.iter(|| {
                    thread::scope(|scope| {
                        for _ in 0..producers {
                            let queue = &queue;
                            scope.spawn(move || {
                                for i in 0..PER_PRODUCER {
                                    queue.lock().push_back(i);
                                }
                            });
                        }
                        let mut received = 0;
                        while received < producers * PER_PRODUCER {
                            received += queue.lock().drain(..).count();
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_burst, bench_contended);
criterion_main!(benches);
