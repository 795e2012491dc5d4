use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use plume::{
    GeneratorConfig, IdGenStatus, MemoryTokenStore, SnowflakeGenerator, SystemClock, TimeSource,
    TokenIssuer, TokenString, UserId, UserMarker,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). One full millisecond of sequence space.
const TOTAL_IDS: usize = 4096;

/// Hot path: a fixed clock, so every poll is `Ready`.
fn benchmark_mock_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock/sequential");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator = SnowflakeGenerator::new(
                    &GeneratorConfig::default(),
                    FixedMockTime { millis: 1 },
                );
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll() {
                        Ok(IdGenStatus::Ready { id }) => {
                            black_box(id);
                        }
                        _ => unreachable!(),
                    }
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Wall clock, blocking `generate` that yields on exhaustion.
fn benchmark_clock_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("clock/sequential");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let generator = SnowflakeGenerator::new(&GeneratorConfig::default(), SystemClock::default());
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.mint::<UserMarker>().unwrap());
            }
        });
    });

    group.finish();
}

/// One generator shared across threads, yielding on `Pending`.
fn benchmark_clock_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("clock/contended");

    for thread_count in [1, 2, 4, 8] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{TOTAL_IDS}/threads/{thread_count}"),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = Arc::new(SnowflakeGenerator::new(
                            &GeneratorConfig::default(),
                            SystemClock::default(),
                        ));
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        black_box(generator.generate().unwrap());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

#[cfg(feature = "async-tokio")]
fn benchmark_clock_async(c: &mut Criterion) {
    use plume::TokioSleep;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .unwrap();

    let mut group = c.benchmark_group("clock/async");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let generator = SnowflakeGenerator::new(&GeneratorConfig::default(), SystemClock::default());
    let generator = &generator;
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.to_async(&runtime).iter(|| async move {
            for _ in 0..TOTAL_IDS {
                black_box(generator.generate_async::<TokioSleep>().await.unwrap());
            }
        });
    });

    group.finish();
}

#[cfg(not(feature = "async-tokio"))]
fn benchmark_clock_async(_: &mut Criterion) {}

fn benchmark_token_issue(c: &mut Criterion) {
    let mut group = c.benchmark_group("token");

    group.bench_function("generate", |b| {
        b.iter(|| black_box(TokenString::generate()));
    });

    let issuer = TokenIssuer::new();
    group.bench_function("issue/memory", |b| {
        b.iter_custom(|iters| {
            let store = MemoryTokenStore::new();
            let start = Instant::now();
            for _ in 0..iters {
                black_box(
                    issuer
                        .issue(&store, UserId::from_raw(1u64), Some(3600))
                        .unwrap(),
                );
            }
            start.elapsed()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_mock_sequential,
    benchmark_clock_sequential,
    benchmark_clock_contended,
    benchmark_clock_async,
    benchmark_token_issue,
);
criterion_main!(benches);
