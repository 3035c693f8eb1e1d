use criterion::{Criterion, black_box, criterion_group, criterion_main};

use blockpool::{MappedPool, Mode};

const BLOCK_SIZE: usize = 32;
const BLOCKS: usize = 1024;

//  Single-Thread Round-Trip.
//
//  This benchmark repeatedly allocates and releases one block on a single thread.
//
//  This is the pool's target workload, and measures the lower-bound of its latency against the system allocator.
fn single_threaded_round_trip(c: &mut Criterion) {
    let mut pool = MappedPool::with_capacity(BLOCK_SIZE, BLOCKS, Mode::Release).expect("Mapped");

    c.bench_function("ST Round-trip - pool", |b| b.iter(|| {
        let pointer = pool.allocate().expect("Allocated");
        black_box(pointer);
        pool.free(pointer.as_ptr()).expect("Released");
    }));

    c.bench_function("ST Round-trip - sys", |b| b.iter(|| {
        let v = black_box(Box::new([0u8; BLOCK_SIZE]));
        drop(v);
    }));
}

//  Single-Thread Round-Trip, diagnostics mode.
//
//  Same workload with fills and sentinels active, measuring the cost of the checked path.
fn single_threaded_round_trip_diagnostics(c: &mut Criterion) {
    let mut pool = MappedPool::with_capacity(BLOCK_SIZE, BLOCKS, Mode::Diagnostics).expect("Mapped");

    c.bench_function("ST Round-trip - pool (diagnostics)", |b| b.iter(|| {
        let pointer = pool.allocate().expect("Allocated");
        black_box(pointer);
        pool.free(pointer.as_ptr()).expect("Released");
    }));
}

//  Single-Thread Drain.
//
//  This benchmark allocates every block of the pool, then releases them all, exercising the run-shrinking pop and
//  the LIFO push across the whole region.
fn single_threaded_drain(c: &mut Criterion) {
    let mut pool = MappedPool::with_capacity(BLOCK_SIZE, BLOCKS, Mode::Release).expect("Mapped");
    let mut pointers = Vec::with_capacity(pool.pool().capacity());

    c.bench_function("ST Drain - pool", |b| b.iter(|| {
        for _ in 0..BLOCKS {
            pointers.push(pool.allocate().expect("Allocated"));
        }

        for pointer in pointers.drain(..) {
            pool.free(pointer.as_ptr()).expect("Released");
        }
    }));
}

criterion_group!(
    benches,
    single_threaded_round_trip,
    single_threaded_round_trip_diagnostics,
    single_threaded_drain
);
criterion_main!(benches);
