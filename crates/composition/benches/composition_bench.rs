//! Performance benchmarks for the composition crate.
//!
//! These measure the chain primitives and the yard protocol at consist
//! sizes well past anything a real engine pulls, to catch accidental
//! quadratic walks.
//!
//! Run with: cargo bench -p composition --features bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use composition::manifest::{yard_manifest, yard_snapshot};
use composition::test_harness::TestYard;
use composition::train::{Locomotive, YardState};
use composition::wagon::{RollingStock, WagonId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Single coupled chain of `len` passenger wagons; returns the head id.
fn build_chain(stock: &mut RollingStock, len: u32) -> WagonId {
    let head = stock.add_passenger_wagon(40);
    let mut tail = head;
    for _ in 1..len {
        let id = stock.add_passenger_wagon(40);
        stock.attach_tail(tail, id).expect("fresh wagons are unlinked");
        tail = id;
    }
    head
}

/// Yard with `trains` empty trains of the given engine capacity and a
/// registry of `wagons` loose passenger wagons.
fn build_yard(trains: u32, capacity: u32, wagons: u32) -> (YardState, RollingStock) {
    let mut yard = YardState::default();
    for i in 0..trains {
        yard.add_train(
            Locomotive::new(6400 + i, capacity),
            "Amsterdam".to_string(),
            "Utrecht".to_string(),
        );
    }
    let mut stock = RollingStock::default();
    for _ in 0..wagons {
        stock.add_passenger_wagon(40);
    }
    (yard, stock)
}

// ---------------------------------------------------------------------------
// 1. Chain building
// ---------------------------------------------------------------------------

fn bench_chain_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_building");

    group.bench_function("register_and_couple_1000", |b| {
        b.iter(|| {
            let mut stock = RollingStock::default();
            let head = build_chain(&mut stock, 1000);
            black_box((head, stock.len()));
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// 2. Chain walks (the linear scans behind every query)
// ---------------------------------------------------------------------------

fn bench_chain_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_queries");

    for len in [10u32, 100, 1000] {
        let mut stock = RollingStock::default();
        let head = build_chain(&mut stock, len);
        let mut yard = YardState::default();
        let train = yard.add_train(
            Locomotive::new(24531, len),
            "Amsterdam".to_string(),
            "Paris".to_string(),
        );
        yard.attach_to_rear(&mut stock, train, head);
        let t = yard.train(train).unwrap();

        group.bench_with_input(BenchmarkId::new("wagon_at_tail", len), &len, |b, &n| {
            b.iter(|| black_box(t.wagon_at(&stock, n as usize - 1)));
        });
        group.bench_with_input(BenchmarkId::new("wagon_by_id_tail", len), &len, |b, &n| {
            b.iter(|| black_box(t.wagon_by_id(&stock, n - 1)));
        });
        group.bench_with_input(BenchmarkId::new("total_seats", len), &len, |b, _| {
            b.iter(|| black_box(t.total_seats(&stock)));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// 3. Shunting operations
// ---------------------------------------------------------------------------

fn bench_shunting_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("shunting");

    // Reverse twice per iteration so the chain is back in order for the next.
    let mut stock = RollingStock::default();
    let head = build_chain(&mut stock, 1000);
    let mut yard = YardState::default();
    let train = yard.add_train(
        Locomotive::new(24531, 1000),
        "Amsterdam".to_string(),
        "Paris".to_string(),
    );
    yard.attach_to_rear(&mut stock, train, head);

    group.bench_function("reverse_1000_twice", |b| {
        b.iter(|| {
            yard.reverse(&mut stock, train);
            black_box(yard.reverse(&mut stock, train));
        });
    });

    // Move one wagon out and back; after the first iteration the state
    // oscillates between two fixed shapes.
    let mut stock2 = RollingStock::default();
    let head2 = build_chain(&mut stock2, 100);
    let mut yard2 = YardState::default();
    let src = yard2.add_train(
        Locomotive::new(1, 200),
        "Amsterdam".to_string(),
        "Paris".to_string(),
    );
    let dst = yard2.add_train(
        Locomotive::new(2, 200),
        "Amsterdam".to_string(),
        "London".to_string(),
    );
    yard2.attach_to_rear(&mut stock2, src, head2);
    let wagon = 50;

    group.bench_function("move_wagon_there_and_back", |b| {
        b.iter(|| {
            yard2.move_one_wagon(&mut stock2, src, wagon, dst);
            black_box(yard2.move_one_wagon(&mut stock2, dst, wagon, src));
        });
    });

    group.bench_function("split_50_off_and_merge_back", |b| {
        b.iter(|| {
            yard2.split_at_position(&mut stock2, src, 50, dst);
            black_box(yard2.split_at_position(&mut stock2, dst, 0, src));
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// 4. Manifest rendering and snapshot export
// ---------------------------------------------------------------------------

fn bench_manifest(c: &mut Criterion) {
    let mut group = c.benchmark_group("manifest");

    let (mut yard, mut stock) = build_yard(8, 8, 0);
    for t in 0..8u32 {
        let head = build_chain(&mut stock, 8);
        yard.attach_to_rear(&mut stock, t, head);
    }
    // Two loose chains so the free-chain path is exercised too.
    build_chain(&mut stock, 4);
    build_chain(&mut stock, 4);

    group.bench_function("yard_manifest_8_trains", |b| {
        b.iter(|| black_box(yard_manifest(&stock, &yard)));
    });

    group.bench_function("yard_snapshot_to_json", |b| {
        b.iter(|| black_box(serde_json::to_string(&yard_snapshot(&stock, &yard)).unwrap()));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// 5. Mixed protocol churn
// ---------------------------------------------------------------------------

fn bench_random_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_churn");

    let (mut yard, mut stock) = build_yard(3, 30, 30);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    group.bench_function("mixed_protocol_ops", |b| {
        b.iter(|| {
            let train = rng.gen_range(0..3u32);
            let other = rng.gen_range(0..3u32);
            let wagon = rng.gen_range(0..30u32);
            let verdict = match rng.gen_range(0..4u8) {
                0 => yard.attach_to_rear(&mut stock, train, wagon),
                1 => yard.move_one_wagon(&mut stock, train, wagon, other),
                2 => yard.split_at_position(&mut stock, train, 0, other),
                _ => yard.reverse(&mut stock, train),
            };
            black_box(verdict);
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// 6. Full ECS tick (stats system + validators over a populated yard)
// ---------------------------------------------------------------------------

fn bench_fixed_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecs_tick");
    group.sample_size(20);

    let mut yard = TestYard::new()
        .with_train(24531, 16, "Amsterdam", "Paris")
        .with_train(29123, 16, "Rotterdam", "Berlin")
        .with_train(30007, 16, "Utrecht", "Brussels")
        .with_train(31550, 16, "Eindhoven", "Frankfurt");
    for _ in 0..4 {
        yard = yard.with_passenger_chain(&[40; 12]);
    }
    for t in 0..4u32 {
        yard.attach(t, t * 12);
    }
    // Warm up: run a few ticks so schedules settle.
    yard.tick(10);

    group.bench_function("yard_fixed_update", |b| {
        b.iter(|| yard.tick(1));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Register all benchmark groups
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_chain_building,
    bench_chain_queries,
    bench_shunting_ops,
    bench_manifest,
    bench_random_churn,
    bench_fixed_update,
);
criterion_main!(benches);
