//! Collection operation benchmarks.

use algoedb_bench::utils::{generate_people, populated_memory_db, random_person};
use algoedb_core::predicate::{matches, more_than};
use algoedb_core::{record, Database, Query};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Benchmark single inserts, in memory and on disk.
fn bench_insert_one(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_one");

    group.bench_function("memory", |b| {
        let db = Database::open_in_memory().unwrap();
        let record = random_person(64);
        b.iter(|| db.insert_one(black_box(record.clone())).unwrap());
    });

    // Every insert rewrites the whole file, so cost grows with the collection
    for existing in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("file", existing), existing, |b, &existing| {
            let dir = tempfile::tempdir().unwrap();
            let db = Database::open(&dir.path().join("bench.json")).unwrap();
            db.insert_many(generate_people(existing, 64)).unwrap();
            let record = random_person(64);

            b.iter(|| {
                db.insert_one(black_box(record.clone())).unwrap();
                db.delete_one(&Query::new().eq("bio", record.get("bio").cloned()))
                    .unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark batch inserts into a fresh in-memory database.
fn bench_insert_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_many");

    for batch_size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, &batch_size| {
                let records = generate_people(batch_size, 64);
                b.iter(|| {
                    let db = Database::open_in_memory().unwrap();
                    db.insert_many(black_box(records.clone())).unwrap()
                });
            },
        );
    }
    group.finish();
}

/// Benchmark full scans with different criteria.
fn bench_find_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_many");

    for size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        let db = populated_memory_db(*size);

        group.bench_with_input(BenchmarkId::new("literal", size), size, |b, _| {
            let query = Query::new().eq("name", "ada");
            b.iter(|| db.find_many(black_box(&query)).map(|r| r.len()).unwrap_or(0));
        });

        group.bench_with_input(BenchmarkId::new("range", size), size, |b, _| {
            let query = Query::new().with("age", more_than(50));
            b.iter(|| db.find_many(black_box(&query)).map(|r| r.len()).unwrap_or(0));
        });

        group.bench_with_input(BenchmarkId::new("regex", size), size, |b, _| {
            let query = Query::new().with("bio", matches("^[a-m]"));
            b.iter(|| db.find_many(black_box(&query)).map(|r| r.len()).unwrap_or(0));
        });
    }
    group.finish();
}

/// Benchmark a point lookup that misses, the worst case for find_one.
fn bench_find_one_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_one_miss");

    for size in [100, 1000, 10000].iter() {
        let db = populated_memory_db(*size);
        let query = Query::new().eq("name", "nobody");
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| db.find_one(black_box(&query)).is_err());
        });
    }
    group.finish();
}

/// Benchmark update_many over the whole collection.
fn bench_update_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_many");

    for size in [100, 1000].iter() {
        let db = populated_memory_db(*size);
        let patch = record! { "touched" => true };
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| db.update_many(&Query::new(), black_box(&patch)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_one,
    bench_insert_many,
    bench_find_many,
    bench_find_one_miss,
    bench_update_many,
);
criterion_main!(benches);
