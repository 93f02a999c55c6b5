use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use datafile::{DataFile, FieldSchema, Header, DEFAULT_MAGIC};
use store::Store;
use tempfile::{tempdir, TempDir};

const N_RECORDS: usize = 2_000;

fn empty_store(key_fields: Vec<usize>) -> (TempDir, Store) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.db");
    let header = Header::new(
        DEFAULT_MAGIC,
        vec![
            FieldSchema::new("name", 32),
            FieldSchema::new("city", 16),
            FieldSchema::new("rate", 8),
        ],
    );
    DataFile::create(&path, &header).unwrap().close().unwrap();
    let store = Store::open(&path, key_fields).unwrap();
    (dir, store)
}

fn populated_store() -> (TempDir, Store) {
    // No key columns: skips the per-create duplicate scan while loading.
    let (dir, store) = empty_store(vec![]);
    for i in 0..N_RECORDS {
        let name = format!("name{:05}", i);
        let city = format!("city{}", i % 50);
        store
            .create(&[Some(name.as_str()), Some(city.as_str()), Some("$100.00")])
            .unwrap();
    }
    (dir, store)
}

fn create_benchmark(c: &mut Criterion) {
    c.bench_function("store_create_200", |b| {
        b.iter_batched(
            || empty_store(vec![0, 1]),
            |(_dir, store)| {
                for i in 0..200 {
                    let name = format!("name{}", i);
                    store
                        .create(&[Some(name.as_str()), Some("city"), Some("$1")])
                        .unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn read_benchmark(c: &mut Criterion) {
    let (_dir, store) = populated_store();
    c.bench_function("store_read_all_2k", |b| {
        b.iter(|| {
            for slot in 0..N_RECORDS as u32 {
                assert!(store.read(slot).unwrap().is_some());
            }
        });
    });
}

fn find_benchmark(c: &mut Criterion) {
    let (_dir, store) = populated_store();
    c.bench_function("store_find_prefix_2k", |b| {
        b.iter(|| {
            let hits = store.find(&[None, Some("city1"), None]).unwrap();
            assert!(!hits.is_empty());
        });
    });
    c.bench_function("store_find_miss_2k", |b| {
        b.iter(|| {
            let hits = store.find(&[Some("nobody"), None, None]).unwrap();
            assert!(hits.is_empty());
        });
    });
}

criterion_group!(benches, create_benchmark, read_benchmark, find_benchmark);
criterion_main!(benches);
