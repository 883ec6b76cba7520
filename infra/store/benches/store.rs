use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hearth_store::{Compression, Store};
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, Serialize, Deserialize)]
struct BenchRecord {
    kind: String,
    payload: Vec<u8>,
}

fn bench_record(size: usize) -> BenchRecord {
    BenchRecord {
        kind: "Number".to_owned(),
        payload: (0..size).map(|i| u8::try_from(i % 256).unwrap()).collect(),
    }
}

// ============================================================================
// Benchmark: Compression Performance
// ============================================================================

fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");

    let sizes = [("1KB", 1024), ("10KB", 10 * 1024), ("100KB", 100 * 1024)];

    for (name, size) in sizes {
        let data: Vec<u8> = (0..size).map(|i| u8::try_from(i % 256).unwrap()).collect();

        let throughput = u64::try_from(size).unwrap_or(u64::MAX);
        group.throughput(Throughput::Bytes(throughput));

        group.bench_with_input(BenchmarkId::new("compress", name), &data, |b, data| {
            b.iter(|| {
                black_box(lz4_flex::compress_prepend_size(data));
            });
        });

        let compressed = lz4_flex::compress_prepend_size(&data);
        group.bench_with_input(
            BenchmarkId::new("decompress", name),
            &compressed,
            |b, compressed| {
                b.iter(|| {
                    black_box(lz4_flex::decompress_size_prepended(compressed).unwrap());
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Benchmark: Record Operations
// ============================================================================

fn bench_record_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_operations");
    group.measurement_time(Duration::from_secs(10));

    let temp = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();

    let sizes = [("1KB", 1024), ("10KB", 10 * 1024)];

    for (name, size) in sizes {
        let record = bench_record(size);

        group.bench_with_input(BenchmarkId::new("put_uncompressed", name), &record, |b, record| {
            let records = rt.block_on(async {
                let store =
                    Store::builder().root(temp.path()).create(true).connect().await.unwrap();
                store.records::<BenchRecord>("bench").unwrap()
            });

            b.to_async(&rt).iter(|| async {
                records.put("bench_key", record).await.unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("put_compressed", name), &record, |b, record| {
            let records = rt.block_on(async {
                let store = Store::builder()
                    .root(temp.path())
                    .create(true)
                    .compression(Compression::Lz4)
                    .connect()
                    .await
                    .unwrap();
                store.records::<BenchRecord>("bench_lz4").unwrap()
            });

            b.to_async(&rt).iter(|| async {
                records.put("bench_key", record).await.unwrap();
            });
        });

        let records = rt.block_on(async {
            let store = Store::builder().root(temp.path()).create(true).connect().await.unwrap();
            let records = store.records::<BenchRecord>("bench_read").unwrap();
            records.put("read_key", &record).await.unwrap();
            records
        });

        group.bench_function(BenchmarkId::new("get", name), |b| {
            b.to_async(&rt).iter(|| async {
                black_box(records.get("read_key").await.unwrap());
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Enumeration
// ============================================================================

fn bench_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumeration");

    let temp = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let records = rt.block_on(async {
        let store = Store::builder().root(temp.path()).create(true).connect().await.unwrap();
        let records = store.records::<BenchRecord>("bench_all").unwrap();
        for i in 0..256 {
            records.put(&format!("record_{i:03}"), &bench_record(256)).await.unwrap();
        }
        records
    });

    group.bench_function("get_all_256", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(records.get_all().await.unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compression, bench_record_operations, bench_enumeration);

criterion_main!(benches);
