use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use packbench_codecs::composite_by_names;
use packbench_core::generators;
use packbench_core::harness::{compress, decompress};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn bench_composites(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let data = generators::clustered(&mut rng, 1_000_000, 2_000_000).unwrap();

    let pairs = [
        ("bp32", "varbyte"),
        ("delta-bp32", "delta-varbyte"),
        ("delta-bp32", "zstd"),
        ("bp32", "lz4"),
    ];

    // Aligned and unaligned sizes, so both the bulk-only and split paths run
    let sizes = [
        ("Aligned", 32 * 3_125),
        ("Unaligned", 100_003),
        ("Large", 1_000_000),
    ];

    for (size_name, k) in sizes {
        let mut group_compress = c.benchmark_group(format!("Compress_{size_name}"));
        group_compress.throughput(Throughput::Elements(k as u64));

        for (bulk, rem) in pairs {
            let codec = composite_by_names(bulk, rem).unwrap();
            group_compress.bench_with_input(
                BenchmarkId::new(format!("{bulk}+{rem}"), k),
                &data[..k],
                |b, input| b.iter(|| compress(&codec, black_box(input), k).unwrap()),
            );
        }
        group_compress.finish();

        let mut group_decompress = c.benchmark_group(format!("Decompress_{size_name}"));
        group_decompress.throughput(Throughput::Elements(k as u64));

        for (bulk, rem) in pairs {
            let codec = composite_by_names(bulk, rem).unwrap();
            let packed = compress(&codec, &data[..k], k).unwrap().value;
            group_decompress.bench_with_input(
                BenchmarkId::new(format!("{bulk}+{rem}"), k),
                &packed,
                |b, p| b.iter(|| decompress(&codec, black_box(p), k).unwrap()),
            );
        }
        group_decompress.finish();
    }
}

criterion_group!(benches, bench_composites);
criterion_main!(benches);
