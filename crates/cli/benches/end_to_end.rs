use criterion::{Criterion, criterion_group, criterion_main};
use station_stats_engine::config::ConfigBuilder;
use std::hint::black_box;
use std::io::Write;

fn benchmark_run(c: &mut Criterion) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0u32..50_000 {
        let tenths = (i % 1999) as i64 - 999;
        let sign = if tenths < 0 { "-" } else { "" };
        let abs = tenths.unsigned_abs();
        writeln!(file, "Station-{};{sign}{}.{}", i % 413, abs / 10, abs % 10).unwrap();
    }
    file.flush().unwrap();

    let config = ConfigBuilder::default()
        .path(file.path())
        .jobs(4usize)
        .build()
        .unwrap();

    c.bench_function("run_50k_records", |b| {
        b.iter(|| black_box(station_stats_engine::run(&config).unwrap()))
    });
}

criterion_group!(benches, benchmark_run);
criterion_main!(benches);
