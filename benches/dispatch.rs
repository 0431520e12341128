//! Benchmarks for the caching and dispatch hot path
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use vizstream::{
    CachePolicy, MemoryBackend, Plotter, PlotterConfig, Sample, ScalarMetric, SeriesCache,
};

fn bench_cache_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_update");

    group.throughput(Throughput::Elements(1));
    group.bench_function("unbounded", |b| {
        let mut cache = SeriesCache::new("loss_train".to_string(), CachePolicy::Unbounded);
        let mut i = 0u64;
        b.iter(|| {
            cache
                .update(black_box(Sample::new(i as f64, i as f64)))
                .unwrap();
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("drop_oldest_at_capacity", |b| {
        let mut cache = SeriesCache::new("loss_train".to_string(), CachePolicy::DropOldest(1024));
        for i in 0..1024u64 {
            cache.update(Sample::new(i as f64, i as f64)).unwrap();
        }
        let mut i = 1024u64;
        b.iter(|| {
            cache
                .update(black_box(Sample::new(i as f64, i as f64)))
                .unwrap();
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

fn bench_cache_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_snapshot");

    for size in [16, 256, 4096].iter() {
        let mut cache = SeriesCache::new("loss_train".to_string(), CachePolicy::Unbounded);
        for i in 0..*size as u64 {
            cache.update(Sample::new(i as f64, (i as f64).sin())).unwrap();
        }

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("snapshot", size), &cache, |b, cache| {
            b.iter(|| black_box(cache.snapshot()));
        });
    }

    group.finish();
}

fn bench_plot_metric_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("plot_metric");

    group.throughput(Throughput::Elements(1));
    group.bench_function("sync_append", |b| {
        let backend = Arc::new(MemoryBackend::new());
        let mut plotter = Plotter::new(backend, PlotterConfig::default());
        let mut metric = ScalarMetric::new("loss", Some("train"));
        let mut i = 0u64;

        // First call creates the window, the measured ones append
        metric.record(0.0, 0.0);
        plotter.plot_metric(&metric).unwrap();

        b.iter(|| {
            i = i.wrapping_add(1);
            metric.record(i as f64, (i as f64).sin());
            black_box(plotter.plot_metric(&metric).unwrap());
        });
    });

    group.finish();
}

fn bench_plot_metric_async_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("plot_metric_async");

    group.throughput(Throughput::Elements(1));
    group.bench_function("enqueue", |b| {
        let backend = Arc::new(MemoryBackend::new());
        let config = PlotterConfig::default()
            .with_async_dispatch(true)
            .with_queue(65_536, vizstream::QueuePolicy::Block);
        let mut plotter = Plotter::new(backend, config);
        let mut metric = ScalarMetric::new("loss", Some("train"));
        let mut i = 0u64;

        metric.record(0.0, 0.0);
        plotter.plot_metric(&metric).unwrap();

        b.iter(|| {
            i = i.wrapping_add(1);
            metric.record(i as f64, (i as f64).sin());
            black_box(plotter.plot_metric(&metric).unwrap());
        });

        plotter.close().unwrap();
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cache_update,
    bench_cache_snapshot,
    bench_plot_metric_sync,
    bench_plot_metric_async_enqueue,
);

criterion_main!(benches);
