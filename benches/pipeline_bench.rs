//! Benchmarks for the scan pipeline hot path
//!
//! Run with: cargo bench --bench pipeline_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sound_bearing::signal::SignalFilter;
use sound_bearing::simulate::{replay, SyntheticRoom};
use sound_bearing::{ManualClock, ScanConfig, ScanPipeline};

// ============================================================================
// Filter Chain
// ============================================================================

fn bench_signal_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_filter");
    group.throughput(Throughput::Elements(1));

    group.bench_function("process_and_signal", |b| {
        let mut filter = SignalFilter::new();
        filter.seed_noise_floor(-50.0);
        let mut level = -50.0_f32;
        b.iter(|| {
            level = if level > -20.0 { -50.0 } else { level + 0.5 };
            let smoothed = filter.process(black_box(level));
            filter.signal(smoothed)
        })
    });

    group.finish();
}

// ============================================================================
// Full Scans
// ============================================================================

fn bench_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_scan");

    for turns in [1.0, 2.0, 4.0] {
        let room = SyntheticRoom::default();
        let ticks = room.sweep(turns);
        group.throughput(Throughput::Elements(ticks.len() as u64));

        group.bench_with_input(BenchmarkId::new("turns", turns), &ticks, |b, ticks| {
            b.iter(|| {
                let clock = ManualClock::new();
                let mut pipeline =
                    ScanPipeline::with_clock(ScanConfig::default(), clock.clone()).unwrap();
                pipeline.start_scan();
                replay(&mut pipeline, &clock, black_box(ticks), room.tick_interval);
                pipeline.stop_scan().unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_signal_filter, bench_full_scan);
criterion_main!(benches);
