use chart_core::layout::layout_frame;
use chart_core::series::{Bar, Series};
use chart_core::{TimeFrame, Viewport};
use chrono::{FixedOffset, Offset, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, black_box};

fn gen_series(n: usize) -> Series {
    let mut v = Vec::with_capacity(n);
    let mut price = 100.0f64;
    for i in 0..n {
        let o = price;
        let c = o + (i as f64 * 0.01).sin();
        v.push(Bar { open: o, close: c, low: o.min(c) - 0.5, high: o.max(c) + 0.5, time: 1_673_222_400_000 - i as i64 * 300_000 });
        price = c;
    }
    Series::from_newest_first(v)
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_gestures");
    for &n in &[10_000usize, 50_000usize] {
        let series = gen_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}")), &series, |b, s| {
            b.iter(|| {
                let mut v = Viewport::new(1200.0, 600.0, s.len());
                for step in 0..200 {
                    v.zoom(s.len(), if step % 2 == 0 { 1.05 } else { 0.97 });
                    v.pan(s.len(), 37.0);
                    black_box(v.price_scale(s));
                }
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let offset: FixedOffset = Utc.fix();
    let series = gen_series(50_000);
    let mut group = c.benchmark_group("layout_frame");
    for &visible in &[100usize, 1_000usize, 10_000usize] {
        let mut v = Viewport::new(1200.0, 600.0, series.len());
        v.visible_count = visible;
        v.clamp_to(series.len());
        group.bench_function(format!("visible{visible}"), |b| {
            b.iter(|| black_box(layout_frame(&series, &v, TimeFrame::Min5, &offset)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gestures, bench_layout);
criterion_main!(benches);
