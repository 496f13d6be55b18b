// File: crates/chart-core/tests/rgba.rs
// Purpose: Validate RGBA rendering buffer shape and body colors at known pixels.

use chart_core::series::{Bar, Series};
use chart_core::types::Insets;
use chart_core::{CandleChart, RenderOptions, Theme, TimeFrame, Viewport};

fn opts() -> RenderOptions {
    let mut opts = RenderOptions::default();
    opts.width = 200;
    opts.height = 100;
    opts.insets = Insets::new(0, 0, 0, 0);
    opts.draw_labels = false; // avoid font variance
    opts
}

fn pixel(px: &[u8], stride: usize, x: usize, y: usize) -> [u8; 4] {
    let i = y * stride + x * 4;
    [px[i], px[i + 1], px[i + 2], px[i + 3]]
}

#[test]
fn render_rgba8_buffer() {
    // 20 bars over 200 px -> 10 px slots, 5 px bodies; bar 0 centered at x=200, bar 1 at x=190
    let bars = (0..20)
        .map(|i| {
            if i == 1 {
                Bar { open: 8.0, close: 2.0, low: 0.0, high: 10.0, time: 0 }
            } else {
                Bar { open: 2.0, close: 8.0, low: 0.0, high: 10.0, time: 0 }
            }
        })
        .collect();
    let series = Series::from_newest_first(bars);
    let opts = opts();
    let viewport = Viewport::new(200.0, 100.0, series.len());
    let chart = CandleChart::new(&series, &viewport, TimeFrame::Hour1);

    let (px, w, h, stride) = chart.render_to_rgba8(&opts).expect("rgba render");
    assert_eq!((w, h), (200, 100));
    assert_eq!(w as usize * h as usize * 4, px.len());
    assert_eq!(stride, (w as usize) * 4);

    // Background in the top-left corner
    let theme = Theme::dark();
    assert_eq!(pixel(&px, stride, 0, 0)[3], 255);
    assert_eq!(pixel(&px, stride, 0, 50)[..3], [theme.background.r(), theme.background.g(), theme.background.b()]);

    // Body interiors away from the wick: bar 2 (rising) at x=180, bar 1 (falling) at x=190
    let up = pixel(&px, stride, 178, 50);
    let down = pixel(&px, stride, 188, 50);
    assert_eq!(up[..3], [theme.candle_up.r(), theme.candle_up.g(), theme.candle_up.b()]);
    assert_eq!(down[..3], [theme.candle_down.r(), theme.candle_down.g(), theme.candle_down.b()]);
}
