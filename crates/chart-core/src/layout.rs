// File: crates/chart-core/src/layout.rs
// Summary: Renderer-agnostic geometry for one frame: candles, time delimiters and price lines.
// All coordinates are plot-local pixels (origin at the plot's top-left).

use chrono::FixedOffset;

use crate::scale::BODY_HALF_WIDTH;
use crate::series::Series;
use crate::timeframe::TimeFrame;
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// One bar ready to draw: a high-low wick and an open-close body of `body_width`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandleGeometry {
    pub index: usize,
    pub x: f32,
    pub wick_top: f32,
    pub wick_bottom: f32,
    pub body_top: f32,
    pub body_bottom: f32,
    pub body_width: f32,
    pub direction: Direction,
}

impl CandleGeometry {
    /// Horizontal pixel span of the drawn body.
    pub fn body_span(&self) -> (f32, f32) {
        let half = self.body_width * 0.5;
        (self.x - half, self.x + half)
    }
}

/// Dashed vertical gridline at a time boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Delimiter {
    pub index: usize,
    pub x: f32,
    pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceLineKind {
    Max,
    Current,
    Min,
}

/// Dashed horizontal line with a price label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceLine {
    pub kind: PriceLineKind,
    pub price: f64,
    pub y: f32,
}

/// Everything needed to paint one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameLayout {
    pub candles: Vec<CandleGeometry>,
    pub delimiters: Vec<Delimiter>,
    pub price_lines: Vec<PriceLine>,
}

impl FrameLayout {
    pub fn candle(&self, index: usize) -> Option<&CandleGeometry> {
        self.candles.iter().find(|c| c.index == index)
    }
}

/// Minimum body height so doji bars stay visible.
const MIN_BODY_PX: f32 = 1.0;

/// Lay out the visible slice of `series` under `viewport`.
pub fn layout_frame(series: &Series, viewport: &Viewport, time_frame: TimeFrame, offset: &FixedOffset) -> FrameLayout {
    let Some(price) = viewport.price_scale(series) else {
        return FrameLayout::default();
    };
    let xs = viewport.bar_scale();
    let bar_width = viewport.bar_width();
    let range = viewport.visible_range(series.len());

    let mut candles = Vec::with_capacity(range.len());
    let mut delimiters = Vec::new();
    for index in range {
        let Some(bar) = series.get(index) else { break };
        let x = xs.to_px(index);

        let y_o = price.to_px(bar.open);
        let y_c = price.to_px(bar.close);
        let body_top = y_o.min(y_c);
        let body_bottom = y_o.max(y_c).max(body_top + MIN_BODY_PX);
        candles.push(CandleGeometry {
            index,
            x,
            wick_top: price.to_px(bar.high),
            wick_bottom: price.to_px(bar.low),
            body_top,
            body_bottom,
            body_width: bar_width * 2.0 * BODY_HALF_WIDTH,
            direction: if bar.is_rising() { Direction::Up } else { Direction::Down },
        });

        if time_frame.needs_delimiter(bar, series.get(index + 1), offset) {
            delimiters.push(Delimiter { index, x, label: time_frame.delimiter_label(bar, offset) });
        }
    }

    let mut price_lines = vec![
        PriceLine { kind: PriceLineKind::Max, price: price.max, y: 0.0 },
        PriceLine { kind: PriceLineKind::Min, price: price.min, y: viewport.height },
    ];
    if let Some(latest) = series.latest() {
        price_lines.insert(1, PriceLine { kind: PriceLineKind::Current, price: latest.close, y: price.to_px(latest.close) });
    }

    FrameLayout { candles, delimiters, price_lines }
}
