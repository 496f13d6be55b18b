// File: crates/chart-core/src/chart.rs
// Summary: Candlestick chart and headless rendering pipeline using Skia CPU raster surfaces.

use anyhow::Result;
use chrono::{FixedOffset, Offset, Utc};
use skia_safe as skia;

use crate::geometry::PlotRect;
use crate::layout::{layout_frame, CandleGeometry, Direction, FrameLayout, PriceLine};
use crate::overlay::ScreenOverlay;
use crate::series::Series;
use crate::text::{TextShaper, LABEL_SIZE};
use crate::theme::Theme;
use crate::timeframe::TimeFrame;
use crate::types::{Insets, HEIGHT, WIDTH};
use crate::viewport::Viewport;

const DASH: [f32; 2] = [4.0, 4.0];
const WICK_STROKE: f32 = 2.0;

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    pub theme: Theme,
    /// Off for deterministic snapshots (font availability varies by platform).
    pub draw_labels: bool,
    /// Offset used for delimiter calendar fields.
    pub utc_offset: FixedOffset,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            theme: Theme::dark(),
            draw_labels: true,
            utc_offset: Utc.fix(),
        }
    }
}

impl RenderOptions {
    pub fn plot_rect(&self) -> PlotRect {
        PlotRect::inset(self.width, self.height, &self.insets)
    }
}

/// One frame of a candlestick chart: a series seen through a viewport.
/// The viewport's width/height are expected to match `RenderOptions::plot_rect`.
pub struct CandleChart<'a> {
    pub series: &'a Series,
    pub viewport: &'a Viewport,
    pub time_frame: TimeFrame,
    /// Bar highlighted after a tap.
    pub selected: Option<usize>,
    pub overlay: Option<&'a ScreenOverlay>,
}

impl<'a> CandleChart<'a> {
    pub fn new(series: &'a Series, viewport: &'a Viewport, time_frame: TimeFrame) -> Self {
        Self { series, viewport, time_frame, selected: None, overlay: None }
    }

    pub fn with_selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_overlay(mut self, overlay: &'a ScreenOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn layout(&self, opts: &RenderOptions) -> FrameLayout {
        layout_frame(self.series, self.viewport, self.time_frame, &opts.utc_offset)
    }

    /// Render the chart to a PNG at `output_png_path` using a CPU raster surface.
    pub fn render_to_png(&self, opts: &RenderOptions, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
        let data = self.render_to_png_bytes(opts)?;
        if let Some(parent) = output_png_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_png_path, data)?;
        Ok(())
    }

    pub fn render_to_png_bytes(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        let mut surface = self.render_surface(opts)?;
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    /// Render to an unpremultiplied RGBA8 buffer: (pixels, width, height, row stride in bytes).
    pub fn render_to_rgba8(&self, opts: &RenderOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
        let mut surface = self.render_surface(opts)?;
        let (w, h) = (opts.width.max(1), opts.height.max(1));
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let stride = w as usize * 4;
        let mut pixels = vec![0u8; stride * h as usize];
        if !surface.read_pixels(&info, &mut pixels, stride, (0, 0)) {
            anyhow::bail!("read_pixels failed");
        }
        Ok((pixels, w as u32, h as u32, stride))
    }

    fn render_surface(&self, opts: &RenderOptions) -> Result<skia::Surface> {
        let mut surface = skia::surfaces::raster_n32_premul((opts.width.max(1), opts.height.max(1)))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        let canvas = surface.canvas();
        canvas.clear(opts.theme.background);

        let plot = opts.plot_rect();
        let frame = self.layout(opts);
        let text = opts.draw_labels.then(TextShaper::new);

        canvas.save();
        canvas.translate((plot.left, plot.top));

        // Delimiter labels hang below the plot, so only lines and candles are clipped.
        canvas.save();
        canvas.clip_rect(skia::Rect::from_wh(plot.width(), plot.height()), skia::ClipOp::Intersect, false);
        draw_delimiter_lines(canvas, &frame, plot.height(), &opts.theme);
        for c in &frame.candles {
            draw_candle(canvas, c, &opts.theme);
        }
        if let Some(c) = self.selected.and_then(|i| frame.candle(i)) {
            draw_highlight(canvas, c, self.viewport.bar_width(), &opts.theme);
        }
        canvas.restore();

        draw_price_lines(canvas, &frame.price_lines, plot.width(), &opts.theme);
        if let Some(text) = &text {
            for d in &frame.delimiters {
                text.draw_centered(canvas, &d.label, d.x, plot.height(), opts.theme.label);
            }
            draw_price_labels(canvas, text, &frame.price_lines, plot.width(), &opts.theme);
        }
        canvas.restore();

        if let Some(overlay) = self.overlay {
            overlay.draw(canvas, text.as_ref(), opts.width as f32, plot.top, &opts.theme);
        }

        Ok(surface)
    }
}

// ---- helpers ----------------------------------------------------------------

fn dashed(color: skia::Color, width: f32) -> skia::Paint {
    let mut p = skia::Paint::default();
    p.set_anti_alias(true);
    p.set_style(skia::paint::Style::Stroke);
    p.set_stroke_width(width);
    p.set_color(color);
    p.set_path_effect(skia::PathEffect::dash(&DASH, 0.0));
    p
}

fn draw_delimiter_lines(canvas: &skia::Canvas, frame: &FrameLayout, height: f32, theme: &Theme) {
    let paint = dashed(theme.delimiter, 1.0);
    for d in &frame.delimiters {
        canvas.draw_line((d.x, 0.0), (d.x, height), &paint);
    }
}

fn draw_candle(canvas: &skia::Canvas, c: &CandleGeometry, theme: &Theme) {
    let mut wick = skia::Paint::default();
    wick.set_anti_alias(true);
    wick.set_style(skia::paint::Style::Stroke);
    wick.set_stroke_width(WICK_STROKE);
    wick.set_color(theme.wick);
    canvas.draw_line((c.x, c.wick_top), (c.x, c.wick_bottom), &wick);

    let mut body = skia::Paint::default();
    body.set_anti_alias(true);
    body.set_style(skia::paint::Style::Fill);
    body.set_color(match c.direction {
        Direction::Up => theme.candle_up,
        Direction::Down => theme.candle_down,
    });
    let (left, right) = c.body_span();
    canvas.draw_rect(skia::Rect::from_ltrb(left, c.body_top, right, c.body_bottom), &body);
}

fn draw_highlight(canvas: &skia::Canvas, c: &CandleGeometry, bar_width: f32, theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(1.0);
    paint.set_color(theme.highlight);
    let half = bar_width * 0.5;
    canvas.draw_rect(skia::Rect::from_ltrb(c.x - half, c.wick_top, c.x + half, c.wick_bottom), &paint);
}

fn draw_price_lines(canvas: &skia::Canvas, lines: &[PriceLine], width: f32, theme: &Theme) {
    let paint = dashed(theme.price_line, 1.0);
    for l in lines {
        canvas.draw_line((0.0, l.y), (width, l.y), &paint);
    }
}

fn draw_price_labels(canvas: &skia::Canvas, text: &TextShaper, lines: &[PriceLine], width: f32, theme: &Theme) {
    for l in lines {
        let label = format_price(l.price);
        let w = text.measure_width(&label);
        // labels sit above their line except near the top edge
        let y = if l.y >= LABEL_SIZE * 1.5 { l.y - LABEL_SIZE * 1.4 } else { l.y };
        text.draw_top_left(canvas, &label, width - w - 4.0, y, theme.label);
    }
}

/// Price label text: two decimals above 1.0, four below.
pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 { format!("{price:.2}") } else { format!("{price:.4}") }
}
