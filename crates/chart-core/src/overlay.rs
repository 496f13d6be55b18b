// File: crates/chart-core/src/overlay.rs
// Summary: Screen overlay drawn over a chart frame: time frame chips, tapped-bar info panel,
// loading spinner and error line. Coordinates are surface pixels.

use skia_safe as skia;

use crate::text::{TextShaper, LABEL_SIZE};
use crate::theme::Theme;
use crate::timeframe::TimeFrame;

pub const CHIP_WIDTH: f32 = 64.0;
pub const CHIP_HEIGHT: f32 = 20.0;
const CHIP_GAP: f32 = 8.0;
const CHIP_TOP: f32 = 6.0;
const PANEL_PAD: f32 = 6.0;
const ROW_HEIGHT: f32 = LABEL_SIZE + 4.0;
const SPINNER_RADIUS: f32 = 8.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    Idle,
    /// `phase` in turns; the caller advances it between frames.
    Loading { phase: f32 },
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScreenOverlay {
    /// Highlighted chip; chips are laid out in `TimeFrame::ALL` order.
    pub active: TimeFrame,
    /// Label / value rows of the info panel; empty hides the panel.
    pub info: Vec<(String, String)>,
    pub status: Status,
}

impl ScreenOverlay {
    pub fn new(active: TimeFrame) -> Self {
        Self { active, info: Vec::new(), status: Status::Idle }
    }

    /// Bounds of the chip for `TimeFrame::ALL[slot]`.
    pub fn chip_rect(slot: usize) -> skia::Rect {
        let left = CHIP_GAP + slot as f32 * (CHIP_WIDTH + CHIP_GAP);
        skia::Rect::from_xywh(left, CHIP_TOP, CHIP_WIDTH, CHIP_HEIGHT)
    }

    /// Time frame whose chip contains the surface point.
    pub fn chip_at(x: f32, y: f32) -> Option<TimeFrame> {
        TimeFrame::ALL
            .iter()
            .enumerate()
            .find(|(slot, _)| {
                let r = Self::chip_rect(*slot);
                x >= r.left && x < r.right && y >= r.top && y < r.bottom
            })
            .map(|(_, tf)| *tf)
    }

    pub fn draw(&self, canvas: &skia::Canvas, text: Option<&TextShaper>, width: f32, plot_top: f32, theme: &Theme) {
        for (slot, tf) in TimeFrame::ALL.iter().enumerate() {
            draw_chip(canvas, text, slot, *tf, *tf == self.active, theme);
        }
        if !self.info.is_empty() {
            self.draw_info(canvas, text, plot_top, theme);
        }
        match &self.status {
            Status::Idle => {}
            Status::Loading { phase } => draw_spinner(canvas, width - CHIP_GAP - SPINNER_RADIUS, CHIP_TOP + CHIP_HEIGHT / 2.0, *phase, theme),
            Status::Error(msg) => {
                if let Some(text) = text {
                    let w = text.measure_width(msg);
                    text.draw_top_left(canvas, msg, width - w - CHIP_GAP, CHIP_TOP + 2.0, theme.candle_down);
                }
            }
        }
    }

    fn draw_info(&self, canvas: &skia::Canvas, text: Option<&TextShaper>, plot_top: f32, theme: &Theme) {
        let label_w = 48.0;
        let value_w = text
            .map(|t| self.info.iter().map(|(_, v)| t.measure_width(v)).fold(0.0, f32::max))
            .unwrap_or(80.0);
        let rect = skia::Rect::from_xywh(
            CHIP_GAP,
            plot_top + CHIP_GAP,
            label_w + value_w + PANEL_PAD * 3.0,
            self.info.len() as f32 * ROW_HEIGHT + PANEL_PAD * 2.0,
        );

        let mut fill = skia::Paint::default();
        fill.set_anti_alias(true);
        fill.set_color(theme.background.with_a(220));
        canvas.draw_round_rect(rect, 4.0, 4.0, &fill);
        let mut border = skia::Paint::default();
        border.set_anti_alias(true);
        border.set_style(skia::paint::Style::Stroke);
        border.set_color(theme.highlight);
        canvas.draw_round_rect(rect, 4.0, 4.0, &border);

        let Some(text) = text else { return };
        for (row, (label, value)) in self.info.iter().enumerate() {
            let y = rect.top + PANEL_PAD + row as f32 * ROW_HEIGHT;
            text.draw_top_left(canvas, label, rect.left + PANEL_PAD, y, theme.delimiter);
            text.draw_top_left(canvas, value, rect.left + PANEL_PAD * 2.0 + label_w, y, theme.label);
        }
    }
}

fn draw_chip(canvas: &skia::Canvas, text: Option<&TextShaper>, slot: usize, tf: TimeFrame, active: bool, theme: &Theme) {
    let rect = ScreenOverlay::chip_rect(slot);
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_color(theme.highlight);
    if !active {
        paint.set_style(skia::paint::Style::Stroke);
    }
    canvas.draw_round_rect(rect, CHIP_HEIGHT / 2.0, CHIP_HEIGHT / 2.0, &paint);
    if let Some(text) = text {
        let color = if active { theme.background } else { theme.label };
        text.draw_centered(canvas, tf.label(), rect.center_x(), rect.top + (CHIP_HEIGHT - LABEL_SIZE) / 2.0 - 1.0, color);
    }
}

fn draw_spinner(canvas: &skia::Canvas, cx: f32, cy: f32, phase: f32, theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(2.0);
    paint.set_color(theme.label);
    let oval = skia::Rect::from_xywh(cx - SPINNER_RADIUS, cy - SPINNER_RADIUS, SPINNER_RADIUS * 2.0, SPINNER_RADIUS * 2.0);
    canvas.draw_arc(oval, phase.fract() * 360.0, 270.0, false, &paint);
}
