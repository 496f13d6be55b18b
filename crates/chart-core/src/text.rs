// File: crates/chart-core/src/text.rs
// Summary: Label shaper using Skia textlayout; price and time labels use tabular digits.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle};

/// Label size used by the chart (matches the 12sp labels of the mobile screen).
pub const LABEL_SIZE: f32 = 12.0;

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn layout(&self, text: &str, color: skia::Color) -> Paragraph {
        let mut ts = TextStyle::new();
        ts.set_font_size(LABEL_SIZE);
        ts.set_color(color);
        ts.set_font_families(&["Roboto Mono", "Consolas", "Menlo", "DejaVu Sans Mono", "monospace"]);

        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(skia::textlayout::TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&ts);
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure_width(&self, text: &str) -> f32 {
        self.layout(text, skia::Color::TRANSPARENT).longest_line()
    }

    /// Draw with the paragraph's top-left at (x, y).
    pub fn draw_top_left(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, color: skia::Color) {
        self.layout(text, color).paint(canvas, (x, y));
    }

    /// Draw horizontally centered on `cx`, top at `y`.
    pub fn draw_centered(&self, canvas: &skia::Canvas, text: &str, cx: f32, y: f32, color: skia::Color) {
        let p = self.layout(text, color);
        let w = p.longest_line();
        p.paint(canvas, (cx - w / 2.0, y));
    }
}
