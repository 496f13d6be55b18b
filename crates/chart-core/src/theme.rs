// File: crates/chart-core/src/theme.rs
// Summary: Terminal color themes for candles, gridlines and price labels.

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub wick: skia::Color,
    pub candle_up: skia::Color,
    pub candle_down: skia::Color,
    pub delimiter: skia::Color,
    pub price_line: skia::Color,
    pub label: skia::Color,
    pub highlight: skia::Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 0, 0, 0),
            wick: skia::Color::from_argb(255, 255, 255, 255),
            candle_up: skia::Color::from_argb(255, 0, 200, 0),
            candle_down: skia::Color::from_argb(255, 220, 0, 0),
            delimiter: skia::Color::from_argb(128, 255, 255, 255), // white @ 50%
            price_line: skia::Color::from_argb(255, 255, 255, 255),
            label: skia::Color::from_argb(255, 255, 255, 255),
            highlight: skia::Color::from_argb(255, 255, 230, 70),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 250, 250, 252),
            wick: skia::Color::from_argb(255, 60, 60, 70),
            candle_up: skia::Color::from_argb(255, 20, 160, 90),
            candle_down: skia::Color::from_argb(255, 200, 60, 60),
            delimiter: skia::Color::from_argb(128, 60, 60, 70),
            price_line: skia::Color::from_argb(255, 100, 100, 110),
            label: skia::Color::from_argb(255, 20, 20, 30),
            highlight: skia::Color::from_argb(255, 30, 120, 240),
        }
    }

    pub fn high_contrast_dark() -> Self {
        Self {
            name: "high-contrast-dark",
            background: skia::Color::from_argb(255, 0x00, 0x00, 0x00),
            wick: skia::Color::from_argb(255, 0xff, 0xff, 0xff),
            candle_up: skia::Color::from_argb(255, 0x00, 0xff, 0x00),
            candle_down: skia::Color::from_argb(255, 0xff, 0x00, 0x00),
            delimiter: skia::Color::from_argb(180, 0xcc, 0xcc, 0xcc),
            price_line: skia::Color::from_argb(255, 0xff, 0xff, 0xff),
            label: skia::Color::from_argb(255, 0xff, 0xff, 0xff),
            highlight: skia::Color::from_argb(255, 0xff, 0xff, 0x00),
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Self::dark() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::dark(), Theme::light(), Theme::high_contrast_dark()]
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(Theme::dark)
}
