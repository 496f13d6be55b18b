// File: crates/chart-core/src/viewport.rs
// Summary: Viewport model: visible window over a Series, its clamps, and derived pixel mappings.
//
// Invariants (restored by every mutating method):
// - visible_count in [min_visible(len), max(len, 1)]
// - scrolled_by in [0, max_scroll(len)]

use std::ops::Range;

use log::debug;

use crate::scale::{BarScale, PriceScale};
use crate::series::{Bar, Series};

/// Fewest bars a zoom-in may leave on screen.
pub const MIN_VISIBLE_COUNT: usize = 20;
/// Bars on screen for a freshly loaded series.
pub const DEFAULT_VISIBLE_COUNT: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub visible_count: usize,
    /// Horizontal scroll in pixels; 0 shows the newest bar at the right edge.
    pub scrolled_by: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { visible_count: DEFAULT_VISIBLE_COUNT, scrolled_by: 0.0, width: 1.0, height: 1.0 }
    }
}

/// Lower zoom bound; collapses to the series length for short series.
#[inline]
pub fn min_visible(len: usize) -> usize {
    MIN_VISIBLE_COUNT.min(len.max(1))
}

#[inline]
fn max_visible(len: usize) -> usize {
    len.max(1)
}

impl Viewport {
    /// Viewport for a series of `len` bars on a `width` x `height` canvas.
    pub fn new(width: f32, height: f32, len: usize) -> Self {
        let mut v = Self { width: width.max(1.0), height: height.max(1.0), ..Self::default() };
        v.clamp_to(len);
        v
    }

    pub fn bar_width(&self) -> f32 {
        self.width / self.visible_count.max(1) as f32
    }

    /// Total width of all bars laid side by side.
    pub fn content_width(&self, len: usize) -> f32 {
        len as f32 * self.bar_width()
    }

    pub fn max_scroll(&self, len: usize) -> f32 {
        (self.content_width(len) - self.width).max(0.0)
    }

    /// Re-establish both invariants for a series of `len` bars.
    pub fn clamp_to(&mut self, len: usize) {
        self.visible_count = self.visible_count.clamp(min_visible(len), max_visible(len));
        self.scrolled_by = if self.scrolled_by.is_finite() {
            self.scrolled_by.clamp(0.0, self.max_scroll(len))
        } else {
            0.0
        };
    }

    /// Scale visible bar count by `1 / factor` (factor > 1 zooms in). Returns true on change.
    pub fn zoom(&mut self, len: usize, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let before = *self;
        let target = (self.visible_count as f32 / factor).round();
        // avoid usize overflow on tiny factors
        let target = if target >= max_visible(len) as f32 { max_visible(len) } else { target.max(0.0) as usize };
        self.visible_count = target;
        self.clamp_to(len);
        if *self != before {
            debug!("zoom x{factor:.3}: visible {} -> {}", before.visible_count, self.visible_count);
        }
        *self != before
    }

    /// Shift the scroll offset by `dx` pixels (positive reveals older bars). Returns true on change.
    pub fn pan(&mut self, len: usize, dx: f32) -> bool {
        if !dx.is_finite() {
            return false;
        }
        let before = self.scrolled_by;
        self.scrolled_by += dx;
        self.clamp_to(len);
        self.scrolled_by != before
    }

    /// Apply a new canvas size. Returns true on change.
    pub fn resize(&mut self, len: usize, width: f32, height: f32) -> bool {
        let before = *self;
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.clamp_to(len);
        *self != before
    }

    /// First visible index: scroll offset converted to whole bars.
    pub fn start_index(&self, len: usize) -> usize {
        let start = (self.scrolled_by / self.bar_width()).round();
        if start <= 0.0 { 0 } else { (start as usize).min(len) }
    }

    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.start_index(len);
        let end = (start + self.visible_count).min(len);
        start..end
    }

    pub fn visible_bars<'a>(&self, series: &'a Series) -> &'a [Bar] {
        series.slice(self.visible_range(series.len()))
    }

    /// (min low, max high) within the visible slice.
    pub fn price_range(&self, series: &Series) -> Option<(f64, f64)> {
        Series::price_extent(self.visible_bars(series))
    }

    /// Linear price scale fitted to the visible slice; None for an empty slice.
    pub fn price_scale(&self, series: &Series) -> Option<PriceScale> {
        self.price_range(series).map(|(min, max)| PriceScale::new(min, max, self.height))
    }

    pub fn bar_scale(&self) -> BarScale {
        BarScale::new(self.width, self.bar_width(), self.scrolled_by)
    }

    /// Center x of bar `index` in plot-local pixels.
    pub fn bar_center_x(&self, index: usize) -> f32 {
        self.bar_scale().to_px(index)
    }

    /// Index of the bar whose body span contains `x`, if it exists in a series of `len`.
    pub fn bar_at(&self, len: usize, x: f32) -> Option<usize> {
        if x < 0.0 || x > self.width {
            return None;
        }
        self.bar_scale().index_at(x).filter(|&i| i < len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_series_pins_visible_count() {
        let v = Viewport::new(300.0, 100.0, 5);
        assert_eq!(v.visible_count, 5);
        assert_eq!(v.max_scroll(5), 0.0);
    }

    #[test]
    fn non_positive_zoom_is_ignored() {
        let mut v = Viewport::new(300.0, 100.0, 500);
        assert!(!v.zoom(500, 0.0));
        assert!(!v.zoom(500, f32::NAN));
        assert_eq!(v.visible_count, DEFAULT_VISIBLE_COUNT);
    }
}
