// File: crates/chart-core/src/scale.rs
// Summary: Bar-index (X) and price (Y) scale transforms in plot-local pixels.

/// Horizontal scale: newest bar (index 0) sits on the right edge, older bars extend left.
/// `scrolled_by` shifts everything right, revealing older bars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarScale {
    pub right_px: f32,
    pub bar_width: f32,
    pub scrolled_by: f32,
}

impl BarScale {
    pub fn new(right_px: f32, bar_width: f32, scrolled_by: f32) -> Self {
        Self { right_px, bar_width: bar_width.max(1e-3), scrolled_by }
    }

    /// Center x of the bar at `index`.
    #[inline]
    pub fn to_px(&self, index: usize) -> f32 {
        self.right_px - index as f32 * self.bar_width + self.scrolled_by
    }

    /// Fractional bar index under `px`; integer values land on bar centers.
    #[inline]
    pub fn from_px(&self, px: f32) -> f32 {
        (self.right_px + self.scrolled_by - px) / self.bar_width
    }

    /// Index whose drawn body `[center - w/4, center + w/4]` contains `px`.
    /// Taps in the gap between bodies, or right of the newest bar, hit nothing.
    pub fn index_at(&self, px: f32) -> Option<usize> {
        if !px.is_finite() { return None; }
        let f = self.from_px(px);
        let nearest = f.round();
        if nearest < 0.0 || (f - nearest).abs() > BODY_HALF_WIDTH {
            return None;
        }
        Some(nearest as usize)
    }
}

/// Half the candle body width, in bar widths.
pub const BODY_HALF_WIDTH: f32 = 0.25;

/// Vertical linear price scale mapping [min, max] onto [height, 0].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceScale {
    pub min: f64,
    pub max: f64,
    pub height_px: f32,
    /// Pixels per one price unit.
    pub points_on_height: f32,
}

impl PriceScale {
    pub fn new(min: f64, max: f64, height_px: f32) -> Self {
        let mut max = max;
        if (max - min).abs() < 1e-12 { max = min + 1.0; }
        let points_on_height = (height_px as f64 / (max - min)) as f32;
        Self { min, max, height_px, points_on_height }
    }

    #[inline]
    pub fn to_px(&self, price: f64) -> f32 {
        self.height_px - ((price - self.min) as f32) * self.points_on_height
    }

    #[inline]
    pub fn from_px(&self, py: f32) -> f64 {
        self.min + ((self.height_px - py) / self.points_on_height) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scale_round_trips_centers() {
        let s = BarScale::new(400.0, 10.0, 25.0);
        for i in [0usize, 1, 7, 40] {
            assert!((s.from_px(s.to_px(i)) - i as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn index_at_matches_body_only() {
        let s = BarScale::new(100.0, 10.0, 0.0);
        // bar 0 centered at 100 -> body [97.5, 102.5], bar 1 body [87.5, 92.5]
        assert_eq!(s.index_at(100.0), Some(0));
        assert_eq!(s.index_at(97.5), Some(0));
        assert_eq!(s.index_at(102.5), Some(0));
        assert_eq!(s.index_at(95.0), None);
        assert_eq!(s.index_at(92.0), Some(1));
        assert_eq!(s.index_at(103.0), None);
        assert_eq!(s.index_at(f32::NAN), None);
    }

    #[test]
    fn flat_price_range_is_widened() {
        let p = PriceScale::new(5.0, 5.0, 200.0);
        assert_eq!(p.max, 6.0);
        assert!((p.to_px(5.0) - 200.0).abs() < 1e-4);
        assert!((p.to_px(6.0)).abs() < 1e-4);
    }
}
