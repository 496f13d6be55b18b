// File: crates/chart-core/src/series.rs
// Summary: Bar and Series model; a Series is an immutable, newest-first run of OHLC bars.
// Notes:
// - Index 0 is always the newest bar. The viewport and layout code rely on this
//   to anchor the newest bar at the right edge of the canvas.

use std::ops::Range;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::ChartError;

/// One OHLC price sample. `time` is milliseconds since the Unix epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub time: i64,
}

impl Bar {
    /// Try to construct a bar enforcing OHLC invariants:
    /// low <= min(open,close) and high >= max(open,close), and low <= high.
    pub fn try_new(open: f64, close: f64, low: f64, high: f64, time: i64) -> Result<Self, ChartError> {
        if ![open, close, low, high].iter().all(|v| v.is_finite()) {
            return Err(ChartError::InvalidBar("non-finite price"));
        }
        let lo = open.min(close);
        let hi = open.max(close);
        if low > lo { return Err(ChartError::InvalidBar("low above min(open,close)")); }
        if high < hi { return Err(ChartError::InvalidBar("high below max(open,close)")); }
        if low > high { return Err(ChartError::InvalidBar("low above high")); }
        Ok(Self { open, close, low, high, time })
    }

    /// Close at or above open.
    #[inline]
    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }

    pub fn datetime_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }

    /// Bar time shifted into `offset`, used for calendar fields (minute, hour, day).
    pub fn datetime_in(&self, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
        self.datetime_utc().map(|t| t.with_timezone(offset))
    }
}

/// Ordered bars, newest first. Cloning shares the underlying slice.
#[derive(Clone, Debug, Default)]
pub struct Series {
    bars: Arc<[Bar]>,
}

impl Series {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from bars already sorted newest first (API order with `sort=desc`).
    pub fn from_newest_first(bars: Vec<Bar>) -> Self {
        Self { bars: bars.into() }
    }

    /// Build from chronological bars (oldest first), e.g. rows from a CSV export.
    pub fn from_oldest_first(mut bars: Vec<Bar>) -> Self {
        bars.reverse();
        Self::from_newest_first(bars)
    }

    pub fn len(&self) -> usize { self.bars.len() }
    pub fn is_empty(&self) -> bool { self.bars.is_empty() }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Most recent bar; its close is the current price.
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn as_slice(&self) -> &[Bar] {
        &self.bars
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    /// Sub-slice for an index range, clamped to the series bounds.
    pub fn slice(&self, range: Range<usize>) -> &[Bar] {
        let end = range.end.min(self.bars.len());
        let start = range.start.min(end);
        &self.bars[start..end]
    }

    /// (min low, max high) across `bars`, or None when empty.
    pub fn price_extent(bars: &[Bar]) -> Option<(f64, f64)> {
        let mut it = bars.iter();
        let first = it.next()?;
        let mut lo = first.low;
        let mut hi = first.high;
        for b in it {
            lo = lo.min(b.low);
            hi = hi.max(b.high);
        }
        Some((lo, hi))
    }
}

impl From<Vec<Bar>> for Series {
    fn from(bars: Vec<Bar>) -> Self {
        Self::from_newest_first(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_inverted_wick() {
        assert!(Bar::try_new(10.0, 11.0, 10.5, 12.0, 0).is_err());
        assert!(Bar::try_new(10.0, 11.0, 9.0, 10.5, 0).is_err());
        assert!(Bar::try_new(f64::NAN, 11.0, 9.0, 12.0, 0).is_err());
        assert!(Bar::try_new(10.0, 11.0, 9.0, 12.0, 0).is_ok());
    }

    #[test]
    fn oldest_first_is_reversed() {
        let bars = (0..3)
            .map(|i| Bar { open: 1.0, close: 1.0, low: 1.0, high: 1.0, time: i })
            .collect::<Vec<_>>();
        let s = Series::from_oldest_first(bars);
        assert_eq!(s.latest().map(|b| b.time), Some(2));
        assert_eq!(s.get(2).map(|b| b.time), Some(0));
    }

    #[test]
    fn slice_clamps_out_of_range() {
        let s = Series::from_newest_first(vec![Bar { open: 1.0, close: 2.0, low: 0.5, high: 2.5, time: 0 }]);
        assert_eq!(s.slice(0..10).len(), 1);
        assert!(s.slice(5..10).is_empty());
    }
}
