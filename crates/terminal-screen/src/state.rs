// File: crates/terminal-screen/src/state.rs
// Summary: Screen states and the bar-info panel model.

use chart_core::chart::format_price;
use chart_core::{Bar, Series, TimeFrame};
use chrono::FixedOffset;
use market_data::Ticker;

#[derive(Clone, Debug, Default)]
pub enum ScreenState {
    #[default]
    Initial,
    Loading,
    Content(Content),
}

impl ScreenState {
    pub fn content(&self) -> Option<&Content> {
        match self {
            ScreenState::Content(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }
}

#[derive(Clone, Debug)]
pub struct Content {
    pub tickers: Vec<Ticker>,
    pub current_ticker: Ticker,
    pub bars: Series,
    pub time_frame: TimeFrame,
    pub bar_for_info: Option<BarInfo>,
}

/// The bar surfaced by a tap, with its position in the series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarInfo {
    pub index: usize,
    pub bar: Bar,
}

impl BarInfo {
    pub fn new(index: usize, bar: Bar) -> Self {
        Self { index, bar }
    }

    /// `D Mon, HH:00` in `offset`, e.g. `9 Jan, 14:00`.
    pub fn date_label(&self, offset: &FixedOffset) -> String {
        self.bar
            .datetime_in(offset)
            .map(|t| t.format("%-d %b, %H:00").to_string())
            .unwrap_or_default()
    }

    /// Panel rows: index, open, close, high, low, date.
    pub fn lines(&self, offset: &FixedOffset) -> Vec<String> {
        vec![
            self.index.to_string(),
            format_price(self.bar.open),
            format_price(self.bar.close),
            format_price(self.bar.high),
            format_price(self.bar.low),
            self.date_label(offset),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn info_lines() {
        let t = Utc.with_ymd_and_hms(2023, 1, 9, 14, 35, 0).unwrap().timestamp_millis();
        let info = BarInfo::new(3, Bar { open: 1.0, close: 2.0, low: 0.5, high: 2.5, time: t });
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(info.lines(&utc), vec!["3", "1.00", "2.00", "2.50", "0.50", "9 Jan, 14:00"]);
    }
}
