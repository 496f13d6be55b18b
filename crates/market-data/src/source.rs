// File: crates/market-data/src/source.rs
// Summary: Data-fetch seam consumed by the screen state.

use async_trait::async_trait;
use chart_core::{Series, TimeFrame};

use crate::error::MarketDataError;
use crate::model::Ticker;

/// Anything that can list symbols and return newest-first bars for one of them.
#[async_trait]
pub trait BarSource: Send + Sync {
    async fn load_tickers(&self) -> Result<Vec<Ticker>, MarketDataError>;

    async fn load_bars(&self, ticker: &Ticker, time_frame: TimeFrame) -> Result<Series, MarketDataError>;
}
