// File: crates/market-data/src/model.rs
// Summary: Ticker model and wire payloads of the aggregates / reference-tickers endpoints.

use std::fmt;

use chart_core::{Bar, Series};
use log::warn;
use serde::Deserialize;

use crate::error::MarketDataError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Ticker {
    #[serde(rename = "ticker")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Ticker {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.id, self.name)
    }
}

/// One aggregate bar as sent by the API.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireBar {
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "t")]
    pub time: i64,
}

impl TryFrom<WireBar> for Bar {
    type Error = MarketDataError;

    fn try_from(w: WireBar) -> Result<Self, Self::Error> {
        Bar::try_new(w.open, w.close, w.low, w.high, w.time)
            .map_err(|source| MarketDataError::InvalidBar { time: w.time, source })
    }
}

/// Envelope shared by both endpoints. `results` is absent when nothing matched.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> ApiResponse<T> {
    /// Results, or the API's own error message when `status` is "ERROR".
    pub fn into_results(self) -> Result<Vec<T>, MarketDataError> {
        if self.status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("error")) {
            let msg = self.error.or(self.message).unwrap_or_else(|| "unknown error".to_string());
            return Err(MarketDataError::Api(msg));
        }
        Ok(self.results)
    }
}

/// Decode an aggregates body (requested with `sort=desc`) into a newest-first series.
pub fn parse_aggregates(body: &str) -> Result<Series, MarketDataError> {
    let resp: ApiResponse<WireBar> = serde_json::from_str(body)?;
    let wire = resp.into_results()?;
    let mut bars = wire.into_iter().map(Bar::try_from).collect::<Result<Vec<_>, _>>()?;
    if bars.windows(2).any(|w| w[0].time < w[1].time) {
        warn!("aggregates not newest-first; sorting {} bars", bars.len());
        bars.sort_by(|a, b| b.time.cmp(&a.time));
    }
    Ok(Series::from_newest_first(bars))
}

pub fn parse_tickers(body: &str) -> Result<Vec<Ticker>, MarketDataError> {
    let resp: ApiResponse<Ticker> = serde_json::from_str(body)?;
    resp.into_results()
}
