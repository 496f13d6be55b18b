// File: crates/market-data/src/error.rs
// Summary: Errors raised while fetching or decoding bars and tickers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("missing market data API key (set POLYGON_API_KEY)")]
    MissingApiKey,
    #[error("market data api error: {0}")]
    Api(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid bar at {time}: {source}")]
    InvalidBar {
        time: i64,
        #[source]
        source: chart_core::ChartError,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no tickers available")]
    EmptyTickerList,
    #[error("unknown ticker: {0}")]
    UnknownTicker(String),
    #[error("background load failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<serde_json::Error> for MarketDataError {
    fn from(e: serde_json::Error) -> Self {
        MarketDataError::Parse(e.to_string())
    }
}
