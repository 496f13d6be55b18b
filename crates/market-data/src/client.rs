// File: crates/market-data/src/client.rs
// Summary: HTTP client for the aggregates and reference-tickers endpoints.

use async_trait::async_trait;
use chart_core::{Series, TimeFrame};
use log::debug;
use reqwest::Url;

use crate::config::MarketDataConfig;
use crate::error::MarketDataError;
use crate::model::{parse_aggregates, parse_tickers, Ticker};
use crate::source::BarSource;

#[derive(Clone)]
pub struct PolygonClient {
    config: MarketDataConfig,
    http: reqwest::Client,
}

impl PolygonClient {
    pub fn new(config: MarketDataConfig) -> Result<Self, MarketDataError> {
        if config.api_key.trim().is_empty() {
            return Err(MarketDataError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .user_agent("ticker-terminal/0.1")
            .build()?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self, MarketDataError> {
        Self::new(MarketDataConfig::default())
    }

    pub fn config(&self) -> &MarketDataConfig {
        &self.config
    }

    pub fn aggregates_url(&self, ticker: &str, time_frame: TimeFrame) -> Result<Url, MarketDataError> {
        let path = format!(
            "{}/v2/aggs/ticker/{}/range/{}/{}/{}",
            self.config.base_url,
            ticker.to_ascii_uppercase(),
            time_frame.api_value(),
            self.config.from.format("%Y-%m-%d"),
            self.config.to.format("%Y-%m-%d"),
        );
        let limit = self.config.limit.to_string();
        Url::parse_with_params(
            &path,
            &[
                ("adjusted", "true"),
                ("sort", "desc"),
                ("limit", limit.as_str()),
                ("apiKey", self.config.api_key.as_str()),
            ],
        )
        .map_err(|e| MarketDataError::Parse(format!("bad url: {e}")))
    }

    pub fn tickers_url(&self) -> Result<Url, MarketDataError> {
        let path = format!("{}/v3/reference/tickers", self.config.base_url);
        let limit = self.config.ticker_limit.to_string();
        Url::parse_with_params(
            &path,
            &[
                ("market", "stocks"),
                ("active", "true"),
                ("limit", limit.as_str()),
                ("apiKey", self.config.api_key.as_str()),
            ],
        )
        .map_err(|e| MarketDataError::Parse(format!("bad url: {e}")))
    }

    async fn get(&self, url: Url) -> Result<String, MarketDataError> {
        debug!("GET {}{}", url.origin().ascii_serialization(), url.path());
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(MarketDataError::Api(format!("HTTP {status}: {}", body.chars().take(200).collect::<String>())));
        }
        Ok(body)
    }
}

#[async_trait]
impl BarSource for PolygonClient {
    async fn load_tickers(&self) -> Result<Vec<Ticker>, MarketDataError> {
        let body = self.get(self.tickers_url()?).await?;
        let tickers = parse_tickers(&body)?;
        debug!("loaded {} tickers", tickers.len());
        Ok(tickers)
    }

    async fn load_bars(&self, ticker: &Ticker, time_frame: TimeFrame) -> Result<Series, MarketDataError> {
        let body = self.get(self.aggregates_url(&ticker.id, time_frame)?).await?;
        let series = parse_aggregates(&body)?;
        debug!("loaded {} bars for {} @ {}", series.len(), ticker.id, time_frame);
        Ok(series)
    }
}
