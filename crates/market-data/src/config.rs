// File: crates/market-data/src/config.rs
// Summary: Client configuration with environment defaults and builder-style overrides.

use chrono::NaiveDate;

const DEFAULT_BASE_URL: &str = "https://api.polygon.io";
const API_KEY_ENV: &str = "POLYGON_API_KEY";

#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    pub api_key: String,
    pub base_url: String,
    /// Inclusive date range requested from the aggregates endpoint.
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Maximum bars per aggregates request.
    pub limit: u32,
    /// Maximum tickers listed by `load_tickers`.
    pub ticker_limit: u32,
}

impl MarketDataConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), ..Self::default() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        // keep the range ordered
        if from <= to {
            self.from = from;
            self.to = to;
        } else {
            self.from = to;
            self.to = from;
        }
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, 50_000);
        self
    }

    pub fn with_ticker_limit(mut self, limit: u32) -> Self {
        self.ticker_limit = limit.clamp(1, 1_000);
        self
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            from: NaiveDate::from_ymd_opt(2022, 1, 9).unwrap_or_default(),
            to: NaiveDate::from_ymd_opt(2023, 1, 9).unwrap_or_default(),
            limit: 50_000,
            ticker_limit: 100,
        }
    }
}
