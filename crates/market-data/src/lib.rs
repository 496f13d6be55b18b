// File: crates/market-data/src/lib.rs
// Summary: Market-data crate entry point; bar sources for the terminal screen.

pub mod client;
pub mod config;
pub mod csv_source;
pub mod error;
pub mod model;
pub mod source;

pub use client::PolygonClient;
pub use config::MarketDataConfig;
pub use csv_source::CsvBarSource;
pub use error::MarketDataError;
pub use model::Ticker;
pub use source::BarSource;
