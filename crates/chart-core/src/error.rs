// File: crates/chart-core/src/error.rs
// Summary: Error type for bar validation and time frame parsing.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("invalid bar: {0}")]
    InvalidBar(&'static str),
    #[error("unknown time frame: {0}")]
    UnknownTimeFrame(String),
}
