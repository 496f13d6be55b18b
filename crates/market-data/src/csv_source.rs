// File: crates/market-data/src/csv_source.rs
// Summary: BarSource over a directory of OHLC CSV exports named `<TICKER>_<timeframe>.csv`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chart_core::{Bar, Series, TimeFrame};
use chrono::{DateTime, NaiveDateTime};
use log::{debug, warn};

use crate::error::MarketDataError;
use crate::model::Ticker;
use crate::source::BarSource;

pub struct CsvBarSource {
    dir: PathBuf,
}

impl CsvBarSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_for(&self, ticker: &str, time_frame: TimeFrame) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", ticker.to_ascii_uppercase(), time_frame.short()))
    }

    /// Distinct tickers with at least one `<TICKER>_<tf>.csv` file, sorted.
    pub fn list_tickers(&self) -> Result<Vec<Ticker>, MarketDataError> {
        let mut ids = BTreeSet::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("csv")) != Some(true) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            if let Some((id, tf)) = stem.rsplit_once('_') {
                if tf.parse::<TimeFrame>().is_ok() && !id.is_empty() {
                    ids.insert(id.to_ascii_uppercase());
                }
            }
        }
        Ok(ids.into_iter().map(|id| Ticker::new(id.clone(), id)).collect())
    }
}

// File reads go through the blocking pool so a large export never stalls the runtime.
#[async_trait]
impl BarSource for CsvBarSource {
    async fn load_tickers(&self) -> Result<Vec<Ticker>, MarketDataError> {
        let lister = CsvBarSource::new(self.dir.clone());
        tokio::task::spawn_blocking(move || lister.list_tickers()).await?
    }

    async fn load_bars(&self, ticker: &Ticker, time_frame: TimeFrame) -> Result<Series, MarketDataError> {
        let path = self.file_for(&ticker.id, time_frame);
        let id = ticker.id.clone();
        tokio::task::spawn_blocking(move || {
            if !path.exists() {
                return Err(MarketDataError::UnknownTicker(format!("{} ({})", id, path.display())));
            }
            load_ohlc_csv(&path)
        })
        .await?
    }
}

/// Load an OHLC CSV (header-detected columns) into a newest-first series.
/// Rows with missing prices or broken OHLC invariants are skipped.
pub fn load_ohlc_csv(path: &Path) -> Result<Series, MarketDataError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    debug!("{}: headers {:?}", path.display(), headers);

    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
    let i_time = idx(&["time", "timestamp", "open_time", "date", "datetime", "t"])
        .ok_or_else(|| MarketDataError::Parse(format!("{}: no time column", path.display())))?;
    let i_open = idx(&["open", "o"]);
    let i_high = idx(&["high", "h"]);
    let i_low = idx(&["low", "l"]);
    let i_close = idx(&["close", "c", "adj_close", "close_price"]);
    let (Some(i_open), Some(i_high), Some(i_low), Some(i_close)) = (i_open, i_high, i_low, i_close) else {
        return Err(MarketDataError::Parse(format!("{}: missing open/high/low/close column", path.display())));
    };

    let mut bars = Vec::new();
    let mut skipped = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let num = |i: usize| rec.get(i).and_then(|s| s.trim().parse::<f64>().ok());
        let time = rec.get(i_time).and_then(parse_time_ms);
        match (time, num(i_open), num(i_high), num(i_low), num(i_close)) {
            (Some(t), Some(o), Some(h), Some(l), Some(c)) => match Bar::try_new(o, c, l, h, t) {
                Ok(bar) => bars.push(bar),
                Err(_) => skipped += 1,
            },
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!("{}: skipped {skipped} unusable rows", path.display());
    }
    bars.sort_by(|a, b| b.time.cmp(&a.time));
    Ok(Series::from_newest_first(bars))
}

/// Epoch seconds / milliseconds, RFC 3339, or `YYYY-MM-DD HH:MM:SS` (UTC) -> epoch ms.
pub fn parse_time_ms(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // epoch ms vs epoch sec
        return Some(if n > 10_i64.pow(11) { n } else { n * 1000 });
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.timestamp_millis());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|t| t.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formats() {
        assert_eq!(parse_time_ms("1673222400"), Some(1_673_222_400_000));
        assert_eq!(parse_time_ms("1673222400000"), Some(1_673_222_400_000));
        assert_eq!(parse_time_ms("2023-01-09T00:00:00Z"), Some(1_673_222_400_000));
        assert_eq!(parse_time_ms("2023-01-09 00:00:00"), Some(1_673_222_400_000));
        assert_eq!(parse_time_ms("yesterday"), None);
    }
}
