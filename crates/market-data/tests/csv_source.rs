// File: crates/market-data/tests/csv_source.rs
// Purpose: CSV directory source: ticker discovery, column detection, ordering.

use std::path::PathBuf;

use chart_core::TimeFrame;
use market_data::{BarSource, CsvBarSource, MarketDataError, Ticker};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("market-data-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

const CSV: &str = "Date,Open,High,Low,Close,Volume
2023-01-09 00:00:00,10,12,9,11,100
2023-01-09 01:00:00,11,13,10,12.5,100
not-a-time,1,1,1,1,1
2023-01-09 02:00:00,12.5,12.6,11,11.2,100
2023-01-09 03:00:00,11,10,12,11,100
";

#[tokio::test]
async fn loads_rows_newest_first_and_skips_bad_ones() {
    let dir = scratch_dir("rows");
    std::fs::write(dir.join("AAPL_1h.csv"), CSV).unwrap();
    let src = CsvBarSource::new(&dir);

    let s = src.load_bars(&Ticker::new("aapl", ""), TimeFrame::Hour1).await.expect("load");
    // bad time row and inverted-wick row dropped
    assert_eq!(s.len(), 3);
    assert_eq!(s.latest().map(|b| b.close), Some(11.2));
    assert_eq!(s.get(2).map(|b| b.open), Some(10.0));
}

#[tokio::test]
async fn tickers_come_from_file_names() {
    let dir = scratch_dir("tickers");
    std::fs::write(dir.join("AAPL_1h.csv"), CSV).unwrap();
    std::fs::write(dir.join("AAPL_5m.csv"), CSV).unwrap();
    std::fs::write(dir.join("MSFT_15m.csv"), CSV).unwrap();
    std::fs::write(dir.join("notes.txt"), "x").unwrap();
    std::fs::write(dir.join("README_v2.csv"), CSV).unwrap();

    let src = CsvBarSource::new(&dir);
    let ids = src.load_tickers().await.expect("list").into_iter().map(|t| t.id).collect::<Vec<_>>();
    assert_eq!(ids, vec!["AAPL".to_string(), "MSFT".to_string()]);
}

#[tokio::test]
async fn missing_file_is_unknown_ticker() {
    let dir = scratch_dir("missing");
    let src = CsvBarSource::new(&dir);
    let err = src.load_bars(&Ticker::new("TSLA", ""), TimeFrame::Min5).await.unwrap_err();
    assert!(matches!(err, MarketDataError::UnknownTicker(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_loads_share_the_runtime() {
    let dir = scratch_dir("concurrent");
    std::fs::write(dir.join("AAPL_1h.csv"), CSV).unwrap();
    std::fs::write(dir.join("MSFT_1h.csv"), CSV).unwrap();
    let src = CsvBarSource::new(&dir);
    let aapl = Ticker::new("AAPL", "");
    let msft = Ticker::new("MSFT", "");

    let (a, m, t) = tokio::join!(
        src.load_bars(&aapl, TimeFrame::Hour1),
        src.load_bars(&msft, TimeFrame::Hour1),
        src.load_tickers(),
    );
    assert_eq!(a.expect("aapl").len(), 3);
    assert_eq!(m.expect("msft").len(), 3);
    assert_eq!(t.expect("tickers").len(), 2);
}
