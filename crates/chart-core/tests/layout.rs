// File: crates/chart-core/tests/layout.rs
// Purpose: Frame layout: candle geometry, direction colors, time delimiters and price lines.

use chart_core::layout::{layout_frame, Direction, PriceLineKind};
use chart_core::series::{Bar, Series};
use chart_core::{TimeFrame, Viewport};
use chrono::{FixedOffset, TimeZone, Utc};

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// `n` bars, newest first, ending at `newest` and spaced `step_min` minutes apart.
fn timed(n: usize, newest: chrono::DateTime<Utc>, step_min: i64) -> Series {
    let bars = (0..n)
        .map(|i| {
            let t = newest - chrono::Duration::minutes(step_min * i as i64);
            let (o, c) = if i % 2 == 0 { (10.0, 11.0) } else { (11.0, 10.0) };
            Bar { open: o, close: c, low: 9.0, high: 12.0, time: t.timestamp_millis() }
        })
        .collect();
    Series::from_newest_first(bars)
}

fn delimiters(s: &Series, tf: TimeFrame, offset: FixedOffset) -> Vec<(usize, String)> {
    let v = Viewport::new(600.0, 300.0, s.len());
    layout_frame(s, &v, tf, &offset).delimiters.into_iter().map(|d| (d.index, d.label)).collect()
}

#[test]
fn five_minute_frame_marks_every_hour() {
    let s = timed(30, Utc.with_ymd_and_hms(2023, 1, 9, 12, 0, 0).unwrap(), 5);
    assert_eq!(
        delimiters(&s, TimeFrame::Min5, utc()),
        vec![(0, "12:00".to_string()), (12, "11:00".to_string()), (24, "10:00".to_string())]
    );
}

#[test]
fn fifteen_minute_frame_marks_even_hours() {
    let s = timed(20, Utc.with_ymd_and_hms(2023, 1, 9, 12, 0, 0).unwrap(), 15);
    assert_eq!(
        delimiters(&s, TimeFrame::Min15, utc()),
        vec![(0, "12:00".to_string()), (8, "10:00".to_string()), (16, "08:00".to_string())]
    );
}

#[test]
fn hourly_frame_marks_day_changes() {
    let s = timed(30, Utc.with_ymd_and_hms(2023, 1, 9, 2, 0, 0).unwrap(), 60);
    assert_eq!(
        delimiters(&s, TimeFrame::Hour1, utc()),
        vec![(2, "9 Jan".to_string()), (26, "8 Jan".to_string()), (29, "7 Jan".to_string())]
    );
}

#[test]
fn thirty_minute_frame_marks_day_changes() {
    // 01:00, 00:30, 00:00 on the 9th, then 23:30 on the 8th
    let s = timed(60, Utc.with_ymd_and_hms(2023, 1, 9, 1, 0, 0).unwrap(), 30);
    assert_eq!(
        delimiters(&s, TimeFrame::Min30, utc()),
        vec![(2, "9 Jan".to_string()), (50, "8 Jan".to_string()), (59, "7 Jan".to_string())]
    );
}

#[test]
fn delimiters_use_configured_offset() {
    let s = timed(30, Utc.with_ymd_and_hms(2023, 1, 9, 12, 0, 0).unwrap(), 5);
    let plus3 = FixedOffset::east_opt(3 * 3600).unwrap();
    let got = delimiters(&s, TimeFrame::Min5, plus3);
    assert_eq!(got[0], (0, "15:00".to_string()));
}

#[test]
fn candles_follow_direction_and_bar_width() {
    let s = timed(40, Utc.with_ymd_and_hms(2023, 1, 9, 12, 0, 0).unwrap(), 60);
    let v = Viewport::new(400.0, 300.0, s.len()); // 40 visible -> 10 px bars
    let frame = layout_frame(&s, &v, TimeFrame::Hour1, &utc());
    assert_eq!(frame.candles.len(), 40);

    let c0 = frame.candle(0).unwrap();
    let c1 = frame.candle(1).unwrap();
    assert_eq!(c0.direction, Direction::Up);
    assert_eq!(c1.direction, Direction::Down);
    assert_eq!(c0.x, 400.0);
    assert_eq!(c1.x, 390.0);
    assert_eq!(c0.body_width, 5.0);
    assert_eq!(c0.body_span(), (397.5, 402.5));

    // price 9..12 over 300 px -> 100 px per unit
    assert!((c0.wick_top - 0.0).abs() < 1e-3);
    assert!((c0.wick_bottom - 300.0).abs() < 1e-3);
    assert!((c0.body_top - 100.0).abs() < 1e-3);
    assert!((c0.body_bottom - 200.0).abs() < 1e-3);
}

#[test]
fn doji_body_is_at_least_one_pixel() {
    let s = Series::from_newest_first(vec![Bar { open: 5.0, close: 5.0, low: 4.0, high: 6.0, time: 0 }]);
    let v = Viewport::new(100.0, 100.0, 1);
    let frame = layout_frame(&s, &v, TimeFrame::Hour1, &utc());
    let c = frame.candle(0).unwrap();
    assert_eq!(c.direction, Direction::Up);
    assert!(c.body_bottom - c.body_top >= 1.0);
}

#[test]
fn price_lines_mark_max_current_min() {
    let s = timed(40, Utc.with_ymd_and_hms(2023, 1, 9, 12, 0, 0).unwrap(), 60);
    let v = Viewport::new(400.0, 300.0, s.len());
    let frame = layout_frame(&s, &v, TimeFrame::Hour1, &utc());
    let kinds = frame.price_lines.iter().map(|l| l.kind).collect::<Vec<_>>();
    assert_eq!(kinds, vec![PriceLineKind::Max, PriceLineKind::Current, PriceLineKind::Min]);
    assert_eq!(frame.price_lines[0].y, 0.0);
    assert_eq!(frame.price_lines[2].y, 300.0);
    // newest close is 11.0 -> 100 px from top
    assert_eq!(frame.price_lines[1].price, 11.0);
    assert!((frame.price_lines[1].y - 100.0).abs() < 1e-3);
}

#[test]
fn empty_series_lays_out_nothing() {
    let s = Series::empty();
    let v = Viewport::new(100.0, 100.0, 0);
    let frame = layout_frame(&s, &v, TimeFrame::Min5, &utc());
    assert!(frame.candles.is_empty() && frame.delimiters.is_empty() && frame.price_lines.is_empty());
}
