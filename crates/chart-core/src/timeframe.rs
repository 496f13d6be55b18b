// File: crates/chart-core/src/timeframe.rs
// Summary: Bar granularity with API values, labels and time-delimiter rules.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, FixedOffset, Timelike};

use crate::error::ChartError;
use crate::series::Bar;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    Min5,
    Min15,
    Min30,
    #[default]
    Hour1,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 4] = [TimeFrame::Min5, TimeFrame::Min15, TimeFrame::Min30, TimeFrame::Hour1];

    /// `{multiplier}/{timespan}` path segment of the aggregates endpoint.
    pub fn api_value(&self) -> &'static str {
        match self {
            TimeFrame::Min5 => "5/minute",
            TimeFrame::Min15 => "15/minute",
            TimeFrame::Min30 => "30/minute",
            TimeFrame::Hour1 => "1/hour",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::Min5 => "5 min",
            TimeFrame::Min15 => "15 min",
            TimeFrame::Min30 => "30 min",
            TimeFrame::Hour1 => "1 hour",
        }
    }

    /// Compact token used in CLI args and CSV file names.
    pub fn short(&self) -> &'static str {
        match self {
            TimeFrame::Min5 => "5m",
            TimeFrame::Min15 => "15m",
            TimeFrame::Min30 => "30m",
            TimeFrame::Hour1 => "1h",
        }
    }

    /// Whether a delimiter belongs at `bar`, given the next older bar (if any).
    pub fn needs_delimiter(&self, bar: &Bar, older: Option<&Bar>, offset: &FixedOffset) -> bool {
        let Some(t) = bar.datetime_in(offset) else { return false };
        match self {
            TimeFrame::Min5 => t.minute() == 0,
            TimeFrame::Min15 => t.minute() == 0 && t.hour() % 2 == 0,
            TimeFrame::Min30 | TimeFrame::Hour1 => {
                let older_day = older.and_then(|b| b.datetime_in(offset)).map(|o| o.day());
                older_day != Some(t.day())
            }
        }
    }

    /// Text drawn under a delimiter: hour for intraday frames, day + month otherwise.
    pub fn delimiter_label(&self, bar: &Bar, offset: &FixedOffset) -> String {
        let Some(t) = bar.datetime_in(offset) else { return String::new() };
        match self {
            TimeFrame::Min5 | TimeFrame::Min15 => format!("{:02}:00", t.hour()),
            TimeFrame::Min30 | TimeFrame::Hour1 => format!("{} {}", t.day(), t.format("%b")),
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeFrame {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        TimeFrame::ALL
            .into_iter()
            .find(|tf| norm == tf.short() || norm == tf.api_value() || norm == tf.label())
            .ok_or_else(|| ChartError::UnknownTimeFrame(s.to_string()))
    }
}
