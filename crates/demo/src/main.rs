// File: crates/demo/src/main.rs
// Summary: Demo fetches bars for one symbol (API or CSV directory), applies a zoom/pan/tap
// sequence and renders the resulting frame to a PNG.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chart_core::{theme, Bar, ChartController, Gesture, RenderOptions, TimeFrame};
use chrono::FixedOffset;
use clap::Parser;
use log::info;
use market_data::{BarSource, CsvBarSource, PolygonClient, Ticker};
use terminal_screen::BarInfo;

#[derive(Parser, Debug)]
#[command(version, about = "Render a candlestick frame to PNG")]
struct Args {
    /// Symbol to load; defaults to the first one the source lists.
    #[arg(long)]
    symbol: Option<String>,
    /// 5m, 15m, 30m or 1h.
    #[arg(long, default_value = "1h")]
    timeframe: TimeFrame,
    /// Read `<SYMBOL>_<tf>.csv` files from this directory instead of the HTTP API.
    #[arg(long)]
    csv_dir: Option<PathBuf>,
    #[arg(long, default_value = "target/out/chart.png")]
    out: PathBuf,
    #[arg(long, default_value_t = chart_core::types::WIDTH)]
    width: i32,
    #[arg(long, default_value_t = chart_core::types::HEIGHT)]
    height: i32,
    /// Zoom factor (>1 shows fewer bars).
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,
    /// Pan in pixels; positive scrolls back in time.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan: f32,
    /// Tap at this plot-local x after the transform.
    #[arg(long)]
    tap_x: Option<f32>,
    #[arg(long, default_value = "dark")]
    theme: String,
    /// Hours east of UTC used for delimiters and labels.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset: i32,
    #[arg(long)]
    no_labels: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let offset = FixedOffset::east_opt(args.utc_offset * 3600)
        .with_context(|| format!("utc offset out of range: {}", args.utc_offset))?;

    let source: Arc<dyn BarSource> = match &args.csv_dir {
        Some(dir) => Arc::new(CsvBarSource::new(dir)),
        None => Arc::new(PolygonClient::from_env().context("creating API client")?),
    };

    let ticker = match &args.symbol {
        Some(s) => Ticker::new(s.to_uppercase(), ""),
        None => source
            .load_tickers()
            .await
            .context("loading tickers")?
            .into_iter()
            .next()
            .context("source lists no tickers")?,
    };
    let series = source
        .load_bars(&ticker, args.timeframe)
        .await
        .with_context(|| format!("loading {} @ {}", ticker.id, args.timeframe))?;
    println!("Loaded {} bars for {} @ {}", series.len(), ticker, args.timeframe);
    if series.is_empty() {
        anyhow::bail!("no bars returned for {}", ticker.id);
    }

    let opts = RenderOptions {
        width: args.width,
        height: args.height,
        theme: theme::find(&args.theme),
        draw_labels: !args.no_labels,
        utc_offset: offset,
        ..RenderOptions::default()
    };
    let plot = opts.plot_rect();
    let mut controller = ChartController::new(series, args.timeframe, plot.width(), plot.height());

    let mut selection: Option<(usize, Bar)> = None;
    let mut listener = |sel: Option<(usize, Bar)>| selection = sel;
    controller.apply(Gesture::Transform { zoom: args.zoom, pan_x: args.pan }, &mut listener);
    if let Some(x) = args.tap_x {
        controller.apply(Gesture::Tap { x }, &mut listener);
    }

    let vp = controller.viewport();
    let range = vp.visible_range(controller.series().len());
    info!("visible {:?} ({} bars, scrolled {:.1}px)", range, vp.visible_count, vp.scrolled_by);

    controller
        .chart()
        .render_to_png(&opts, &args.out)
        .with_context(|| format!("rendering {}", args.out.display()))?;
    println!("Wrote {}", args.out.display());

    match (args.tap_x, selection) {
        (_, Some((index, bar))) => {
            const ROWS: [&str; 6] = ["index", "open", "close", "high", "low", "date"];
            for (name, value) in ROWS.iter().zip(BarInfo::new(index, bar).lines(&offset)) {
                println!("  {name:>5}: {value}");
            }
        }
        (Some(x), None) => println!("Tap at x={x} hit no bar"),
        (None, None) => {}
    }
    Ok(())
}
