// File: crates/terminal-screen/src/view_model.rs
// Summary: View model driving the screen state from async fetches.
//
// Fetches run on a Tokio runtime; their results come back over a channel and are
// applied only on the caller's (UI) thread through `poll` / `next_update`.
// A failed fetch reverts to the state captured before it started.

use std::sync::Arc;

use chart_core::{Bar, BarSelectionListener, Series, TimeFrame};
use log::{debug, info, warn};
use market_data::{BarSource, MarketDataError, Ticker};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::state::{BarInfo, Content, ScreenState};

enum Outcome {
    Tickers(Result<Vec<Ticker>, MarketDataError>),
    Bars {
        ticker: Ticker,
        time_frame: TimeFrame,
        result: Result<Series, MarketDataError>,
    },
}

struct Completion {
    generation: u64,
    outcome: Outcome,
}

pub struct TerminalViewModel {
    source: Arc<dyn BarSource>,
    runtime: Handle,
    state: ScreenState,
    /// Revert point for the request in flight.
    last_state: ScreenState,
    last_error: Option<String>,
    /// Bumped per request; completions carrying an older value are stale.
    generation: u64,
    in_flight: usize,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
}

impl TerminalViewModel {
    pub fn new(source: Arc<dyn BarSource>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            state: ScreenState::Initial,
            last_state: ScreenState::Initial,
            last_error: None,
            generation: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Message of the most recent failed load, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetch the symbol list; on success the first symbol is loaded at the default time frame.
    pub fn load_tickers(&mut self) {
        self.last_state = self.state.clone();
        let generation = self.next_generation();
        let source = Arc::clone(&self.source);
        self.spawn(generation, async move { Outcome::Tickers(source.load_tickers().await) });
    }

    /// Switch to `Loading` and fetch bars for `ticker` at `time_frame`.
    /// Returns false (and does nothing) when there is no content to return to.
    pub fn load_content(&mut self, ticker: Ticker, time_frame: TimeFrame) -> bool {
        // A load superseding another keeps the original revert point.
        if !self.state.is_loading() {
            self.last_state = self.state.clone();
        }
        if self.last_state.content().is_none() {
            warn!("load_content({}, {}) ignored: no content yet", ticker.id, time_frame);
            return false;
        }
        self.state = ScreenState::Loading;
        let generation = self.next_generation();
        let source = Arc::clone(&self.source);
        debug!("loading {} @ {} (request #{generation})", ticker.id, time_frame);
        self.spawn(generation, async move {
            let result = source.load_bars(&ticker, time_frame).await;
            Outcome::Bars { ticker, time_frame, result }
        });
        true
    }

    /// Show (or hide, with None) the info panel for a tapped bar.
    pub fn show_bar_info(&mut self, info: Option<BarInfo>) {
        if let ScreenState::Content(content) = &mut self.state {
            content.bar_for_info = info;
        }
    }

    /// Apply every completed fetch without blocking. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.rx.try_recv() {
            changed |= self.apply(completion);
        }
        changed
    }

    /// Wait for the next completion that is not stale and apply it.
    /// Returns false immediately when nothing is in flight.
    pub async fn next_update(&mut self) -> bool {
        while self.in_flight > 0 {
            let Some(completion) = self.rx.recv().await else { return false };
            if self.apply(completion) {
                return true;
            }
        }
        false
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn spawn<F>(&mut self, generation: u64, fut: F)
    where
        F: std::future::Future<Output = Outcome> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = fut.await;
            // receiver only disappears with the view model
            let _ = tx.send(Completion { generation, outcome });
        });
    }

    fn apply(&mut self, completion: Completion) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if completion.generation != self.generation {
            debug!("dropping stale response #{}", completion.generation);
            return false;
        }
        match completion.outcome {
            Outcome::Tickers(Ok(tickers)) => {
                let Some(first) = tickers.first().cloned() else {
                    self.fail(MarketDataError::EmptyTickerList);
                    return true;
                };
                info!("loaded {} tickers", tickers.len());
                self.last_error = None;
                self.state = ScreenState::Content(Content {
                    tickers,
                    current_ticker: first.clone(),
                    bars: Series::empty(),
                    time_frame: TimeFrame::default(),
                    bar_for_info: None,
                });
                self.load_content(first, TimeFrame::default());
            }
            Outcome::Tickers(Err(e)) => self.fail(e),
            Outcome::Bars { ticker, time_frame, result: Ok(bars) } => {
                let tickers = self.last_state.content().map(|c| c.tickers.clone()).unwrap_or_default();
                info!("loaded {} bars for {} @ {}", bars.len(), ticker.id, time_frame);
                self.last_error = None;
                self.state = ScreenState::Content(Content {
                    tickers,
                    current_ticker: ticker,
                    bars,
                    time_frame,
                    bar_for_info: None,
                });
            }
            Outcome::Bars { result: Err(e), .. } => self.fail(e),
        }
        true
    }

    fn fail(&mut self, e: MarketDataError) {
        warn!("load failed, reverting: {e}");
        self.last_error = Some(e.to_string());
        self.state = self.last_state.clone();
    }
}

impl BarSelectionListener for TerminalViewModel {
    fn on_bar_selected(&mut self, selection: Option<(usize, Bar)>) {
        self.show_bar_info(selection.map(|(index, bar)| BarInfo::new(index, bar)));
    }
}
