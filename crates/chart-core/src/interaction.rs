// File: crates/chart-core/src/interaction.rs
// Summary: Interaction loop: pointer gestures -> viewport updates, taps -> bar selection.

use log::debug;

use crate::chart::CandleChart;
use crate::series::{Bar, Series};
use crate::timeframe::TimeFrame;
use crate::viewport::Viewport;

/// Pointer input in plot-local pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Pinch/drag step: `zoom` is multiplicative (1.0 = none), `pan_x` in pixels.
    Transform { zoom: f32, pan_x: f32 },
    /// Single tap at `x`.
    Tap { x: f32 },
    /// Canvas size changed.
    Resize { width: f32, height: f32 },
}

/// Info-display collaborator notified when a tap selects (or misses) a bar.
pub trait BarSelectionListener {
    /// `Some((index, bar))` on a hit, `None` when the tap landed on no bar.
    fn on_bar_selected(&mut self, selection: Option<(usize, Bar)>);
}

impl<F: FnMut(Option<(usize, Bar)>)> BarSelectionListener for F {
    fn on_bar_selected(&mut self, selection: Option<(usize, Bar)>) {
        self(selection)
    }
}

/// Owns the series and viewport for one chart and applies gestures to them.
#[derive(Clone, Debug)]
pub struct ChartController {
    series: Series,
    viewport: Viewport,
    time_frame: TimeFrame,
    selected: Option<usize>,
}

impl ChartController {
    pub fn new(series: Series, time_frame: TimeFrame, width: f32, height: f32) -> Self {
        let viewport = Viewport::new(width, height, series.len());
        Self { series, viewport, time_frame, selected: None }
    }

    pub fn series(&self) -> &Series { &self.series }
    pub fn viewport(&self) -> &Viewport { &self.viewport }
    pub fn time_frame(&self) -> TimeFrame { self.time_frame }
    pub fn selected(&self) -> Option<usize> { self.selected }

    /// Swap in freshly loaded bars; the viewport resets to the newest bars.
    pub fn replace_series(&mut self, series: Series, time_frame: TimeFrame) {
        debug!("replace series: {} bars @ {}", series.len(), time_frame);
        self.viewport = Viewport::new(self.viewport.width, self.viewport.height, series.len());
        self.series = series;
        self.time_frame = time_frame;
        self.selected = None;
    }

    /// Apply one gesture. Returns true when the frame needs repainting.
    pub fn apply(&mut self, gesture: Gesture, listener: &mut impl BarSelectionListener) -> bool {
        let len = self.series.len();
        match gesture {
            Gesture::Transform { zoom, pan_x } => {
                let zoomed = self.viewport.zoom(len, zoom);
                let panned = self.viewport.pan(len, pan_x);
                zoomed || panned
            }
            Gesture::Resize { width, height } => self.viewport.resize(len, width, height),
            Gesture::Tap { x } => {
                let hit = self.hit_test(x);
                let selection = hit.and_then(|i| self.series.get(i).map(|b| (i, *b)));
                debug!("tap at x={x:.1} -> {hit:?}");
                listener.on_bar_selected(selection);
                let changed = self.selected != hit;
                self.selected = hit;
                changed
            }
        }
    }

    /// Visible bar whose body span contains `x`; gaps between bodies miss.
    pub fn hit_test(&self, x: f32) -> Option<usize> {
        let idx = self.viewport.bar_at(self.series.len(), x)?;
        self.viewport.visible_range(self.series.len()).contains(&idx).then_some(idx)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Frame description for the renderer.
    pub fn chart(&self) -> CandleChart<'_> {
        CandleChart::new(&self.series, &self.viewport, self.time_frame).with_selected(self.selected)
    }
}
