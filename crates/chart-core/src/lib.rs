// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports the bar model, viewport math, interaction loop and renderer.

pub mod chart;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod overlay;
pub mod scale;
pub mod series;
pub mod text;
pub mod theme;
pub mod timeframe;
pub mod types;
pub mod viewport;

pub use chart::{CandleChart, RenderOptions};
pub use error::ChartError;
pub use interaction::{BarSelectionListener, ChartController, Gesture};
pub use layout::{layout_frame, FrameLayout};
pub use overlay::{ScreenOverlay, Status};
pub use series::{Bar, Series};
pub use text::TextShaper;
pub use theme::Theme;
pub use timeframe::TimeFrame;
pub use viewport::{Viewport, DEFAULT_VISIBLE_COUNT, MIN_VISIBLE_COUNT};
