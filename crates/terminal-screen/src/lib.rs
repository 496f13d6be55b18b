// File: crates/terminal-screen/src/lib.rs
// Summary: Screen-state crate entry point.

pub mod state;
pub mod view_model;

pub use state::{BarInfo, Content, ScreenState};
pub use view_model::TerminalViewModel;
