//! Terminal UI for VIZOR - widgets and render-side state

mod app;
mod widgets;

pub use app::App;
pub use widgets::{HelpWidget, SpectrumWidget, StatusBarWidget};
