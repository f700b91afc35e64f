//! typeahead TUI: ratatui front end over a [`SearchViewModel`].
//!
//! The caller owns the tokio runtime and the view-model; [`run`] blocks the
//! current thread on the terminal event loop while the pipeline runs on the
//! runtime's workers.

pub mod app;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use theme::Theme;

use typeahead_core::SearchViewModel;

/// Run the TUI until the user quits.
pub fn run(view_model: &SearchViewModel, theme: Theme) -> anyhow::Result<()> {
    App::new(view_model, theme).run()
}
