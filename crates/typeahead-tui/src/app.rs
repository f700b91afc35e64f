//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. Every frame it pulls the
//! observable fields from the [`SearchViewModel`]; every edit of the query
//! bar is pushed back through [`SearchViewModel::set_query`].

use crate::{
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        help_line::HelpLine,
        query_bar::{QueryBar, QueryBarState},
        result_list::{ResultList, ResultListState},
    },
};
use crossterm::{
    event::{self as ct_event, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tokio::sync::watch;
use typeahead_core::SearchViewModel;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub query: QueryBarState,
    pub results: ResultListState,
    pub theme: Theme,
    /// Mirror of `is_request_in_flight` as of the last sync.
    pub in_flight: bool,
    /// Frame counter; advances the spinner.
    pub tick: usize,
    pub quit: bool,
}

impl AppState {
    pub fn new(theme: Theme) -> Self {
        Self {
            query: QueryBarState::default(),
            results: ResultListState::default(),
            theme,
            in_flight: false,
            tick: 0,
            quit: false,
        }
    }

    /// Apply an event. Returns the new query text when the event edited it.
    pub fn handle(&mut self, event: AppEvent) -> Option<String> {
        match event {
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
                None
            }
            AppEvent::SelectUp | AppEvent::SelectDown | AppEvent::PageUp | AppEvent::PageDown => {
                self.results.handle(&event);
                None
            }
            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => None,
            other => self
                .query
                .handle(&other)
                .then(|| self.query.query.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<'a> {
    view_model: &'a SearchViewModel,
    results: watch::Receiver<Vec<String>>,
    state: AppState,
}

impl<'a> App<'a> {
    pub fn new(view_model: &'a SearchViewModel, theme: Theme) -> Self {
        let results = view_model.subscribe_results();
        let mut state = AppState::new(theme);
        state.query.query = view_model.query();
        state.query.cursor = state.query.query.len();
        Self {
            view_model,
            results,
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.sync();
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                let raw = ct_event::read()?;
                // Ignore key release/repeat reports on terminals that send them
                if matches!(raw, Event::Key(key) if key.kind != KeyEventKind::Press) {
                    continue;
                }
                if let Some(ev) = event::to_app_event(raw) {
                    tracing::debug!(event = ?ev, "key event");
                    self.handle(ev);
                }
            }
        }
        Ok(())
    }

    fn handle(&mut self, event: AppEvent) {
        if let Some(query) = self.state.handle(event) {
            self.view_model.set_query(query);
        }
    }

    /// Pull the observable fields into the render state.
    fn sync(&mut self) {
        if self.results.has_changed().unwrap_or(false) {
            let items = self.results.borrow_and_update().clone();
            self.state.results.replace(items);
        }
        self.state.in_flight = self.view_model.is_request_in_flight();
        if self.state.in_flight {
            self.state.tick = self.state.tick.wrapping_add(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn draw(frame: &mut Frame, state: &AppState) {
    // Vertical: 3-line query bar | results | 1-line help
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let busy = state.in_flight.then_some(state.tick);
    let query_bar = QueryBar::new(&state.query, busy, &state.theme);
    let (cx, cy) = query_bar.cursor_position(vert[0]);
    frame.render_widget(query_bar, vert[0]);
    frame.render_widget(ResultList::new(&state.results, &state.theme), vert[1]);
    frame.render_widget(HelpLine::new(&state.theme), vert[2]);
    frame.set_cursor_position((cx, cy));
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
