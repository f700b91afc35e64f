//! Query bar widget: the text input at the top of the screen.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `ClearLine` erases everything.
//! - `CursorLeft` / `CursorRight` move the cursor one character.
//!
//! [`QueryBarState::handle`] reports whether the text changed so the app
//! shell can forward exactly the edits (not cursor moves) to the view-model.

use crate::event::AppEvent;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// Braille spinner frames shown while a search is in flight.
const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct QueryBarState {
    pub query: String,
    /// Byte offset of the cursor within `query`.
    pub cursor: usize,
}

impl QueryBarState {
    /// Apply an editing event. Returns `true` when the query text changed.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Char(c) => {
                self.query.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                tracing::debug!(query = %self.query, cursor = self.cursor, "query: char inserted");
                true
            }
            AppEvent::Backspace if self.cursor > 0 => {
                let prev = self.prev_boundary();
                self.query.remove(prev);
                self.cursor = prev;
                tracing::debug!(query = %self.query, cursor = self.cursor, "query: backspace");
                true
            }
            AppEvent::ClearLine if !self.query.is_empty() => {
                self.query.clear();
                self.cursor = 0;
                tracing::debug!("query: cleared");
                true
            }
            AppEvent::CursorLeft => {
                self.cursor = self.prev_boundary();
                false
            }
            AppEvent::CursorRight => {
                self.cursor = self.query[self.cursor..]
                    .chars()
                    .next()
                    .map_or(self.cursor, |c| self.cursor + c.len_utf8());
                false
            }
            _ => false,
        }
    }

    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor]
            .char_indices()
            .last()
            .map_or(0, |(i, _)| i)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct QueryBar<'a> {
    state: &'a QueryBarState,
    /// `Some(tick)` while a request is in flight; drives the spinner frame.
    busy: Option<usize>,
    theme: &'a Theme,
}

impl<'a> QueryBar<'a> {
    pub fn new(state: &'a QueryBarState, busy: Option<usize>, theme: &'a Theme) -> Self {
        Self { state, busy, theme }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let col = self.state.query[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(2));
        (x, area.y + 1)
    }
}

impl Widget for QueryBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut title = vec![Span::raw(" Search ")];
        if let Some(tick) = self.busy {
            title.push(Span::styled(
                format!("{} ", SPINNER[tick % SPINNER.len()]),
                self.theme.spinner,
            ));
        }

        let block = Block::bordered()
            .title(Line::from(title))
            .border_style(self.theme.border_focused);

        let text = if self.state.query.is_empty() {
            Line::from(Span::styled(
                "type at least 3 characters",
                self.theme.query_placeholder,
            ))
        } else {
            Line::from(self.state.query.as_str())
        };
        Paragraph::new(text).block(block).render(area, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
