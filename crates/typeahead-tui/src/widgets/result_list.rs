//! Result list widget: the scrollable list under the query bar.
//!
//! # Navigation
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `↓` | Move the selection one row |
//! | `PageUp` / `PageDown` | Move the selection one page |
//!
//! The list is replaced wholesale whenever the view-model publishes new
//! results; the selection then returns to the top.

use std::cell::Cell;

use crate::event::AppEvent;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ResultListState {
    items: Vec<String>,
    /// Index of the highlighted row.
    pub selected: usize,
    /// Index of the first visible row.
    pub offset: usize,
    /// Cached from the last render so `handle()` can page by the real height.
    last_height: Cell<usize>,
}

impl Default for ResultListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            offset: 0,
            last_height: Cell::new(10),
        }
    }
}

impl ResultListState {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Swap in a fresh result set.
    pub fn replace(&mut self, items: Vec<String>) {
        tracing::debug!(count = items.len(), "results: replaced");
        self.items = items;
        self.selected = 0;
        self.offset = 0;
    }

    fn height(&self) -> usize {
        self.last_height.get().max(1)
    }

    pub fn handle(&mut self, event: &AppEvent) {
        let last = match self.items.len() {
            0 => return,
            n => n - 1,
        };
        self.selected = match event {
            AppEvent::SelectUp => self.selected.saturating_sub(1),
            AppEvent::SelectDown => (self.selected + 1).min(last),
            AppEvent::PageUp => self.selected.saturating_sub(self.height()),
            AppEvent::PageDown => (self.selected + self.height()).min(last),
            _ => return,
        };
        self.scroll_to_selection();
        tracing::debug!(selected = self.selected, offset = self.offset, "results: selection moved");
    }

    fn scroll_to_selection(&mut self) {
        let height = self.height();
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ResultList<'a> {
    state: &'a ResultListState,
    theme: &'a Theme,
}

impl<'a> ResultList<'a> {
    pub fn new(state: &'a ResultListState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for ResultList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let total = self.state.items.len();
        let block = Block::bordered()
            .title(format!(" Results ({total}) "))
            .border_style(self.theme.border_unfocused);
        let inner = block.inner(area);
        block.render(area, buf);

        let height = inner.height as usize;
        self.state.last_height.set(height);

        if total == 0 {
            Paragraph::new(Line::from(Span::styled("no results", self.theme.result_empty)))
                .render(inner, buf);
            return;
        }

        let start = self.state.offset.min(total.saturating_sub(1));
        let end = (start + height).min(total);
        let lines: Vec<Line<'_>> = self.state.items[start..end]
            .iter()
            .enumerate()
            .map(|(row, item)| {
                let style = if start + row == self.state.selected {
                    self.theme.result_selected
                } else {
                    self.theme.result_item
                };
                Line::from(Span::styled(item.as_str(), style))
            })
            .collect();

        // Text plus a 1-column scrollbar strip inside the borders.
        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect {
            x: inner.right().saturating_sub(1),
            width: 1,
            ..inner
        };
        Paragraph::new(lines).render(text_area, buf);

        let mut sb_state = ScrollbarState::new(total)
            .position(start)
            .viewport_content_length(height);
        StatefulWidget::render(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            sb_area,
            buf,
            &mut sb_state,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
