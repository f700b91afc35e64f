//! One-line key reference rendered at the bottom of the screen.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const BINDINGS: &[(&str, &str)] = &[
    ("Esc", "quit"),
    ("↑↓", "select"),
    ("PgUp/PgDn", "page"),
    ("Ctrl+u", "clear"),
];

pub struct HelpLine<'a> {
    theme: &'a Theme,
}

impl<'a> HelpLine<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::with_capacity(BINDINGS.len() * 2);
        for (key, action) in BINDINGS {
            spans.push(Span::styled(format!(" {key}"), self.theme.help_key));
            spans.push(Span::styled(format!(" {action} "), self.theme.help_text));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
