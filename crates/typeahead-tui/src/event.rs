//! Semantic application events: crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! The query bar always owns the keyboard, so there is a single (insert-style)
//! mapping: every printable character is text.
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `Esc`, `Ctrl+c`         | `Quit`                     |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | `Ctrl+u`                | `ClearLine`                |
//! | `←` / `→`               | `CursorLeft` / `CursorRight` |
//! | `↑` / `↓`               | `SelectUp` / `SelectDown`  |
//! | `PageUp` / `PageDown`   | `PageUp` / `PageDown`      |
//! | terminal resize         | `Resize(w, h)`             |

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// A printable character for the query bar.
    Char(char),
    Backspace,
    /// Erase the whole query.
    ClearLine,
    CursorLeft,
    CursorRight,
    /// Move the result selection.
    SelectUp,
    SelectDown,
    PageUp,
    PageDown,
    /// The terminal was resized to the given (width, height).
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`].
///
/// Returns `None` for events that carry no meaning for the application
/// (mouse events, focus changes, unbound keys).
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),
        Char('u') if key.modifiers == Mod::CONTROL => Some(AppEvent::ClearLine),
        Esc => Some(AppEvent::Quit),

        Left => Some(AppEvent::CursorLeft),
        Right => Some(AppEvent::CursorRight),
        Up => Some(AppEvent::SelectUp),
        Down => Some(AppEvent::SelectDown),
        PageUp => Some(AppEvent::PageUp),
        PageDown => Some(AppEvent::PageDown),

        // Shifted characters are ordinary text (uppercase letters, symbols)
        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
