//! Ratatui widgets for the typeahead TUI.

pub mod help_line;
pub mod query_bar;
pub mod result_list;
