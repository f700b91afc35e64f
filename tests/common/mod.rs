//! Shared test utilities for typeahead integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Time-dependent helpers assume the paused tokio clock
//! (`#[tokio::test(start_paused = true)]`).

pub mod assertions;
pub mod builders;
pub mod fake_catalog;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
