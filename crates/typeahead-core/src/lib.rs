//! typeahead-core: debounced, cancellable search-as-you-type.
//!
//! # Architecture
//!
//! ```text
//! set_query ──► QueryPipeline driver ──► Scheduler::spawn(search)
//!                  │        ▲                      │
//!                  │        └──── completion ◄─────┘
//!                  ▼
//!     results / is_request_in_flight (watch)
//! ```
//!
//! The [`CancellationRegistry`] guarantees that starting a search cancels the
//! previous one, and the driver only applies the completion of the search it
//! is currently tracking. All observable state is written from the driver
//! task; searches themselves run wherever the [`Scheduler`] puts them.

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod scheduler;
pub mod view_model;

pub use client::{EchoClient, SearchClient, SearchFuture};
pub use error::{ErrorKind, SearchError};
pub use pipeline::{PipelineEvent, PipelineSettings, QueryPipeline, SearchOperation};
pub use registry::{CancellationRegistry, HandleId, Outcome, Registration};
pub use scheduler::{Scheduler, TokioScheduler};
pub use view_model::SearchViewModel;
