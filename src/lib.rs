//! typeahead: search-as-you-type over a remote car catalogue.
//!
//! The binary wires three crates together:
//!
//! ```text
//! typeahead-tui ──set_query──► typeahead-core (SearchViewModel)
//!        ▲                          │
//!        └── results / in-flight ◄──┤
//!                                   ▼
//!                        typeahead-backend (CatalogClient)
//! ```
//!
//! This crate holds the glue that is not specific to any one of them: picking
//! a [`SearchClient`] from the configuration, and the one-shot [`headless`]
//! mode used by `--query`.

pub mod headless;

use std::sync::Arc;

use typeahead_backend::CatalogClient;
use typeahead_core::config::BackendConfig;
use typeahead_core::{EchoClient, SearchClient};

pub use headless::{run_once, HeadlessError};

/// Choose the search backend: the offline echo client or the HTTP catalogue.
pub fn search_client(backend: &BackendConfig, offline: bool) -> Arc<dyn SearchClient> {
    if offline {
        tracing::info!("search client: offline echo");
        Arc::new(EchoClient)
    } else {
        tracing::info!(base_url = %backend.base_url, site = %backend.site, "search client: catalogue");
        Arc::new(CatalogClient::from_config(backend))
    }
}
