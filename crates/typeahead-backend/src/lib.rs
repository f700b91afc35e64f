//! typeahead-backend: the catalogue search API behind the
//! [`SearchClient`](typeahead_core::SearchClient) boundary.
//!
//! The core only ever sees `query -> Result<Vec<String>, SearchError>`.
//! Everything about the remote API lives here: building the request URL
//! ([`endpoint`]), talking HTTP ([`client`]) and decoding the listing payload
//! ([`response`]).

pub mod client;
pub mod endpoint;
pub mod response;

pub use client::CatalogClient;
pub use endpoint::SearchEndpoint;
pub use response::{Listing, Paging, SearchResponse};
