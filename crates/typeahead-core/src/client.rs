//! Search client boundary.
//!
//! The core needs exactly one thing from the networking side: turn a query
//! string into either a list of result strings or a [`SearchError`]. No
//! retries happen behind this trait.

use futures::future::{self, BoxFuture};
use futures::FutureExt;

use crate::error::SearchError;

pub type SearchFuture = BoxFuture<'static, Result<Vec<String>, SearchError>>;

pub trait SearchClient: Send + Sync {
    /// Start a search for `query`.
    ///
    /// The returned future must own everything it needs; the pipeline drops
    /// it unpolled or mid-flight when the search is superseded.
    fn search(&self, query: &str) -> SearchFuture;
}

/// Offline client that answers every query with itself as the only result.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoClient;

impl SearchClient for EchoClient {
    fn search(&self, query: &str) -> SearchFuture {
        future::ready(Ok(vec![query.to_string()])).boxed()
    }
}

impl<C: SearchClient + ?Sized> SearchClient for std::sync::Arc<C> {
    fn search(&self, query: &str) -> SearchFuture {
        (**self).search(query)
    }
}
