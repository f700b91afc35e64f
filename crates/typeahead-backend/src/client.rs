//! HTTP client for the catalogue search endpoint.
//!
//! One GET per search, no retries and no deadline: a request either completes,
//! fails, or is dropped by the pipeline when a newer search supersedes it.
//! Dropping the future aborts the underlying connection attempt.

use std::sync::Arc;

use bytes::Bytes;
use futures::FutureExt;
use http_body_util::{BodyExt, Empty};
use hyper::StatusCode;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use typeahead_core::config::BackendConfig;
use typeahead_core::{ErrorKind, SearchClient, SearchError, SearchFuture};

use crate::endpoint::SearchEndpoint;
use crate::response::SearchResponse;

/// [`SearchClient`] backed by the remote catalogue.
#[derive(Clone)]
pub struct CatalogClient {
    endpoint: Arc<SearchEndpoint>,
    http: Client<HttpConnector, Empty<Bytes>>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    pub fn new(endpoint: SearchEndpoint) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
            http: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(SearchEndpoint::from_config(config))
    }

    pub fn endpoint(&self) -> &SearchEndpoint {
        &self.endpoint
    }

    /// Fetch one page of listings for `query`.
    pub async fn fetch(&self, query: &str, page: u32) -> Result<SearchResponse, SearchError> {
        let uri = self.endpoint.search_uri(Some(query), page)?;
        tracing::debug!(%uri, "backend: GET");

        let response = self
            .http
            .get(uri)
            .await
            .map_err(|err| SearchError::new(ErrorKind::UnableToComplete, err.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SearchError::new(
                ErrorKind::InvalidResponse,
                format!("unexpected status {status}"),
            ));
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|err| SearchError::new(ErrorKind::InvalidData, err.to_string()))?
            .to_bytes();
        tracing::trace!(bytes = body.len(), "backend: body received");

        SearchResponse::decode(&body)
    }
}

impl SearchClient for CatalogClient {
    fn search(&self, query: &str) -> SearchFuture {
        let client = self.clone();
        let query = query.to_string();
        async move {
            let response = client.fetch(&query, 1).await?;
            Ok(response.titles())
        }
        .boxed()
    }
}
