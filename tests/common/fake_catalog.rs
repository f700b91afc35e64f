//! Fake catalogue search API for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves `GET /sites/{site}/search` and answers from a per-query
//! script:
//!
//! - [`Script::Ok`]: 200 with a search response listing the given titles
//! - [`Script::Status`]: the given status code and an empty body
//! - [`Script::Raw`]: 200 with an arbitrary body
//!
//! Every request's site and query parameters are recorded so tests can check
//! the URL the client built.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeCatalog::start().await.unwrap();
//! api.script("911", Script::Ok(vec!["Porsche 911".into()])).await;
//! let client = CatalogClient::new(SearchEndpoint::new(api.base_url()));
//! ```

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use super::fixtures::search_body;

#[derive(Debug, Clone)]
pub enum Script {
    Ok(Vec<String>),
    Status(u16),
    Raw(String),
}

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub site: String,
    pub params: HashMap<String, String>,
}

#[derive(Default)]
struct CatalogState {
    scripts: HashMap<String, Script>,
    /// Artificial latency per query.
    delays: HashMap<String, Duration>,
    requests: Vec<RecordedRequest>,
}

/// Handle to the running fake catalogue.
pub struct FakeCatalog {
    addr: SocketAddr,
    state: Arc<Mutex<CatalogState>>,
}

impl FakeCatalog {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(CatalogState::default()));

        let app = Router::new()
            .route("/sites/{site}/search", get(search))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL with a trailing slash (e.g. `http://127.0.0.1:PORT/`).
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub async fn script(&self, query: &str, script: Script) {
        self.state
            .lock()
            .await
            .scripts
            .insert(query.to_string(), script);
    }

    /// Hold the response for `query` for `delay` before answering.
    pub async fn delay(&self, query: &str, delay: Duration) {
        self.state
            .lock()
            .await
            .delays
            .insert(query.to_string(), delay);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handler
// ---------------------------------------------------------------------------

async fn search(
    Path(site): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<Mutex<CatalogState>>>,
) -> impl IntoResponse {
    let query = params.get("q").cloned().unwrap_or_default();
    let (script, delay) = {
        let mut state = state.lock().await;
        state.requests.push(RecordedRequest { site, params });
        (
            state.scripts.get(&query).cloned(),
            state.delays.get(&query).copied(),
        )
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match script {
        Some(Script::Ok(titles)) => {
            let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
            (StatusCode::OK, search_body(&titles))
        }
        Some(Script::Status(code)) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            String::new(),
        ),
        Some(Script::Raw(body)) => (StatusCode::OK, body),
        None => (StatusCode::OK, search_body(&[])),
    }
}
