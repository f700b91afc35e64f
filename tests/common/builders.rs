//! Test clients and view-model constructors.
//!
//! These are built for readable assertions, not for production use. They
//! panic on poisoned locks rather than returning `Result`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{broadcast, oneshot};
use typeahead_core::{
    ErrorKind, PipelineEvent, PipelineSettings, SearchClient, SearchError, SearchFuture,
    SearchViewModel, TokioScheduler,
};

pub type Reply = Result<Vec<String>, SearchError>;

/// View-model over `client` with the default 300 ms / 3 character settings.
pub fn view_model(client: Arc<dyn SearchClient>) -> SearchViewModel {
    SearchViewModel::new(
        client,
        Arc::new(TokioScheduler::current()),
        PipelineSettings::default(),
    )
}

/// Advance the paused clock by `ms`, letting every runnable task settle.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Shorthand for `vec!["a".to_string(), ...]`.
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn network_error(info: &str) -> SearchError {
    SearchError::new(ErrorKind::UnableToComplete, info)
}

// ---------------------------------------------------------------------------
// GateClient
// ---------------------------------------------------------------------------

/// Client whose searches stay pending until the test answers them.
#[derive(Default)]
pub struct GateClient {
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, oneshot::Sender<Reply>>>,
}

impl GateClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every query the pipeline dispatched, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Answer the outstanding search for `query`. Returns `false` when the
    /// search future is already gone, i.e. it was cancelled.
    pub fn answer(&self, query: &str, reply: Reply) -> bool {
        let gate = self.gates.lock().unwrap().remove(query);
        gate.is_some_and(|tx| tx.send(reply).is_ok())
    }

    /// Whether the search for `query` is still waiting on an answer.
    pub fn is_pending(&self, query: &str) -> bool {
        self.gates
            .lock()
            .unwrap()
            .get(query)
            .is_some_and(|tx| !tx.is_closed())
    }
}

impl SearchClient for GateClient {
    fn search(&self, query: &str) -> SearchFuture {
        self.calls.lock().unwrap().push(query.to_string());
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), tx);
        async move { rx.await.unwrap_or_else(|_| Err(network_error("gate dropped"))) }.boxed()
    }
}

// ---------------------------------------------------------------------------
// ScriptedClient
// ---------------------------------------------------------------------------

/// Client that answers each query with a scripted reply after a scripted
/// latency. Unscripted queries echo themselves immediately.
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<HashMap<String, (Duration, Reply)>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(self: &Arc<Self>, query: &str, latency_ms: u64, reply: Reply) -> Arc<Self> {
        self.script
            .lock()
            .unwrap()
            .insert(query.to_string(), (Duration::from_millis(latency_ms), reply));
        Arc::clone(self)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SearchClient for ScriptedClient {
    fn search(&self, query: &str) -> SearchFuture {
        self.calls.lock().unwrap().push(query.to_string());
        let (latency, reply) = self
            .script
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| (Duration::ZERO, Ok(vec![query.to_string()])));
        async move {
            tokio::time::sleep(latency).await;
            reply
        }
        .boxed()
    }
}

// ---------------------------------------------------------------------------
// Event helpers
// ---------------------------------------------------------------------------

/// Drain whatever the pipeline has broadcast so far.
pub fn drain(events: &mut broadcast::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
    std::iter::from_fn(|| events.try_recv().ok()).collect()
}

/// Queries of every `Dispatched` event, in order.
pub fn dispatched(events: &[PipelineEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Dispatched { query, .. } => Some(query.clone()),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JitterClient
// ---------------------------------------------------------------------------

/// Echo client whose n-th search takes `latencies[n % len]` milliseconds, so
/// responses routinely arrive out of dispatch order.
pub struct JitterClient {
    latencies: Vec<u64>,
    calls: Mutex<Vec<String>>,
}

impl JitterClient {
    pub fn new(latencies: Vec<u64>) -> Arc<Self> {
        assert!(!latencies.is_empty(), "JitterClient needs at least one latency");
        Arc::new(Self {
            latencies,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SearchClient for JitterClient {
    fn search(&self, query: &str) -> SearchFuture {
        let mut calls = self.calls.lock().unwrap();
        let latency = self.latencies[calls.len() % self.latencies.len()];
        calls.push(query.to_string());
        let reply = vec![query.to_string()];
        async move {
            tokio::time::sleep(Duration::from_millis(latency)).await;
            Ok(reply)
        }
        .boxed()
    }
}
