//! Search view-model: the three observable fields a front end binds to.
//!
//! | Field | Access | Backing |
//! |-------|--------|---------|
//! | `query` | read-write | [`watch`] + keystroke channel |
//! | `results` | read-only | [`watch`] written by the pipeline driver |
//! | `is_request_in_flight` | read-only | [`watch`] written by the pipeline driver |
//!
//! Every [`SearchViewModel::set_query`] call is delivered to the pipeline in
//! order; nothing is coalesced between keystrokes. Dropping the view-model
//! (or calling [`SearchViewModel::shutdown`]) stops the driver and cancels
//! any search it was tracking.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use crate::client::SearchClient;
use crate::pipeline::{Outputs, PipelineEvent, PipelineSettings, QueryPipeline, SearchOperation};
use crate::registry::CancellationRegistry;
use crate::scheduler::Scheduler;

pub struct SearchViewModel {
    query: watch::Sender<String>,
    keystrokes: mpsc::UnboundedSender<String>,
    results: watch::Receiver<Vec<String>>,
    in_flight: watch::Receiver<bool>,
    events: broadcast::Sender<PipelineEvent>,
    registry: CancellationRegistry<SearchOperation>,
    driver: JoinHandle<()>,
}

impl SearchViewModel {
    /// Build a pipeline around `client` and start driving it on the current
    /// tokio runtime.
    pub fn new(
        client: Arc<dyn SearchClient>,
        scheduler: Arc<dyn Scheduler>,
        settings: PipelineSettings,
    ) -> Self {
        Self::from_pipeline(QueryPipeline::new(client, scheduler, settings))
    }

    pub fn from_pipeline(pipeline: QueryPipeline) -> Self {
        let (query, _) = watch::channel(String::new());
        let (keystrokes, keystroke_rx) = mpsc::unbounded_channel();
        let (results_tx, results) = watch::channel(Vec::new());
        let (in_flight_tx, in_flight) = watch::channel(false);
        let events = QueryPipeline::event_channel();
        let registry = pipeline.registry().clone();

        let outputs = Outputs {
            results: results_tx,
            in_flight: in_flight_tx,
            events: events.clone(),
        };
        let driver = tokio::spawn(pipeline.run(keystroke_rx, outputs));

        Self {
            query,
            keystrokes,
            results,
            in_flight,
            events,
            registry,
            driver,
        }
    }

    /// Replace the query. Called on every keystroke.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.query.send_replace(query.clone());
        if self.keystrokes.send(query).is_err() {
            tracing::warn!("view-model: pipeline is not running; query ignored");
        }
    }

    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    pub fn subscribe_query(&self) -> watch::Receiver<String> {
        self.query.subscribe()
    }

    pub fn results(&self) -> Vec<String> {
        self.results.borrow().clone()
    }

    pub fn subscribe_results(&self) -> watch::Receiver<Vec<String>> {
        self.results.clone()
    }

    pub fn is_request_in_flight(&self) -> bool {
        *self.in_flight.borrow()
    }

    pub fn subscribe_in_flight(&self) -> watch::Receiver<bool> {
        self.in_flight.clone()
    }

    /// Diagnostic feed of pipeline transitions from this point on.
    pub fn subscribe_events(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    pub fn registry(&self) -> &CancellationRegistry<SearchOperation> {
        &self.registry
    }

    /// Stop the pipeline and wait for the driver to finish. Any tracked
    /// search is cancelled and the in-flight flag ends up `false`.
    pub async fn shutdown(self) {
        let Self { keystrokes, driver, .. } = self;
        drop(keystrokes);
        if let Err(err) = driver.await {
            tracing::warn!(%err, "view-model: pipeline driver ended abnormally");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
