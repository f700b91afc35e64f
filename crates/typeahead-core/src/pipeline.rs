//! Query pipeline: turns keystrokes into at most one live search.
//!
//! # Stages
//!
//! ```text
//! keystroke ─► filter ─► debounce ─► dedupe ─► cancel-and-replace ─► dispatch
//!                                                                       │
//!         results / in-flight ◄── apply (tracked op only) ◄── completion ┘
//! ```
//!
//! - **filter** drops queries shorter than `min_query_len` grapheme clusters. A
//!   dropped query does not touch the debounce timer or the in-flight flag.
//! - **debounce** holds the latest qualifying query and restarts the timer on
//!   every new one. Only a query that survives a full quiet window moves on.
//! - **dedupe** compares against the previously dispatched query only, so
//!   `"abc", "abd", "abc"` dispatches three times.
//! - **cancel-and-replace** raises the in-flight flag, then files the new
//!   search under [`SearchOperation`] in the registry, which cancels whatever
//!   was filed there before.
//! - **dispatch** runs the search on the [`Scheduler`]. Its completion is sent
//!   back to the driver task, which is the only writer of the observable
//!   fields.
//!
//! Debounce and cancellation are independent. Debounce stops intermediate
//! keystrokes from ever being sent; cancellation stops a search that was
//! already sent from delivering after a newer one started. A completion that
//! was queued just before its operation got superseded is still discarded,
//! because the driver only applies completions whose [`HandleId`] matches the
//! tracked operation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{broadcast, mpsc, watch};
use unicode_segmentation::UnicodeSegmentation;

use crate::client::SearchClient;
use crate::error::SearchError;
use crate::registry::{CancellationRegistry, HandleId, Outcome};
use crate::scheduler::Scheduler;

const EVENT_CAPACITY: usize = 256;

/// Tuning knobs for the pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 3,
        }
    }
}

/// Registry key shared by every search the pipeline dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchOperation;

/// Diagnostic trace of pipeline transitions, broadcast to subscribers.
///
/// Nothing here feeds back into the observable fields; it exists for logging
/// front ends and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Query too short; dropped before the debounce stage.
    Filtered { query: String },
    /// Debounce window elapsed but the query equals the last dispatched one.
    Deduplicated { query: String },
    /// A tracked search was cancelled because a newer one is starting.
    Superseded { id: HandleId },
    Dispatched { id: HandleId, query: String },
    Succeeded { id: HandleId, results: usize },
    Failed { id: HandleId, error: SearchError },
    /// The tracked search was cancelled through the registry before it
    /// completed.
    Cancelled { id: HandleId },
    /// A completion arrived for an operation that is no longer tracked.
    Discarded { id: HandleId },
}

struct Completion {
    id: HandleId,
    query: String,
    outcome: Outcome<Result<Vec<String>, SearchError>>,
}

/// Write side of the observable fields, owned by the driver.
pub(crate) struct Outputs {
    pub(crate) results: watch::Sender<Vec<String>>,
    pub(crate) in_flight: watch::Sender<bool>,
    pub(crate) events: broadcast::Sender<PipelineEvent>,
}

/// The assembled pipeline, ready to be driven.
pub struct QueryPipeline {
    settings: PipelineSettings,
    client: Arc<dyn SearchClient>,
    scheduler: Arc<dyn Scheduler>,
    registry: CancellationRegistry<SearchOperation>,
}

impl QueryPipeline {
    pub fn new(
        client: Arc<dyn SearchClient>,
        scheduler: Arc<dyn Scheduler>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            settings,
            client,
            scheduler,
            registry: CancellationRegistry::new(),
        }
    }

    /// Use an existing registry instead of a fresh one.
    pub fn with_registry(mut self, registry: CancellationRegistry<SearchOperation>) -> Self {
        self.registry = registry;
        self
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    pub fn registry(&self) -> &CancellationRegistry<SearchOperation> {
        &self.registry
    }

    pub(crate) fn event_channel() -> broadcast::Sender<PipelineEvent> {
        broadcast::channel(EVENT_CAPACITY).0
    }

    /// Drive the pipeline until `keystrokes` closes.
    pub(crate) fn run(
        self,
        keystrokes: mpsc::UnboundedReceiver<String>,
        outputs: Outputs,
    ) -> impl Future<Output = ()> + Send {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let driver = Driver {
            settings: self.settings,
            client: self.client,
            scheduler: self.scheduler,
            registry: self.registry,
            outputs,
            pending: None,
            timer: None,
            last_dispatched: None,
            tracked: None,
            completions_tx,
        };
        driver.run(keystrokes, completions_rx)
    }
}

struct Driver {
    settings: PipelineSettings,
    client: Arc<dyn SearchClient>,
    scheduler: Arc<dyn Scheduler>,
    registry: CancellationRegistry<SearchOperation>,
    outputs: Outputs,
    /// Latest qualifying query waiting out the debounce window.
    pending: Option<String>,
    timer: Option<BoxFuture<'static, ()>>,
    last_dispatched: Option<String>,
    tracked: Option<HandleId>,
    completions_tx: mpsc::UnboundedSender<Completion>,
}

impl Driver {
    async fn run(
        mut self,
        mut keystrokes: mpsc::UnboundedReceiver<String>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        tracing::debug!(settings = ?self.settings, "pipeline: started");
        loop {
            tokio::select! {
                biased;
                Some(done) = completions.recv() => self.on_completion(done),
                query = keystrokes.recv() => match query {
                    Some(query) => self.on_query(query),
                    None => break,
                },
                () = elapsed(&mut self.timer) => self.on_debounce_elapsed(),
            }
        }
        self.shutdown();
    }

    fn on_query(&mut self, query: String) {
        if query.graphemes(true).count() < self.settings.min_query_len {
            tracing::trace!(%query, "pipeline: filtered");
            self.emit(PipelineEvent::Filtered { query });
            return;
        }
        tracing::trace!(%query, "pipeline: pending");
        self.pending = Some(query);
        self.timer = Some(self.scheduler.sleep(self.settings.debounce));
    }

    fn on_debounce_elapsed(&mut self) {
        self.timer = None;
        let Some(query) = self.pending.take() else {
            return;
        };
        if self.last_dispatched.as_deref() == Some(query.as_str()) {
            tracing::trace!(%query, "pipeline: duplicate of last dispatch");
            self.emit(PipelineEvent::Deduplicated { query });
            return;
        }
        self.last_dispatched = Some(query.clone());
        self.dispatch(query);
    }

    fn dispatch(&mut self, query: String) {
        self.set_in_flight(true);

        if let Some(previous) = self.tracked.take() {
            self.emit(PipelineEvent::Superseded { id: previous });
        }
        let registration = self.registry.begin(SearchOperation);
        let id = registration.id();
        self.tracked = Some(id);
        tracing::debug!(%id, %query, "pipeline: dispatching search");
        self.emit(PipelineEvent::Dispatched { id, query: query.clone() });

        let search = self.client.search(&query);
        let completions = self.completions_tx.clone();
        self.scheduler.spawn(
            async move {
                let outcome = registration.run(search).await;
                // The driver may already be gone after shutdown.
                let _ = completions.send(Completion { id, query, outcome });
            }
            .boxed(),
        );
    }

    fn on_completion(&mut self, done: Completion) {
        if self.tracked != Some(done.id) {
            match done.outcome {
                Outcome::Cancelled => {
                    tracing::trace!(id = %done.id, query = %done.query, "pipeline: superseded search cancelled");
                }
                Outcome::Completed(_) => {
                    tracing::debug!(id = %done.id, query = %done.query, "pipeline: discarding superseded result");
                    self.emit(PipelineEvent::Discarded { id: done.id });
                }
            }
            return;
        }
        self.tracked = None;

        match done.outcome {
            Outcome::Cancelled => {
                tracing::debug!(id = %done.id, query = %done.query, "pipeline: tracked search cancelled");
                self.emit(PipelineEvent::Cancelled { id: done.id });
            }
            Outcome::Completed(Ok(results)) => {
                tracing::debug!(id = %done.id, query = %done.query, count = results.len(), "pipeline: results");
                let count = results.len();
                self.outputs.results.send_replace(results);
                self.emit(PipelineEvent::Succeeded { id: done.id, results: count });
            }
            Outcome::Completed(Err(error)) => {
                tracing::warn!(id = %done.id, query = %done.query, %error, "pipeline: search failed");
                self.emit(PipelineEvent::Failed { id: done.id, error });
            }
        }
        self.set_in_flight(false);
    }

    fn shutdown(&mut self) {
        self.timer = None;
        self.pending = None;
        if self.tracked.take().is_some() {
            self.registry.cancel(&SearchOperation);
        }
        self.set_in_flight(false);
        tracing::debug!("pipeline: stopped");
    }

    fn set_in_flight(&self, value: bool) {
        self.outputs.in_flight.send_if_modified(|flag| {
            let changed = *flag != value;
            *flag = value;
            changed
        });
    }

    fn emit(&self, event: PipelineEvent) {
        // No subscribers is the normal case outside tests.
        let _ = self.outputs.events.send(event);
    }
}

/// Resolve when the debounce timer fires; never resolve while none is armed.
async fn elapsed(timer: &mut Option<BoxFuture<'static, ()>>) {
    match timer {
        Some(timer) => timer.await,
        None => std::future::pending().await,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::EchoClient;
    use crate::scheduler::TokioScheduler;
    use crate::view_model::SearchViewModel;
    use rstest::rstest;

    fn echo_view_model() -> SearchViewModel {
        SearchViewModel::new(
            Arc::new(EchoClient),
            Arc::new(TokioScheduler::current()),
            PipelineSettings::default(),
        )
    }

    #[rstest]
    #[case::ascii_too_short("po", false)]
    #[case::ascii_minimum("por", true)]
    #[case::multibyte_too_short("ñá", false)]
    #[case::multibyte_minimum("ñañ", true)]
    #[case::combining_mark_too_short("e\u{301}a", false)]
    #[case::combining_mark_minimum("e\u{301}ab", true)]
    #[tokio::test(start_paused = true)]
    async fn filter_counts_grapheme_clusters(#[case] query: &str, #[case] dispatched: bool) {
        let vm = echo_view_model();
        vm.set_query(query);
        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(vm.results() == vec![query.to_string()], dispatched);
    }

    #[tokio::test(start_paused = true)]
    async fn dedupe_only_looks_at_previous_dispatch() {
        let vm = echo_view_model();
        let mut events = vm.subscribe_events();

        for query in ["abc", "abd", "abc", "abc"] {
            vm.set_query(query);
            tokio::time::sleep(Duration::from_millis(301)).await;
        }

        let mut dispatched = Vec::new();
        let mut deduplicated = Vec::new();
        while let Ok(event) = events.try_recv() {
            match event {
                PipelineEvent::Dispatched { query, .. } => dispatched.push(query),
                PipelineEvent::Deduplicated { query } => deduplicated.push(query),
                _ => {}
            }
        }
        assert_eq!(dispatched, vec!["abc", "abd", "abc"]);
        assert_eq!(deduplicated, vec!["abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn filtered_query_does_not_restart_debounce() {
        let vm = echo_view_model();
        vm.set_query("por");
        tokio::time::sleep(Duration::from_millis(200)).await;
        vm.set_query("po");
        tokio::time::sleep(Duration::from_millis(101)).await;
        // "por" survived its own quiet window; "po" never reached the timer.
        assert_eq!(vm.results(), vec!["por".to_string()]);
    }

    #[tokio::test]
    async fn elapsed_without_timer_stays_pending() {
        let mut timer = None;
        let fired = tokio::time::timeout(Duration::from_millis(5), elapsed(&mut timer)).await;
        assert!(fired.is_err());
    }
}
