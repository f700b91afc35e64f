//! One-shot search without a terminal UI.
//!
//! [`run_once`] sets the query a single time and waits on the pipeline's
//! event feed until that query produces results, fails, gets cancelled or is
//! rejected by the length filter.

use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use typeahead_core::{PipelineEvent, SearchError, SearchViewModel};

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error("query {query:?} is too short to search")]
    Filtered { query: String },
    #[error("search failed: {0}")]
    Search(#[from] SearchError),
    #[error("no result within {0:?}")]
    TimedOut(Duration),
    #[error("search was cancelled")]
    Cancelled,
    #[error("search pipeline stopped")]
    Stopped,
}

/// Search for `query` once and return the published results.
pub async fn run_once(
    view_model: &SearchViewModel,
    query: &str,
    deadline: Duration,
) -> Result<Vec<String>, HeadlessError> {
    let mut events = view_model.subscribe_events();
    view_model.set_query(query);

    let outcome = tokio::time::timeout(deadline, async {
        loop {
            match events.recv().await {
                Ok(PipelineEvent::Filtered { query }) => {
                    return Err(HeadlessError::Filtered { query })
                }
                Ok(PipelineEvent::Succeeded { .. }) => return Ok(view_model.results()),
                Ok(PipelineEvent::Failed { error, .. }) => return Err(error.into()),
                Ok(PipelineEvent::Cancelled { .. }) => return Err(HeadlessError::Cancelled),
                Ok(event) => tracing::debug!(?event, "headless: waiting"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "headless: event feed lagged")
                }
                Err(RecvError::Closed) => return Err(HeadlessError::Stopped),
            }
        }
    })
    .await;

    outcome.unwrap_or(Err(HeadlessError::TimedOut(deadline)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use typeahead_core::{EchoClient, PipelineSettings, SearchClient, SearchFuture, TokioScheduler};

    struct SilentClient;

    impl SearchClient for SilentClient {
        fn search(&self, _query: &str) -> SearchFuture {
            Box::pin(std::future::pending())
        }
    }

    fn echo_view_model() -> SearchViewModel {
        SearchViewModel::new(
            Arc::new(EchoClient),
            Arc::new(TokioScheduler::current()),
            PipelineSettings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn returns_results_for_long_query() {
        let vm = echo_view_model();
        let results = run_once(&vm, "porsche", Duration::from_secs(5)).await.unwrap();
        assert_eq!(results, vec!["porsche".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_is_reported() {
        let vm = echo_view_model();
        let err = run_once(&vm, "po", Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, HeadlessError::Filtered { query } if query == "po"));
    }

    #[tokio::test(start_paused = true)]
    async fn never_answering_client_times_out() {
        let vm = SearchViewModel::new(
            Arc::new(SilentClient),
            Arc::new(TokioScheduler::current()),
            PipelineSettings::default(),
        );
        let err = run_once(&vm, "porsche", Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, HeadlessError::TimedOut(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn external_cancel_is_reported() {
        let vm = SearchViewModel::new(
            Arc::new(SilentClient),
            Arc::new(TokioScheduler::current()),
            PipelineSettings::default(),
        );
        let cancel = async {
            tokio::time::sleep(Duration::from_millis(301)).await;
            vm.registry().cancel(&typeahead_core::SearchOperation)
        };
        let (outcome, cancelled) = tokio::join!(run_once(&vm, "porsche", Duration::from_secs(5)), cancel);
        assert_eq!(cancelled, 1);
        assert!(matches!(outcome, Err(HeadlessError::Cancelled)));
    }
}
