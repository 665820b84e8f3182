//! Search-as-you-type against a [`MovieCatalog`].
//!
//! Every query change supersedes the previous request: its task is aborted
//! and the generation counter moves on, so a response that was already on
//! its way is recognised as stale in [`SearchController::apply`] and dropped.
//! Responses come back as [`SearchCompletion`] values over a channel and are
//! applied by whoever owns the event loop, which keeps all state changes on
//! one task.

use lenslore_models::SearchResult;
use lenslore_sources::{CatalogError, MovieCatalog};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Invoked with the new query text once per query change, before any fetch.
pub type QueryCallback = Box<dyn FnMut(&str) + Send>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub text: String,
    pub loading: bool,
    pub error: Option<String>,
}

/// Outcome of one search request, tagged with the generation that issued it.
#[derive(Debug)]
pub struct SearchCompletion {
    generation: u64,
    query: String,
    outcome: Result<Vec<SearchResult>, CatalogError>,
}

pub struct SearchController {
    catalog: Arc<dyn MovieCatalog>,
    min_query_chars: usize,
    state: QueryState,
    results: Vec<SearchResult>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    completions: mpsc::UnboundedSender<SearchCompletion>,
    on_query_change: Option<QueryCallback>,
}

impl SearchController {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        min_query_chars: usize,
    ) -> (Self, mpsc::UnboundedReceiver<SearchCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            catalog,
            min_query_chars,
            state: QueryState::default(),
            results: Vec::new(),
            generation: 0,
            in_flight: None,
            completions: tx,
            on_query_change: None,
        };
        (controller, rx)
    }

    pub fn with_query_callback(mut self, callback: QueryCallback) -> Self {
        self.on_query_change = Some(callback);
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.text
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Replace the query. Must be called from within a tokio runtime.
    ///
    /// Setting the text it already holds changes nothing.
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.state.text {
            return;
        }
        self.state.text = text;

        if let Some(callback) = self.on_query_change.as_mut() {
            callback(&self.state.text);
        }

        self.cancel_in_flight();

        let query = self.state.text.trim().to_string();
        if query.chars().count() < self.min_query_chars {
            self.results.clear();
            self.state.error = None;
            self.state.loading = false;
            return;
        }

        self.state.loading = true;
        self.state.error = None;

        let catalog = Arc::clone(&self.catalog);
        let tx = self.completions.clone();
        let generation = self.generation;
        debug!(query = %query, generation, "Starting catalog search");
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = catalog.search(&query).await;
            // A closed channel means the session is gone; nothing left to tell
            let _ = tx.send(SearchCompletion { generation, query, outcome });
        }));
    }

    /// Empty the query, as the search box does when it is refocused.
    pub fn clear(&mut self) {
        self.set_query(String::new());
    }

    /// Commit a completion if it belongs to the current query. Returns
    /// whether state changed.
    pub fn apply(&mut self, completion: SearchCompletion) -> bool {
        if completion.generation != self.generation {
            debug!(
                query = %completion.query,
                generation = completion.generation,
                current = self.generation,
                "Discarding superseded search result"
            );
            return false;
        }

        self.in_flight = None;
        self.state.loading = false;
        match completion.outcome {
            Ok(results) => {
                debug!(query = %completion.query, count = results.len(), "Search completed");
                self.results = results;
                self.state.error = None;
            }
            Err(e) => {
                warn!(query = %completion.query, error = %e, "Search failed");
                self.results.clear();
                self.state.error = Some(e.user_message().to_string());
            }
        }
        true
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            debug!(generation = self.generation, "Cancelled in-flight search");
        }
        self.generation += 1;
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
