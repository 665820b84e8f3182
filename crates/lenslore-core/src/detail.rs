use lenslore_models::MovieDetail;
use lenslore_sources::{CatalogError, MovieCatalog};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

#[derive(Debug)]
pub struct DetailCompletion {
    generation: u64,
    id: String,
    outcome: Result<MovieDetail, CatalogError>,
}

/// Fetches the full record for the selected movie.
///
/// Failures are logged and otherwise ignored: the pane simply stays empty.
pub struct DetailLoader {
    catalog: Arc<dyn MovieCatalog>,
    current_id: Option<String>,
    detail: Option<MovieDetail>,
    loading: bool,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    completions: mpsc::UnboundedSender<DetailCompletion>,
}

impl DetailLoader {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> (Self, mpsc::UnboundedReceiver<DetailCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            catalog,
            current_id: None,
            detail: None,
            loading: false,
            generation: 0,
            in_flight: None,
            completions: tx,
        };
        (loader, rx)
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start fetching `id`, superseding whatever was loading before.
    pub fn load(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.supersede();
        self.current_id = Some(id.clone());
        self.loading = true;

        let catalog = Arc::clone(&self.catalog);
        let tx = self.completions.clone();
        let generation = self.generation;
        debug!(id = %id, generation, "Fetching movie detail");
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = catalog.movie(&id).await;
            let _ = tx.send(DetailCompletion { generation, id, outcome });
        }));
    }

    /// Forget the open movie (detail view closed).
    pub fn reset(&mut self) {
        self.supersede();
        self.current_id = None;
    }

    pub fn apply(&mut self, completion: DetailCompletion) -> bool {
        if completion.generation != self.generation {
            debug!(id = %completion.id, "Discarding superseded movie detail");
            return false;
        }

        self.in_flight = None;
        self.loading = false;
        match completion.outcome {
            Ok(detail) => self.detail = Some(detail),
            Err(e) => error!(id = %completion.id, error = %e, "Failed to load movie detail"),
        }
        true
    }

    fn supersede(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.generation += 1;
        self.detail = None;
        self.loading = false;
    }
}

impl Drop for DetailLoader {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
