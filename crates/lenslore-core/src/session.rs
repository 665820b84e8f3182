use crate::detail::{DetailCompletion, DetailLoader};
use crate::search::{QueryCallback, SearchCompletion, SearchController};
use crate::view::{ViewError, ViewState};
use crate::watchlist::{WatchlistError, WatchlistStore};
use lenslore_config::Config;
use lenslore_models::{MovieDetail, UserRating, WatchedEntry};
use lenslore_sources::MovieCatalog;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub min_query_chars: usize,
    pub narrow_breakpoint: u16,
    pub viewport_width: u16,
}

impl SessionSettings {
    pub fn from_config(config: &Config, viewport_width: u16) -> Self {
        Self {
            min_query_chars: config.search.min_query_chars,
            narrow_breakpoint: config.layout.narrow_breakpoint,
            viewport_width,
        }
    }
}

/// Receiving ends for network completions; the event loop polls these and
/// hands each value back to [`Session::apply_search`] or
/// [`Session::apply_detail`].
pub struct SessionChannels {
    pub search: mpsc::UnboundedReceiver<SearchCompletion>,
    pub detail: mpsc::UnboundedReceiver<DetailCompletion>,
}

/// One running search-and-select session: query, selection, open movie and
/// the watched list, wired the way the screen uses them.
pub struct Session {
    search: SearchController,
    detail: DetailLoader,
    view: ViewState,
    watchlist: WatchlistStore,
}

impl Session {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        watchlist: WatchlistStore,
        settings: SessionSettings,
        on_query_change: Option<QueryCallback>,
    ) -> (Self, SessionChannels) {
        let (search, search_rx) = SearchController::new(Arc::clone(&catalog), settings.min_query_chars);
        let search = match on_query_change {
            Some(callback) => search.with_query_callback(callback),
            None => search,
        };
        let catalog_name = catalog.catalog_name().to_string();
        let (detail, detail_rx) = DetailLoader::new(catalog);
        let view = ViewState::new(settings.viewport_width, settings.narrow_breakpoint);

        info!(
            catalog = %catalog_name,
            watched = watchlist.len(),
            layout = ?view.layout(),
            "Session started"
        );

        let session = Self { search, detail, view, watchlist };
        let channels = SessionChannels {
            search: search_rx,
            detail: detail_rx,
        };
        (session, channels)
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn watchlist(&self) -> &WatchlistStore {
        &self.watchlist
    }

    /// The loaded record for the open movie, if it has arrived.
    pub fn open_detail(&self) -> Option<&MovieDetail> {
        let selected = self.view.selected_id()?;
        self.detail.detail().filter(|d| d.id == selected)
    }

    pub fn is_detail_loading(&self) -> bool {
        self.view.is_detail_open() && self.detail.is_loading()
    }

    pub fn type_query(&mut self, text: impl Into<String>) {
        self.search.set_query(text);
    }

    pub fn clear_query(&mut self) {
        self.search.clear();
    }

    /// Toggle-select `id`; opening starts a detail fetch, closing drops it.
    pub fn select(&mut self, id: &str) {
        if self.view.select(id) {
            self.detail.load(id);
        } else {
            self.detail.reset();
        }
    }

    /// Select the result at zero-based `index` of the current list.
    pub fn select_result(&mut self, index: usize) -> Option<String> {
        let id = self.search.results().get(index)?.id.clone();
        self.select(&id);
        Some(id)
    }

    pub fn close_detail(&mut self) {
        self.view.close_detail();
        self.detail.reset();
    }

    pub fn rate(&mut self, rating: UserRating) {
        self.view.set_rating(rating);
    }

    pub fn confirm_add(&mut self) -> Result<WatchedEntry, ViewError> {
        let detail = self
            .view
            .selected_id()
            .and_then(|id| self.detail.detail().filter(|d| d.id == id))
            .cloned();
        let entry = self.view.confirm_add(detail.as_ref(), &mut self.watchlist)?;
        self.detail.reset();
        info!(id = %entry.id, rating = entry.user_rating, "Added to watched list");
        Ok(entry)
    }

    pub fn delete_watched(&mut self, id: &str) -> Result<(), WatchlistError> {
        self.watchlist.delete(id)
    }

    pub fn toggle_results_panel(&mut self) {
        self.view.toggle_results_panel();
    }

    pub fn toggle_watched_panel(&mut self) {
        self.view.toggle_watched_panel();
    }

    pub fn toggle_active(&mut self) {
        self.view.toggle_active();
    }

    pub fn set_viewport_width(&mut self, width: u16) {
        self.view.set_viewport_width(width);
    }

    pub fn apply_search(&mut self, completion: SearchCompletion) -> bool {
        self.search.apply(completion)
    }

    pub fn apply_detail(&mut self, completion: DetailCompletion) -> bool {
        self.detail.apply(completion)
    }

    pub fn window_title(&self) -> String {
        self.view.window_title(self.open_detail())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::{matrix_detail, matrix_results, Scripted, ScriptedCatalog};
    use std::time::Duration;

    fn settings() -> SessionSettings {
        SessionSettings {
            min_query_chars: 3,
            narrow_breakpoint: 80,
            viewport_width: 120,
        }
    }

    fn start(catalog: ScriptedCatalog) -> (Session, SessionChannels, Arc<ScriptedCatalog>) {
        let catalog = Arc::new(catalog);
        let watchlist = WatchlistStore::open(Box::new(MemoryStore::new()), "watched");
        let (session, channels) = Session::new(catalog.clone(), watchlist, settings(), None);
        (session, channels, catalog)
    }

    async fn pump_search(session: &mut Session, channels: &mut SessionChannels) {
        let completion = tokio::time::timeout(Duration::from_secs(2), channels.search.recv())
            .await
            .unwrap()
            .unwrap();
        session.apply_search(completion);
    }

    async fn pump_detail(session: &mut Session, channels: &mut SessionChannels) {
        let completion = tokio::time::timeout(Duration::from_secs(2), channels.detail.recv())
            .await
            .unwrap()
            .unwrap();
        session.apply_detail(completion);
    }

    #[tokio::test]
    async fn test_search_select_rate_add_flow() {
        let (mut session, mut channels, _) = start(
            ScriptedCatalog::new()
                .with_search("The Matrix", Scripted::Ok(matrix_results()))
                .with_movie(matrix_detail()),
        );

        session.type_query("The Matrix");
        pump_search(&mut session, &mut channels).await;
        assert_eq!(session.search().results().len(), 3);

        assert_eq!(session.select_result(0).as_deref(), Some("tt0133093"));
        assert!(session.is_detail_loading());
        pump_detail(&mut session, &mut channels).await;
        assert_eq!(session.window_title(), "Movie | The Matrix");

        session.rate(UserRating::new(10).unwrap());
        let entry = session.confirm_add().unwrap();
        assert_eq!(entry.rating_revision_count, 1);
        assert!(!session.view().is_detail_open());
        assert!(session.open_detail().is_none());
        assert_eq!(session.window_title(), "Lenslore");
        assert_eq!(session.watchlist().summary().count, 1);

        session.delete_watched("tt0133093").unwrap();
        assert!(session.watchlist().is_empty());
    }

    #[tokio::test]
    async fn test_select_twice_closes_and_drops_detail() {
        let (mut session, mut channels, catalog) = start(ScriptedCatalog::new().with_movie(matrix_detail()));

        session.select("tt0133093");
        pump_detail(&mut session, &mut channels).await;
        assert!(session.open_detail().is_some());

        session.select("tt0133093");
        assert!(!session.view().is_detail_open());
        assert!(session.open_detail().is_none());
        assert_eq!(catalog.movie_calls(), 1);
    }

    #[tokio::test]
    async fn test_add_before_detail_arrives_fails() {
        let (mut session, _channels, _) = start(
            ScriptedCatalog::new().with_delayed_movie("tt0133093", Scripted::Ok(matrix_detail()), Duration::from_millis(200)),
        );

        session.select("tt0133093");
        session.rate(UserRating::new(6).unwrap());
        assert!(matches!(session.confirm_add(), Err(ViewError::DetailNotLoaded(_))));
        assert!(session.view().is_detail_open());
    }

    #[tokio::test]
    async fn test_select_out_of_range() {
        let (mut session, _channels, _) = start(ScriptedCatalog::new());
        assert_eq!(session.select_result(3), None);
        assert!(!session.view().is_detail_open());
    }

    #[tokio::test]
    async fn test_failed_detail_fetch_stops_loading() {
        let (mut session, mut channels, _) =
            start(ScriptedCatalog::new().with_delayed_movie("tt404", Scripted::Status(500), Duration::ZERO));

        session.select("tt404");
        assert!(session.is_detail_loading());
        pump_detail(&mut session, &mut channels).await;

        assert!(session.view().is_detail_open());
        assert!(!session.is_detail_loading());
        assert!(session.open_detail().is_none());
        assert!(session.search().error().is_none());
    }
}
