use crate::watchlist::{WatchlistError, WatchlistStore};
use lenslore_models::{MovieDetail, UserRating, WatchedEntry};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_WINDOW_TITLE: &str = "Lenslore";

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("no movie is open")]
    NoMovieOpen,
    #[error("details for {0} have not loaded yet")]
    DetailNotLoaded(String),
    #[error("rate the movie before adding it to the list")]
    NotRated,
    #[error(transparent)]
    Watchlist(#[from] WatchlistError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Results and the watched panel side by side.
    Wide,
    /// One shared panel; `active` picks what it shows.
    Narrow,
}

impl LayoutMode {
    pub fn for_width(width: u16, narrow_breakpoint: u16) -> Self {
        if width <= narrow_breakpoint {
            LayoutMode::Narrow
        } else {
            LayoutMode::Wide
        }
    }
}

/// State that lives exactly as long as one movie stays open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSession {
    movie_id: String,
    rating: Option<UserRating>,
    rating_revision_count: u32,
}

impl DetailSession {
    fn new(movie_id: String) -> Self {
        Self {
            movie_id,
            rating: None,
            rating_revision_count: 0,
        }
    }

    pub fn movie_id(&self) -> &str {
        &self.movie_id
    }

    pub fn rating(&self) -> Option<UserRating> {
        self.rating
    }

    pub fn rating_revision_count(&self) -> u32 {
        self.rating_revision_count
    }
}

/// Open/closed state of the two boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxPanels {
    pub results_open: bool,
    pub watched_open: bool,
}

impl Default for BoxPanels {
    fn default() -> Self {
        Self {
            results_open: true,
            watched_open: true,
        }
    }
}

/// Selection and panel state. Holds no movie data of its own.
#[derive(Debug, Clone)]
pub struct ViewState {
    session: Option<DetailSession>,
    panels: BoxPanels,
    active: bool,
    layout: LayoutMode,
    narrow_breakpoint: u16,
}

impl ViewState {
    pub fn new(viewport_width: u16, narrow_breakpoint: u16) -> Self {
        Self {
            session: None,
            panels: BoxPanels::default(),
            active: false,
            layout: LayoutMode::for_width(viewport_width, narrow_breakpoint),
            narrow_breakpoint,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.movie_id.as_str())
    }

    pub fn detail_session(&self) -> Option<&DetailSession> {
        self.session.as_ref()
    }

    pub fn is_detail_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn panels(&self) -> BoxPanels {
        self.panels
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Open `id`, or close it when it is already the open movie.
    /// Returns true when a movie was opened.
    pub fn select(&mut self, id: &str) -> bool {
        if self.selected_id() == Some(id) {
            debug!(id = %id, "Selecting the open movie closes it");
            self.close_detail();
            return false;
        }
        debug!(id = %id, "Opening movie");
        self.session = Some(DetailSession::new(id.to_string()));
        true
    }

    pub fn close_detail(&mut self) {
        self.session = None;
        if self.layout == LayoutMode::Narrow {
            self.active = false;
        }
    }

    /// Record a star rating for the open movie. Picking the rating that is
    /// already set is not a revision. Ignored when nothing is open.
    pub fn set_rating(&mut self, rating: UserRating) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.rating != Some(rating) {
            session.rating = Some(rating);
            session.rating_revision_count += 1;
        }
    }

    /// Turn the open, rated movie into a watched entry, store it and close
    /// the detail view.
    pub fn confirm_add(
        &mut self,
        detail: Option<&MovieDetail>,
        watchlist: &mut WatchlistStore,
    ) -> Result<WatchedEntry, ViewError> {
        let session = self.session.as_ref().ok_or(ViewError::NoMovieOpen)?;
        let detail = detail
            .filter(|d| d.id == session.movie_id)
            .ok_or_else(|| ViewError::DetailNotLoaded(session.movie_id.clone()))?;
        let rating = session.rating.ok_or(ViewError::NotRated)?;

        let entry = WatchedEntry::from_detail(detail, rating, session.rating_revision_count);
        watchlist.add(entry.clone())?;
        self.close_detail();
        Ok(entry)
    }

    pub fn toggle_results_panel(&mut self) {
        self.panels.results_open = !self.panels.results_open;
    }

    pub fn toggle_watched_panel(&mut self) {
        self.panels.watched_open = !self.panels.watched_open;
    }

    /// Swap between results and the watched list in the narrow layout.
    pub fn toggle_active(&mut self) {
        self.active = !self.active;
    }

    pub fn set_viewport_width(&mut self, width: u16) {
        let layout = LayoutMode::for_width(width, self.narrow_breakpoint);
        if layout != self.layout {
            debug!(width, ?layout, "Layout changed");
            self.layout = layout;
        }
    }

    pub fn window_title(&self, detail: Option<&MovieDetail>) -> String {
        match (self.selected_id(), detail) {
            (Some(id), Some(detail)) if detail.id == id && !detail.title.is_empty() => {
                format!("Movie | {}", detail.title)
            }
            _ => DEFAULT_WINDOW_TITLE.to_string(),
        }
    }
}
