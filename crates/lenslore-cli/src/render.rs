//! Text rendering of a browse session.
//!
//! Both layouts go through [`Screen::render`]; [`LayoutMode`] only decides
//! which panes end up side by side.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use lenslore_core::{LayoutMode, QueryState, Session, ViewState};
use lenslore_models::{MovieDetail, SearchResult, WatchedEntry, WatchedSummary, MAX_USER_RATING};

const LOADING: &str = "Loading...";
const BACK_HINT: &str = "← back (:close)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Results,
    Detail,
    Watched,
}

/// Everything one frame needs, borrowed from the session.
pub struct Screen<'a> {
    pub title: String,
    pub query: &'a QueryState,
    pub results: &'a [SearchResult],
    pub view: &'a ViewState,
    pub detail: Option<&'a MovieDetail>,
    pub detail_loading: bool,
    pub watched: &'a [WatchedEntry],
    pub width: u16,
}

impl<'a> Screen<'a> {
    pub fn from_session(session: &'a Session, width: u16) -> Self {
        Self {
            title: session.window_title(),
            query: session.search().state(),
            results: session.search().results(),
            view: session.view(),
            detail: session.open_detail(),
            detail_loading: session.is_detail_loading(),
            watched: session.watchlist().entries(),
            width,
        }
    }

    /// Which panes are on screen, left to right.
    pub fn panes(&self) -> Vec<Pane> {
        let detail_open = self.view.is_detail_open();
        match self.view.layout() {
            LayoutMode::Wide => {
                let right = if detail_open { Pane::Detail } else { Pane::Watched };
                vec![Pane::Results, right]
            }
            LayoutMode::Narrow => {
                if detail_open {
                    vec![Pane::Detail]
                } else if self.query.loading || self.query.error.is_some() || !self.view.is_active() {
                    vec![Pane::Results]
                } else {
                    vec![Pane::Watched]
                }
            }
        }
    }

    pub fn render(&self) -> String {
        let panes = self.panes();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(self.width);
        table.set_header(panes.iter().map(|pane| {
            Cell::new(self.pane_heading(*pane))
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        }));
        table.add_row(panes.iter().map(|pane| Cell::new(self.pane_body(*pane))));

        format!("{}\n{}", self.header(), table)
    }

    fn header(&self) -> String {
        let search = if self.query.text.is_empty() {
            "Search movies...".to_string()
        } else {
            self.query.text.clone()
        };
        format!(
            "🔍 {}\n> {}    Found {} results",
            self.title,
            search,
            self.results.len()
        )
    }

    fn pane_heading(&self, pane: Pane) -> String {
        let open = self.is_open(pane);
        let toggle = match pane {
            Pane::Results => ":results",
            Pane::Detail | Pane::Watched => ":watched",
        };
        let marker = if open { "–" } else { "+" };
        let name = match pane {
            Pane::Results => "Results",
            Pane::Detail => "Movie",
            Pane::Watched => "Watched",
        };
        format!("{} {} ({})", marker, name, toggle)
    }

    fn is_open(&self, pane: Pane) -> bool {
        let panels = self.view.panels();
        match pane {
            Pane::Results => panels.results_open,
            Pane::Detail | Pane::Watched => panels.watched_open,
        }
    }

    fn pane_body(&self, pane: Pane) -> String {
        if !self.is_open(pane) {
            return String::new();
        }
        let narrow = self.view.layout() == LayoutMode::Narrow;
        match pane {
            Pane::Results => {
                let body = results_body(self.query, self.results);
                if narrow && !self.query.loading && self.query.error.is_none() {
                    format!("→ watched list (:swap)\n{}", body)
                } else {
                    body
                }
            }
            Pane::Watched => {
                let body = watched_body(self.watched);
                if narrow {
                    format!("← results (:swap)\n{}", body)
                } else {
                    body
                }
            }
            Pane::Detail => match self.detail {
                Some(detail) => detail_body(detail, self.view, self.watched),
                None if self.detail_loading => LOADING.to_string(),
                // Fetch failed; the error is logged, the pane only offers the way back
                None => BACK_HINT.to_string(),
            },
        }
    }
}

pub fn results_body(query: &QueryState, results: &[SearchResult]) -> String {
    if query.loading {
        return LOADING.to_string();
    }
    if let Some(error) = &query.error {
        return format!("{} 😓", error);
    }
    results
        .iter()
        .enumerate()
        .map(|(i, movie)| format!("{:>2}. {}\n    🗓 {}", i + 1, movie.title, movie.release_year))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn summary_line(summary: &WatchedSummary) -> String {
    format!(
        "#️⃣ {} movies  ⭐️ {:.2}  🌟 {:.2}  ⏳ {:.2} min",
        summary.count, summary.avg_catalog_rating, summary.avg_user_rating, summary.avg_runtime_minutes
    )
}

pub fn watched_body(watched: &[WatchedEntry]) -> String {
    let mut lines = vec![
        "Movies you watched".to_string(),
        summary_line(&WatchedSummary::from_entries(watched)),
    ];
    for (i, movie) in watched.iter().enumerate() {
        lines.push(format!("{:>2}. {}", i + 1, movie.title));
        lines.push(format!(
            "    ⭐️ {:.2}  🌟 {:.2}  ⏳ {} min  (:delete {})",
            movie.catalog_rating,
            movie.user_rating,
            movie.runtime_minutes,
            i + 1
        ));
    }
    lines.join("\n")
}

fn star_bar(stars: u8) -> String {
    let filled = "★".repeat(stars as usize);
    let empty = "☆".repeat((MAX_USER_RATING - stars) as usize);
    format!("{}{}", filled, empty)
}

pub fn detail_body(detail: &MovieDetail, view: &ViewState, watched: &[WatchedEntry]) -> String {
    let mut lines = vec![
        BACK_HINT.to_string(),
        detail.title.clone(),
        format!("{} • {}", detail.released, detail.runtime),
        detail.genre.clone(),
        format!("⭐ {} IMDb rating", detail.catalog_rating),
        String::new(),
    ];

    match watched.iter().find(|e| e.id == detail.id) {
        Some(entry) => lines.push(format!("You gave {} {}⭐ rating", detail.title, entry.user_rating)),
        None => {
            let rating = view.detail_session().and_then(|s| s.rating());
            match rating {
                Some(rating) => {
                    lines.push(format!("{} {}", star_bar(rating.stars()), rating));
                    lines.push("+ Add to list (:add)".to_string());
                }
                None => lines.push(format!("{} (:rate 1-{})", star_bar(0), MAX_USER_RATING)),
            }
        }
    }

    lines.push(String::new());
    lines.push(detail.plot.clone());
    lines.push(format!("Starring {}", detail.actors));
    lines.push(format!("Directed by {}", detail.director));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenslore_models::UserRating;

    fn matrix() -> MovieDetail {
        MovieDetail {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            release_year: "1999".to_string(),
            runtime: "136 min".to_string(),
            catalog_rating: "8.7".to_string(),
            released: "31 Mar 1999".to_string(),
            genre: "Action, Sci-Fi".to_string(),
            plot: "A hacker learns the truth.".to_string(),
            actors: "Keanu Reeves".to_string(),
            director: "Lana Wachowski, Lilly Wachowski".to_string(),
            ..Default::default()
        }
    }

    fn results() -> Vec<SearchResult> {
        vec![
            SearchResult {
                id: "tt0133093".to_string(),
                title: "The Matrix".to_string(),
                release_year: "1999".to_string(),
                poster_url: String::new(),
            },
            SearchResult {
                id: "tt0234215".to_string(),
                title: "The Matrix Reloaded".to_string(),
                release_year: "2003".to_string(),
                poster_url: String::new(),
            },
        ]
    }

    fn screen<'a>(query: &'a QueryState, results: &'a [SearchResult], view: &'a ViewState, watched: &'a [WatchedEntry]) -> Screen<'a> {
        Screen {
            title: "Lenslore".to_string(),
            query,
            results,
            view,
            detail: None,
            detail_loading: false,
            watched,
            width: 120,
        }
    }

    #[test]
    fn test_results_body_states() {
        let mut query = QueryState { text: "The Matrix".to_string(), loading: true, error: None };
        assert_eq!(results_body(&query, &results()), "Loading...");

        query.loading = false;
        query.error = Some("Movie Not Found!".to_string());
        assert_eq!(results_body(&query, &[]), "Movie Not Found! 😓");

        query.error = None;
        let body = results_body(&query, &results());
        assert!(body.contains(" 1. The Matrix"));
        assert!(body.contains(" 2. The Matrix Reloaded"));
        assert!(body.contains("🗓 2003"));
    }

    #[test]
    fn test_summary_line_two_decimals() {
        let summary = WatchedSummary {
            count: 2,
            avg_catalog_rating: 8.25,
            avg_user_rating: 9.0,
            avg_runtime_minutes: 130.5,
        };
        assert_eq!(summary_line(&summary), "#️⃣ 2 movies  ⭐️ 8.25  🌟 9.00  ⏳ 130.50 min");
    }

    #[test]
    fn test_detail_body_rating_states() {
        let detail = matrix();
        let mut view = ViewState::new(120, 80);
        view.select(&detail.id);

        let body = detail_body(&detail, &view, &[]);
        assert!(body.contains("31 Mar 1999 • 136 min"));
        assert!(body.contains("⭐ 8.7 IMDb rating"));
        assert!(body.contains("Directed by Lana Wachowski"));
        assert!(!body.contains("Add to list"));

        view.set_rating(UserRating::new(8).unwrap());
        let body = detail_body(&detail, &view, &[]);
        assert!(body.contains("★★★★★★★★☆☆ 8"));
        assert!(body.contains("+ Add to list"));

        let entry = WatchedEntry::from_detail(&detail, UserRating::new(9).unwrap(), 1);
        let body = detail_body(&detail, &view, &[entry]);
        assert!(body.contains("You gave The Matrix 9⭐ rating"));
        assert!(!body.contains("Add to list"));
    }

    #[test]
    fn test_wide_layout_panes() {
        let query = QueryState::default();
        let mut view = ViewState::new(120, 80);
        assert_eq!(screen(&query, &[], &view, &[]).panes(), vec![Pane::Results, Pane::Watched]);

        view.select("tt0133093");
        assert_eq!(screen(&query, &[], &view, &[]).panes(), vec![Pane::Results, Pane::Detail]);
    }

    #[test]
    fn test_narrow_layout_panes() {
        let mut query = QueryState::default();
        let mut view = ViewState::new(60, 80);
        assert_eq!(screen(&query, &[], &view, &[]).panes(), vec![Pane::Results]);

        view.toggle_active();
        assert_eq!(screen(&query, &[], &view, &[]).panes(), vec![Pane::Watched]);

        query.loading = true;
        assert_eq!(screen(&query, &[], &view, &[]).panes(), vec![Pane::Results]);

        view.select("tt0133093");
        assert_eq!(screen(&query, &[], &view, &[]).panes(), vec![Pane::Detail]);
    }

    #[test]
    fn test_closed_box_hides_content() {
        let query = QueryState { text: "The Matrix".to_string(), loading: false, error: None };
        let results = results();
        let mut view = ViewState::new(120, 80);
        view.toggle_results_panel();

        let rendered = screen(&query, &results, &view, &[]).render();
        assert!(rendered.contains("+ Results (:results)"));
        assert!(!rendered.contains("The Matrix Reloaded"));
        assert!(rendered.contains("Found 2 results"));
        assert!(rendered.contains("Movies you watched"));
    }

    #[test]
    fn test_detail_pane_after_failed_fetch() {
        let query = QueryState::default();
        let mut view = ViewState::new(120, 80);
        view.select("tt404");

        let mut loading = screen(&query, &[], &view, &[]);
        loading.detail_loading = true;
        assert!(loading.render().contains("Loading..."));

        // The fetch finished without a record: no spinner, no error, just the way back
        let failed = screen(&query, &[], &view, &[]);
        let rendered = failed.render();
        assert!(!rendered.contains("Loading..."));
        assert!(!rendered.contains("😓"));
        assert!(rendered.contains("← back (:close)"));
        assert_eq!(failed.panes(), vec![Pane::Results, Pane::Detail]);
    }
}
