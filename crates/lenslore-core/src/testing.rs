//! Scripted catalog for exercising the controllers without a network.

use async_trait::async_trait;
use lenslore_models::{MovieDetail, SearchResult};
use lenslore_sources::{CatalogError, MovieCatalog};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
pub enum Scripted<T> {
    Ok(T),
    NotFound,
    Status(u16),
}

struct Reply<T> {
    outcome: Scripted<T>,
    delay: Duration,
}

#[derive(Default)]
pub struct ScriptedCatalog {
    searches: Mutex<HashMap<String, Reply<Vec<SearchResult>>>>,
    movies: Mutex<HashMap<String, Reply<MovieDetail>>>,
    search_calls: AtomicUsize,
    movie_calls: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(self, query: &str, outcome: Scripted<Vec<SearchResult>>) -> Self {
        self.with_delayed_search(query, outcome, Duration::ZERO)
    }

    pub fn with_delayed_search(
        self,
        query: &str,
        outcome: Scripted<Vec<SearchResult>>,
        delay: Duration,
    ) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), Reply { outcome, delay });
        self
    }

    pub fn with_movie(self, detail: MovieDetail) -> Self {
        let id = detail.id.clone();
        self.with_delayed_movie(&id, Scripted::Ok(detail), Duration::ZERO)
    }

    pub fn with_delayed_movie(self, id: &str, outcome: Scripted<MovieDetail>, delay: Duration) -> Self {
        self.movies
            .lock()
            .unwrap()
            .insert(id.to_string(), Reply { outcome, delay });
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn movie_calls(&self) -> usize {
        self.movie_calls.load(Ordering::SeqCst)
    }
}

fn resolve<T: Clone>(reply: Option<(Scripted<T>, Duration)>) -> (Result<T, CatalogError>, Duration) {
    match reply {
        Some((Scripted::Ok(value), delay)) => (Ok(value), delay),
        Some((Scripted::NotFound, delay)) => (Err(CatalogError::NotFound("Movie not found!".to_string())), delay),
        Some((Scripted::Status(status), delay)) => (Err(CatalogError::Status { status }), delay),
        None => (Err(CatalogError::NotFound("unscripted".to_string())), Duration::ZERO),
    }
}

#[async_trait]
impl MovieCatalog for ScriptedCatalog {
    fn catalog_name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .searches
            .lock()
            .unwrap()
            .get(query)
            .map(|r| (r.outcome.clone(), r.delay));
        let (outcome, delay) = resolve(reply);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    async fn movie(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        self.movie_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .movies
            .lock()
            .unwrap()
            .get(id)
            .map(|r| (r.outcome.clone(), r.delay));
        let (outcome, delay) = resolve(reply);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }
}

pub fn search_result(id: &str, title: &str, year: &str) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        title: title.to_string(),
        release_year: year.to_string(),
        poster_url: "N/A".to_string(),
    }
}

pub fn matrix_results() -> Vec<SearchResult> {
    vec![
        search_result("tt0133093", "The Matrix", "1999"),
        search_result("tt0234215", "The Matrix Reloaded", "2003"),
        search_result("tt0242653", "The Matrix Revolutions", "2003"),
    ]
}

pub fn matrix_detail() -> MovieDetail {
    MovieDetail {
        id: "tt0133093".to_string(),
        title: "The Matrix".to_string(),
        release_year: "1999".to_string(),
        poster_url: "N/A".to_string(),
        runtime: "136 min".to_string(),
        catalog_rating: "8.7".to_string(),
        plot: "A computer hacker learns about the true nature of reality.".to_string(),
        released: "31 Mar 1999".to_string(),
        actors: "Keanu Reeves, Laurence Fishburne".to_string(),
        director: "Lana Wachowski, Lilly Wachowski".to_string(),
        genre: "Action, Sci-Fi".to_string(),
    }
}
