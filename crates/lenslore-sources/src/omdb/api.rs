use crate::error::CatalogError;
use lenslore_models::{MovieDetail, SearchResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

// OMDb signals success in the body rather than through the HTTP status
const RESPONSE_TRUE: &str = "True";

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbMovie {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl From<OmdbSearchItem> for SearchResult {
    fn from(item: OmdbSearchItem) -> Self {
        Self {
            id: item.imdb_id,
            title: item.title,
            release_year: item.year,
            poster_url: item.poster,
        }
    }
}

fn search_url(base_url: &str, api_key: &str, query: &str) -> String {
    format!(
        "{}/?apikey={}&s={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(api_key),
        urlencoding::encode(query)
    )
}

fn detail_url(base_url: &str, api_key: &str, id: &str) -> String {
    format!(
        "{}/?apikey={}&i={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(api_key),
        urlencoding::encode(id)
    )
}

/// Search the catalog by title text
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResult>, CatalogError> {
    debug!(query = %query, "Searching OMDb");
    let body = get_body(client, &search_url(base_url, api_key, query)).await?;
    parse_search_response(&body)
}

/// Fetch one movie by IMDb id
pub async fn get_movie(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: &str,
) -> Result<MovieDetail, CatalogError> {
    debug!(id = %id, "Fetching OMDb movie detail");
    let body = get_body(client, &detail_url(base_url, api_key, id)).await?;
    parse_movie_response(&body)
}

async fn get_body(client: &Client, url: &str) -> Result<String, CatalogError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), "OMDb returned non-success status");
        return Err(CatalogError::Status { status: status.as_u16() });
    }

    Ok(response.text().await?)
}

pub fn parse_search_response(body: &str) -> Result<Vec<SearchResult>, CatalogError> {
    let response: OmdbSearchResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;

    if response.response != RESPONSE_TRUE {
        return Err(CatalogError::NotFound(
            response.error.unwrap_or_else(|| "Movie not found!".to_string()),
        ));
    }

    Ok(response.search.into_iter().map(SearchResult::from).collect())
}

pub fn parse_movie_response(body: &str) -> Result<MovieDetail, CatalogError> {
    let movie: OmdbMovie =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;

    if movie.response != RESPONSE_TRUE {
        return Err(CatalogError::NotFound(
            movie.error.unwrap_or_else(|| "Incorrect IMDb ID.".to_string()),
        ));
    }

    Ok(MovieDetail {
        id: movie.imdb_id,
        title: movie.title,
        release_year: movie.year,
        poster_url: movie.poster,
        runtime: movie.runtime,
        catalog_rating: movie.imdb_rating,
        plot: movie.plot,
        released: movie.released,
        actors: movie.actors,
        director: movie.director,
        genre: movie.genre,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "Search": [
                {"Title": "The Matrix", "Year": "1999", "imdbID": "tt0133093", "Type": "movie", "Poster": "https://example.com/m.jpg"},
                {"Title": "The Matrix Reloaded", "Year": "2003", "imdbID": "tt0234215", "Type": "movie", "Poster": "N/A"},
                {"Title": "The Matrix Revolutions", "Year": "2003", "imdbID": "tt0242653", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "3",
            "Response": "True"
        }"#;

        let results = parse_search_response(body).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "tt0133093");
        assert_eq!(results[0].title, "The Matrix");
        assert_eq!(results[0].release_year, "1999");
        assert_eq!(results[0].poster_url, "https://example.com/m.jpg");
    }

    #[test]
    fn test_parse_search_not_found() {
        let body = r#"{"Response": "False", "Error": "Movie not found!"}"#;
        let err = parse_search_response(body).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref m) if m == "Movie not found!"));
        assert_eq!(err.user_message(), "Movie Not Found!");
    }

    #[test]
    fn test_parse_search_garbage() {
        let err = parse_search_response("<html>").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn test_parse_movie_response() {
        let body = r#"{
            "Title": "The Matrix", "Year": "1999", "Rated": "R", "Released": "31 Mar 1999",
            "Runtime": "136 min", "Genre": "Action, Sci-Fi", "Director": "Lana Wachowski, Lilly Wachowski",
            "Actors": "Keanu Reeves, Laurence Fishburne", "Plot": "A hacker learns the truth.",
            "Poster": "N/A", "imdbRating": "8.7", "imdbID": "tt0133093", "Response": "True"
        }"#;

        let movie = parse_movie_response(body).unwrap();
        assert_eq!(movie.id, "tt0133093");
        assert_eq!(movie.runtime_minutes(), 136);
        assert_eq!(movie.genre, "Action, Sci-Fi");
        assert_eq!(movie.released, "31 Mar 1999");
    }

    #[test]
    fn test_parse_movie_bad_id() {
        let body = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        assert!(matches!(parse_movie_response(body), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_urls_are_encoded() {
        assert_eq!(
            search_url("https://www.omdbapi.com/", "k y", "the matrix&x"),
            "https://www.omdbapi.com/?apikey=k%20y&s=the%20matrix%26x"
        );
        assert_eq!(
            detail_url("http://localhost:8080", "key", "tt0133093"),
            "http://localhost:8080/?apikey=key&i=tt0133093"
        );
    }
}
