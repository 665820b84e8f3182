use serde::{Deserialize, Serialize};

/// One row of a catalog search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String, // IMDb id, e.g. "tt0133093"
    pub title: String,
    pub release_year: String, // Catalog text; series report ranges like "2008–2013"
    pub poster_url: String,
}

/// Full catalog record for a single movie.
///
/// `runtime` and `catalog_rating` are kept as the catalog reports them
/// ("136 min", "8.7", or "N/A"); use [`MovieDetail::runtime_minutes`] and
/// [`MovieDetail::catalog_rating_value`] for numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub release_year: String,
    pub poster_url: String,
    pub runtime: String,
    pub catalog_rating: String,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

impl MovieDetail {
    /// Minutes from the leading token of the runtime text, 0 when unknown.
    pub fn runtime_minutes(&self) -> u32 {
        parse_runtime_minutes(&self.runtime)
    }

    pub fn catalog_rating_value(&self) -> f64 {
        parse_decimal(&self.catalog_rating)
    }
}

/// Parse "136 min" into 136. Anything that does not start with an integer
/// token yields 0.
pub fn parse_runtime_minutes(runtime: &str) -> u32 {
    runtime
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

/// Parse catalog decimals such as "8.7"; "N/A" and friends yield 0.0.
pub fn parse_decimal(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
