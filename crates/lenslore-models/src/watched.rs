use serde::{Deserialize, Serialize};
use crate::movie::MovieDetail;
use crate::rating::UserRating;

/// A movie the user has rated and added to the watched list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchedEntry {
    pub id: String,
    pub title: String,
    pub release_year: String,
    pub poster_url: String,
    pub runtime_minutes: u32,
    pub catalog_rating: f64,
    pub user_rating: f64,
    /// How many times the rating was changed before the entry was confirmed.
    #[serde(default)]
    pub rating_revision_count: u32,
}

impl WatchedEntry {
    pub fn from_detail(detail: &MovieDetail, user_rating: UserRating, rating_revision_count: u32) -> Self {
        Self {
            id: detail.id.clone(),
            title: detail.title.clone(),
            release_year: detail.release_year.clone(),
            poster_url: detail.poster_url.clone(),
            runtime_minutes: detail.runtime_minutes(),
            catalog_rating: detail.catalog_rating_value(),
            user_rating: user_rating.as_f64(),
            rating_revision_count,
        }
    }
}

/// Aggregate statistics over the watched list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_catalog_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime_minutes: f64,
}

impl WatchedSummary {
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_catalog_rating: average(entries.iter().map(|e| e.catalog_rating)),
            avg_user_rating: average(entries.iter().map(|e| e.user_rating)),
            avg_runtime_minutes: average(entries.iter().map(|e| f64::from(e.runtime_minutes))),
        }
    }
}

/// Arithmetic mean, 0.0 for an empty sequence.
pub fn average(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_entry(id: &str, catalog: f64, user: f64, runtime: u32) -> WatchedEntry {
        WatchedEntry {
            id: id.to_string(),
            title: format!("Movie {}", id),
            release_year: "1999".to_string(),
            poster_url: "N/A".to_string(),
            runtime_minutes: runtime,
            catalog_rating: catalog,
            user_rating: user,
            rating_revision_count: 0,
        }
    }

    #[test]
    fn test_average_empty() {
        assert_eq!(average(Vec::new()), 0.0);
    }

    #[test]
    fn test_summary() {
        let entries = vec![
            create_entry("tt001", 8.0, 10.0, 120),
            create_entry("tt002", 7.0, 6.0, 90),
        ];
        let summary = WatchedSummary::from_entries(&entries);
        assert_eq!(summary.count, 2);
        assert!((summary.avg_catalog_rating - 7.5).abs() < 1e-9);
        assert!((summary.avg_user_rating - 8.0).abs() < 1e-9);
        assert!((summary.avg_runtime_minutes - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_nothing() {
        assert_eq!(WatchedSummary::from_entries(&[]), WatchedSummary::default());
    }

    #[test]
    fn test_from_detail() {
        let detail = MovieDetail {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            release_year: "1999".to_string(),
            runtime: "136 min".to_string(),
            catalog_rating: "8.7".to_string(),
            ..MovieDetail::default()
        };
        let entry = WatchedEntry::from_detail(&detail, UserRating::new(9).unwrap(), 3);
        assert_eq!(entry.id, "tt0133093");
        assert_eq!(entry.runtime_minutes, 136);
        assert!((entry.catalog_rating - 8.7).abs() < 1e-9);
        assert_eq!(entry.user_rating, 9.0);
        assert_eq!(entry.rating_revision_count, 3);
    }

    #[test]
    fn test_serialized_field_names() {
        let entry = create_entry("tt001", 8.0, 9.0, 100);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["runtimeMinutes"], 100);
        assert_eq!(json["ratingRevisionCount"], 0);
        assert_eq!(json["userRating"], 9.0);
    }
}
