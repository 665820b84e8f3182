pub mod movie;
pub mod rating;
pub mod watched;

pub use movie::{parse_decimal, parse_runtime_minutes, MovieDetail, SearchResult};
pub use rating::{RatingError, UserRating, MAX_USER_RATING};
pub use watched::{average, WatchedEntry, WatchedSummary};
