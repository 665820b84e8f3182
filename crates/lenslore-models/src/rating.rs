use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MAX_USER_RATING: u8 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("rating must be a whole number, got {0:?}")]
    NotANumber(String),
    #[error("rating must be between 1 and {max}, got {0}", max = MAX_USER_RATING)]
    OutOfRange(u8),
}

/// Star rating given by the user, 1 to 10 inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct UserRating(u8);

impl UserRating {
    pub fn new(stars: u8) -> Result<Self, RatingError> {
        if (1..=MAX_USER_RATING).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(RatingError::OutOfRange(stars))
        }
    }

    pub fn stars(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl TryFrom<u8> for UserRating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserRating> for u8 {
    fn from(rating: UserRating) -> Self {
        rating.0
    }
}

impl FromStr for UserRating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stars: u8 = s
            .trim()
            .parse()
            .map_err(|_| RatingError::NotANumber(s.trim().to_string()))?;
        Self::new(stars)
    }
}

impl fmt::Display for UserRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(UserRating::new(0).is_err());
        assert_eq!(UserRating::new(1).unwrap().stars(), 1);
        assert_eq!(UserRating::new(10).unwrap().stars(), 10);
        assert_eq!(UserRating::new(11), Err(RatingError::OutOfRange(11)));
    }

    #[test]
    fn test_rating_from_str() {
        assert_eq!("7".parse::<UserRating>().unwrap().stars(), 7);
        assert_eq!(" 9 ".parse::<UserRating>().unwrap().stars(), 9);
        assert!(matches!("seven".parse::<UserRating>(), Err(RatingError::NotANumber(_))));
        assert!(matches!("300".parse::<UserRating>(), Err(RatingError::NotANumber(_))));
    }
}
