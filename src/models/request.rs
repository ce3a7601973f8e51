//! Recommendation request parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Maximum number of books to request.
///
/// Always positive. The front end only offers [`Limit::CHOICES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Limit(u32);

impl Limit {
    /// Values offered by the limit selector.
    pub const CHOICES: [u32; 6] = [6, 10, 12, 20, 24, 30];

    /// Limit the API applies when none is given.
    pub const API_DEFAULT: Limit = Limit(10);

    /// Limit the pages start with.
    pub const PAGE_DEFAULT: Limit = Limit(12);

    /// Create a limit from any positive integer.
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(AppError::validation("limit must be a positive integer"));
        }
        Ok(Self(value))
    }

    /// Create a limit restricted to the selector values.
    pub fn choice(value: u32) -> Result<Self> {
        if !Self::CHOICES.contains(&value) {
            return Err(AppError::validation(format!(
                "limit must be one of {:?}, got {value}",
                Self::CHOICES
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::API_DEFAULT
    }
}

impl TryFrom<u32> for Limit {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Limit> for u32 {
    fn from(limit: Limit) -> Self {
        limit.0
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three kinds of recommendation the API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationKind {
    Global,
    User,
    Items,
}

/// Body of the item-based recommendation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemIdRequest {
    pub item_ids: Vec<String>,
}

/// Parse a user id typed by a person.
///
/// Returns `None` for anything that is not a positive integer, so the
/// caller keeps its previous id.
pub fn parse_user_id(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_rejects_zero() {
        assert!(Limit::new(0).is_err());
        assert_eq!(Limit::new(7).unwrap().get(), 7);
    }

    #[test]
    fn test_limit_choice() {
        for value in Limit::CHOICES {
            assert_eq!(Limit::choice(value).unwrap().get(), value);
        }
        assert!(matches!(Limit::choice(7), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_limit_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Limit>("0").is_err());
        assert_eq!(serde_json::from_str::<Limit>("24").unwrap().get(), 24);
    }

    #[test]
    fn test_item_request_wire_format() {
        let body = ItemIdRequest {
            item_ids: vec!["Dune".into(), "Emma".into()],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"itemIds":["Dune","Emma"]}"#
        );
    }

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id(" 42 "), Some(42));
        assert_eq!(parse_user_id("0"), None);
        assert_eq!(parse_user_id("-3"), None);
        assert_eq!(parse_user_id("abc"), None);
    }
}
