//! Cache keys.

use std::fmt;

use crate::models::{Limit, RecommendationKind};

/// Identifies one cacheable recommendation query.
///
/// Every parameter that changes the server answer is part of the key, so
/// changing the limit, the user or the titles lands on a different entry.
/// Titles keep their order: the same titles in another order are a
/// different key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Global { limit: Limit },
    User { user_id: i64, limit: Limit },
    Items { titles: Vec<String>, limit: Limit },
}

impl QueryKey {
    pub fn global(limit: Limit) -> Self {
        Self::Global { limit }
    }

    pub fn user(user_id: i64, limit: Limit) -> Self {
        Self::User { user_id, limit }
    }

    pub fn items(titles: &[String], limit: Limit) -> Self {
        Self::Items {
            titles: titles.to_vec(),
            limit,
        }
    }

    pub fn kind(&self) -> RecommendationKind {
        match self {
            Self::Global { .. } => RecommendationKind::Global,
            Self::User { .. } => RecommendationKind::User,
            Self::Items { .. } => RecommendationKind::Items,
        }
    }

    pub fn limit(&self) -> Limit {
        match self {
            Self::Global { limit } | Self::User { limit, .. } | Self::Items { limit, .. } => *limit,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global { limit } => write!(f, "recommendations/global/{limit}"),
            Self::User { user_id, limit } => write!(f, "recommendations/user/{user_id}/{limit}"),
            Self::Items { titles, limit } => {
                write!(f, "recommendations/items/[{}]/{limit}", titles.join("|"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn titles(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_parameter_is_part_of_the_key() {
        let ten = Limit::new(10).unwrap();
        let twelve = Limit::new(12).unwrap();

        let keys: HashSet<QueryKey> = [
            QueryKey::global(ten),
            QueryKey::global(twelve),
            QueryKey::user(1, ten),
            QueryKey::user(2, ten),
            QueryKey::user(1, twelve),
            QueryKey::items(&titles(&["Dune"]), ten),
            QueryKey::items(&titles(&["Dune", "Emma"]), ten),
            QueryKey::items(&titles(&["Emma", "Dune"]), ten),
        ]
        .into_iter()
        .collect();

        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn test_identical_parameters_share_a_key() {
        let a = QueryKey::items(&titles(&["Dune", "Emma"]), Limit::API_DEFAULT);
        let b = QueryKey::items(&titles(&["Dune", "Emma"]), Limit::API_DEFAULT);
        assert_eq!(a, b);
        assert_eq!(a.kind(), RecommendationKind::Items);
        assert_eq!(a.to_string(), "recommendations/items/[Dune|Emma]/10");
    }
}
