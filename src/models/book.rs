//! Book data structure.

use serde::{Deserialize, Serialize};

/// A recommended book as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Identifier, unique within one result list
    pub item_id: String,

    /// Book title
    pub title: String,

    /// Authors in credit order
    #[serde(default)]
    pub authors: Option<Vec<String>>,

    #[serde(default)]
    pub description: Option<String>,

    /// Cover image URL
    #[serde(default)]
    pub thumbnail: Option<String>,

    /// Average rating on a 0-5 scale
    #[serde(default)]
    pub average_rating: Option<f64>,

    #[serde(default)]
    pub ratings_count: Option<u64>,

    /// Relevance score on a 0-1 scale (personalized and similarity results only)
    #[serde(default)]
    pub score: Option<f64>,
}

/// Coarse rating label used by the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    Excellent,
    Great,
    Good,
    Fair,
}

impl RatingTier {
    pub fn from_rating(rating: f64) -> Self {
        if rating >= 4.5 {
            Self::Excellent
        } else if rating >= 4.0 {
            Self::Great
        } else if rating >= 3.5 {
            Self::Good
        } else {
            Self::Fair
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Great => "great",
            Self::Good => "good",
            Self::Fair => "fair",
        }
    }
}

impl Book {
    /// Authors joined for display, or "Unknown author".
    pub fn author_line(&self) -> String {
        match &self.authors {
            Some(authors) if !authors.is_empty() => authors.join(", "),
            _ => "Unknown author".to_string(),
        }
    }

    /// Whether the rating is known and at least `threshold`.
    pub fn rated_at_least(&self, threshold: f64) -> bool {
        self.average_rating.is_some_and(|r| r >= threshold)
    }

    pub fn rating_tier(&self) -> Option<RatingTier> {
        self.average_rating.map(RatingTier::from_rating)
    }

    /// Score as a whole percentage ("Match: 87%").
    pub fn match_percent(&self) -> Option<u32> {
        self.score.map(|s| (s * 100.0).round().clamp(0.0, 100.0) as u32)
    }

    /// Format book for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{title}`, `{authors}`
    /// - `{rating}` (one decimal or `-`), `{count}`, `{score}` (two decimals or `-`)
    pub fn format(&self, template: &str) -> String {
        let rating = self
            .average_rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "-".into());
        let count = self
            .ratings_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".into());
        let score = self
            .score
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "-".into());

        template
            .replace("{id}", &self.item_id)
            .replace("{title}", &self.title)
            .replace("{authors}", &self.author_line())
            .replace("{rating}", &rating)
            .replace("{count}", &count)
            .replace("{score}", &score)
    }
}

#[cfg(test)]
pub(crate) fn sample_book(id: usize, rating: Option<f64>) -> Book {
    Book {
        item_id: format!("book_{id}"),
        title: format!("Book {id}"),
        authors: Some(vec!["Author".to_string()]),
        description: None,
        thumbnail: None,
        average_rating: rating,
        ratings_count: Some(10),
        score: None,
    }
}
