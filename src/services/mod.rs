// src/services/mod.rs

//! Services that talk to the recommendation API.
//!
//! - `RecommendationSource`: the seam the query cache fetches through
//! - `RecommendationClient`: the HTTP implementation

pub mod client;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Book, Limit};

pub use client::RecommendationClient;

/// Anything that can answer the three recommendation requests.
///
/// Implementations return books in rank order and never more than `limit`.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Trending books for everyone.
    async fn fetch_global(&self, limit: Limit) -> Result<Vec<Book>>;

    /// Personalized books. Fails with a validation error for `user_id <= 0`
    /// without touching the network.
    async fn fetch_for_user(&self, user_id: i64, limit: Limit) -> Result<Vec<Book>>;

    /// Books similar to the given titles. Empty titles yield an empty list
    /// without touching the network.
    async fn fetch_by_items(&self, titles: &[String], limit: Limit) -> Result<Vec<Book>>;
}
