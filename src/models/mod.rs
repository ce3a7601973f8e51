// src/models/mod.rs

//! Domain models for the recommendation client.
//!
//! This module contains the data structures shared by the API client, the
//! query cache and the pages.

mod book;
mod config;
mod request;

// Re-export all public types
pub use book::{Book, RatingTier};
pub use config::{ApiConfig, BASE_URL_ENV, Config, LoggingConfig, QueryConfig};
pub use request::{ItemIdRequest, Limit, RecommendationKind, parse_user_id};

#[cfg(test)]
pub(crate) use book::sample_book;
