// src/services/client.rs

//! HTTP client for the recommendation API.
//!
//! Endpoints (relative to the configured base URL):
//!
//! ```text
//! GET  recommendations/global?limit={n}
//! GET  recommendations/users/{userId}?limit={n}
//! POST recommendations/by-items?limit={n}   {"itemIds": [...]}
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, Book, ItemIdRequest, Limit};
use crate::services::RecommendationSource;
use crate::utils::http::{create_async_client, endpoint, normalize_base_url};

/// Service for fetching recommendations over HTTP.
#[derive(Debug, Clone)]
pub struct RecommendationClient {
    client: Client,
    base_url: Url,
}

impl RecommendationClient {
    /// Create a client from the API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = create_async_client(config)?;
        Self::with_client(client, &config.base_url)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a request and decode the book list.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        limit: Limit,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Vec<Book>> {
        let url = endpoint(&self.base_url, path)?;
        log::debug!("[API Request] {} {}?limit={}", method, path, limit);

        let request = self
            .client
            .request(method.clone(), url)
            .query(&[("limit", limit.get())]);

        let response = build(request).send().await.map_err(|e| {
            log::error!("[API Error] {} {}: no response from server: {}", method, path, e);
            AppError::network(e)
        })?;

        let status = response.status();
        log::info!("[API] {} {} -> {}", method, path, status.as_u16());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("[API Error] {} {}: {}", status.as_u16(), path, body);
            return Err(AppError::server(status.as_u16(), body));
        }

        let bytes = response.bytes().await.map_err(AppError::network)?;
        let mut books: Vec<Book> =
            serde_json::from_slice(&bytes).map_err(|e| AppError::Decode(e.to_string()))?;

        if books.len() > limit.as_usize() {
            log::warn!(
                "{} returned {} books for limit {}, truncating",
                path,
                books.len(),
                limit
            );
            books.truncate(limit.as_usize());
        }

        Ok(books)
    }
}

#[async_trait]
impl RecommendationSource for RecommendationClient {
    async fn fetch_global(&self, limit: Limit) -> Result<Vec<Book>> {
        self.execute(Method::GET, "recommendations/global", limit, |r| r)
            .await
    }

    async fn fetch_for_user(&self, user_id: i64, limit: Limit) -> Result<Vec<Book>> {
        if user_id <= 0 {
            return Err(AppError::validation(format!(
                "User ID must be a positive integer, got {user_id}"
            )));
        }

        let path = format!("recommendations/users/{user_id}");
        let books = self.execute(Method::GET, &path, limit, |r| r).await?;

        let unscored = books.iter().filter(|b| b.score.is_none()).count();
        if unscored > 0 {
            log::debug!("{} of {} user recommendations carry no score", unscored, books.len());
        }

        Ok(books)
    }

    async fn fetch_by_items(&self, titles: &[String], limit: Limit) -> Result<Vec<Book>> {
        if titles.is_empty() {
            log::debug!("No item titles given, skipping by-items request");
            return Ok(Vec::new());
        }

        let body = ItemIdRequest {
            item_ids: titles.to_vec(),
        };
        self.execute(Method::POST, "recommendations/by-items", limit, |r| {
            r.json(&body)
        })
        .await
    }
}
