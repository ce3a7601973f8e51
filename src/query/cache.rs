//! Process-wide query cache.
//!
//! Holds the last successful answer per [`QueryKey`] together with the time it
//! arrived, and the fetch currently in flight for that key, if any.
//!
//! ## Rules
//!
//! - A fresh entry (younger than the kind's stale time) is served without a
//!   network call.
//! - Concurrent requests for one key share a single in-flight fetch.
//! - Entries nobody asked for within the gc window are dropped when a new
//!   key is inserted.
//! - Every fetch is tagged with a generation. A completion only writes its
//!   entry while that generation is still the entry's in-flight one, so a
//!   response that arrives after `invalidate` or `clear` is dropped.
//!
//! The map sits behind a `std::sync::Mutex` that is never held across an
//! `.await`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{Book, QueryConfig};
use crate::query::{QueryKey, RetryPolicy};
use crate::services::RecommendationSource;

/// Outcome of a query as seen by every waiter.
pub type FetchResult = std::result::Result<Arc<Vec<Book>>, Arc<AppError>>;

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

#[derive(Default)]
struct Entry {
    data: Option<Arc<Vec<Book>>>,
    updated_at: Option<Instant>,
    in_flight: Option<(u64, SharedFetch)>,
    last_used: Option<Instant>,
}

/// Key-based cache in front of a [`RecommendationSource`].
pub struct QueryCache {
    source: Arc<dyn RecommendationSource>,
    config: QueryConfig,
    retry: RetryPolicy,
    entries: Mutex<HashMap<QueryKey, Entry>>,
    generation: AtomicU64,
}

impl QueryCache {
    /// Create a cache with the default stale times and retry policy.
    pub fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self::with_config(source, QueryConfig::default())
    }

    /// Create a cache with custom stale times and retry settings.
    pub fn with_config(source: Arc<dyn RecommendationSource>, config: QueryConfig) -> Self {
        Self {
            source,
            retry: RetryPolicy::from_config(&config),
            config,
            entries: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, key: &QueryKey, entry: &Entry) -> bool {
        match (&entry.data, entry.updated_at) {
            (Some(_), Some(at)) => at.elapsed() < self.config.stale_time(key.kind()),
            _ => false,
        }
    }

    /// Answer a query, from the cache when fresh, otherwise from the source.
    pub async fn fetch(&self, key: &QueryKey) -> FetchResult {
        let (generation, pending) = {
            let mut entries = self.lock();
            if !entries.contains_key(key) {
                self.evict_idle(&mut entries);
            }
            let entry = entries.entry(key.clone()).or_default();
            entry.last_used = Some(Instant::now());

            if self.is_fresh(key, entry) {
                if let Some(data) = &entry.data {
                    log::debug!("cache hit for {}", key);
                    return Ok(Arc::clone(data));
                }
            }

            match entry.in_flight.clone() {
                Some((generation, pending)) => {
                    log::debug!("joining in-flight fetch for {}", key);
                    (generation, pending)
                }
                None => {
                    let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
                    let pending = self.start(key.clone());
                    entry.in_flight = Some((generation, pending.clone()));
                    (generation, pending)
                }
            }
        };

        let result = pending.await;
        self.settle(key, generation, &result);
        result
    }

    /// Drop entries with no fetch in flight that were last used before the
    /// gc window.
    fn evict_idle(&self, entries: &mut HashMap<QueryKey, Entry>) {
        let window = self.config.gc_time();
        let before = entries.len();
        entries.retain(|_, entry| {
            entry.in_flight.is_some() || entry.last_used.is_some_and(|at| at.elapsed() < window)
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            log::debug!("evicted {} idle cache entries", evicted);
        }
    }

    /// Build the shared fetch future for a key.
    fn start(&self, key: QueryKey) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let retry = self.retry;

        async move {
            let label = key.to_string();
            let source = &source;
            let key = &key;
            retry
                .run(&label, move || request(source.as_ref(), key))
                .await
                .map(Arc::new)
                .map_err(Arc::new)
        }
        .boxed()
        .shared()
    }

    /// Store a completed fetch unless it was superseded meanwhile.
    fn settle(&self, key: &QueryKey, generation: u64, result: &FetchResult) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            log::debug!("discarding response for evicted key {}", key);
            return;
        };

        match &entry.in_flight {
            Some((current, _)) if *current == generation => {}
            // Another waiter of the same fetch already stored it.
            None if entry.updated_at.is_some() && result.is_ok() => return,
            _ => {
                log::debug!("discarding superseded response for {}", key);
                return;
            }
        }

        entry.in_flight = None;
        entry.last_used = Some(Instant::now());
        if let Ok(books) = result {
            entry.data = Some(Arc::clone(books));
            entry.updated_at = Some(Instant::now());
        }
    }

    /// Last stored answer for a key, fresh or stale.
    pub fn peek(&self, key: &QueryKey) -> Option<Arc<Vec<Book>>> {
        self.lock().get(key).and_then(|e| e.data.clone())
    }

    /// Stored answer for a key only while it is still fresh.
    pub fn peek_fresh(&self, key: &QueryKey) -> Option<Arc<Vec<Book>>> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        if self.is_fresh(key, entry) {
            entry.data.clone()
        } else {
            None
        }
    }

    /// Mark a key stale and detach its in-flight fetch.
    ///
    /// The stored books stay visible through [`peek`](Self::peek) until the
    /// next fetch replaces them.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(entry) = self.lock().get_mut(key) {
            log::debug!("invalidating {}", key);
            entry.updated_at = None;
            entry.in_flight = None;
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = self.lock();
        log::debug!("clearing {} cache entries", entries.len());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dispatch one attempt for a key to the matching source call.
async fn request(source: &dyn RecommendationSource, key: &QueryKey) -> Result<Vec<Book>> {
    match key {
        QueryKey::Global { limit } => source.fetch_global(*limit).await,
        QueryKey::User { user_id, limit } => source.fetch_for_user(*user_id, *limit).await,
        QueryKey::Items { titles, limit } => source.fetch_by_items(titles, *limit).await,
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::FakeSource;
    use super::*;
    use crate::models::Limit;

    fn cache_over(source: &Arc<FakeSource>) -> QueryCache {
        QueryCache::new(Arc::clone(source) as Arc<dyn RecommendationSource>)
    }

    fn titles(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_fetch_respects_every_limit_choice() {
        let source = Arc::new(FakeSource::with_books(40));
        let cache = cache_over(&source);

        for value in Limit::CHOICES {
            let limit = Limit::choice(value).unwrap();
            let books = cache.fetch(&QueryKey::global(limit)).await.unwrap();
            assert!(books.len() <= value as usize);
            let expected: Vec<_> = source.books.iter().take(books.len()).collect();
            assert_eq!(books.iter().collect::<Vec<_>>(), expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_served_without_network() {
        let source = Arc::new(FakeSource::with_books(12));
        let cache = cache_over(&source);
        let key = QueryKey::global(Limit::PAGE_DEFAULT);

        let first = cache.fetch(&key).await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        let second = cache.fetch(&key).await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entry_is_refetched() {
        let source = Arc::new(FakeSource::with_books(12));
        let cache = cache_over(&source);
        let key = QueryKey::global(Limit::PAGE_DEFAULT);

        cache.fetch(&key).await.unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;
        assert!(cache.peek_fresh(&key).is_none());
        assert!(cache.peek(&key).is_some());

        cache.fetch(&key).await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_entries_go_stale_after_three_minutes() {
        let source = Arc::new(FakeSource::with_books(12));
        let cache = cache_over(&source);
        let key = QueryKey::user(7, Limit::PAGE_DEFAULT);

        cache.fetch(&key).await.unwrap();
        tokio::time::advance(Duration::from_secs(179)).await;
        cache.fetch(&key).await.unwrap();
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        cache.fetch(&key).await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_changing_a_parameter_fetches_again() {
        let source = Arc::new(FakeSource::with_books(30));
        let cache = cache_over(&source);

        cache.fetch(&QueryKey::user(1, Limit::PAGE_DEFAULT)).await.unwrap();
        cache.fetch(&QueryKey::user(2, Limit::PAGE_DEFAULT)).await.unwrap();
        cache
            .fetch(&QueryKey::user(2, Limit::choice(24).unwrap()))
            .await
            .unwrap();

        assert_eq!(source.calls(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_item_queries_hit_network_once() {
        let source = Arc::new(FakeSource::with_books(12));
        let cache = cache_over(&source);

        let first = QueryKey::items(&titles(&["Dune", "Emma"]), Limit::API_DEFAULT);
        let again = QueryKey::items(&titles(&["Dune", "Emma"]), Limit::API_DEFAULT);
        cache.fetch(&first).await.unwrap();
        cache.fetch(&again).await.unwrap();

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_are_coalesced() {
        let source = Arc::new(FakeSource::with_books(12));
        let cache = cache_over(&source);
        let key = QueryKey::global(Limit::PAGE_DEFAULT);

        let (a, b, c) = tokio::join!(cache.fetch(&key), cache.fetch(&key), cache.fetch(&key));

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(c.unwrap().len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_retried_then_cached() {
        let source = Arc::new(
            FakeSource::with_books(6).failing_with(vec![
                AppError::network("timeout"),
                AppError::server(503, "busy"),
            ]),
        );
        let cache = cache_over(&source);
        let key = QueryKey::global(Limit::choice(6).unwrap());

        let books = cache.fetch(&key).await.unwrap();
        assert_eq!(books.len(), 6);
        assert_eq!(source.calls(), 3);
        assert!(cache.peek_fresh(&key).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_surfaces_after_retries_and_is_not_cached() {
        let source = Arc::new(FakeSource::with_books(6).failing_with(vec![
            AppError::network("down"),
            AppError::network("down"),
            AppError::network("down"),
        ]));
        let cache = cache_over(&source);
        let key = QueryKey::global(Limit::API_DEFAULT);

        let err = cache.fetch(&key).await.unwrap_err();
        assert!(matches!(*err, AppError::Network(_)));
        assert_eq!(source.calls(), 3);

        // Failures are not cached: the next request goes out again.
        cache.fetch(&key).await.unwrap();
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_error_is_not_retried() {
        let source = Arc::new(FakeSource::with_books(6));
        let cache = cache_over(&source);

        let err = cache
            .fetch(&QueryKey::user(0, Limit::API_DEFAULT))
            .await
            .unwrap_err();
        assert!(matches!(*err, AppError::Validation(_)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_after_invalidate_is_discarded() {
        let source = Arc::new(FakeSource::with_books(12));
        let cache = cache_over(&source);
        let key = QueryKey::global(Limit::PAGE_DEFAULT);

        let pending = cache.fetch(&key);
        futures::pin_mut!(pending);
        assert!(futures::poll!(pending.as_mut()).is_pending());

        cache.invalidate(&key);
        let late = pending.await.unwrap();
        assert_eq!(late.len(), 12);
        assert!(cache.peek(&key).is_none());

        // The next request starts over instead of joining the detached fetch.
        cache.fetch(&key).await.unwrap();
        assert_eq!(source.calls(), 2);
        assert!(cache.peek_fresh(&key).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_entries_are_evicted_on_insert() {
        let source = Arc::new(FakeSource::with_books(12));
        let cache = cache_over(&source);
        let global = QueryKey::global(Limit::API_DEFAULT);

        cache.fetch(&global).await.unwrap();
        tokio::time::advance(Duration::from_secs(200)).await;
        cache.fetch(&QueryKey::user(1, Limit::API_DEFAULT)).await.unwrap();
        assert_eq!(cache.len(), 2);

        // Global is now past the gc window, user 1 is not.
        tokio::time::advance(Duration::from_secs(150)).await;
        cache.fetch(&QueryKey::user(2, Limit::API_DEFAULT)).await.unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.peek(&global).is_none());
        assert!(cache.peek(&QueryKey::user(1, Limit::API_DEFAULT)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_drops_everything() {
        let source = Arc::new(FakeSource::with_books(12));
        let cache = cache_over(&source);

        cache.fetch(&QueryKey::global(Limit::API_DEFAULT)).await.unwrap();
        cache.fetch(&QueryKey::user(3, Limit::API_DEFAULT)).await.unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
