//! Query hooks: the page-facing view of the cache.
//!
//! A [`QueryHook`] follows one logical query whose parameters change over
//! time (a limit selector, a user id field, a list of titles). It exposes
//! `{data, is_loading, error}` and ignores answers for parameters it no
//! longer follows.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AppError;
use crate::models::{Book, Limit};
use crate::query::{QueryCache, QueryKey};

/// What a hook currently shows.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub data: Option<Arc<Vec<Book>>>,
    pub is_loading: bool,
    pub error: Option<Arc<AppError>>,
}

impl QueryState {
    fn loading(data: Option<Arc<Vec<Book>>>) -> Self {
        Self {
            data,
            is_loading: true,
            error: None,
        }
    }

    fn success(data: Arc<Vec<Book>>) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
            error: None,
        }
    }

    fn failed(error: Arc<AppError>) -> Self {
        Self {
            data: None,
            is_loading: false,
            error: Some(error),
        }
    }

    /// Books to display, empty while nothing has arrived.
    pub fn books(&self) -> &[Book] {
        self.data.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Neither loading nor answered nor failed.
    pub fn is_idle(&self) -> bool {
        !self.is_loading && self.data.is_none() && self.error.is_none()
    }
}

/// Parameters a hook is pointed at.
#[derive(Debug, Clone)]
pub enum QueryTarget {
    /// Preconditions missing: the hook does not run.
    Disabled,
    /// Parameters rejected locally: the hook reports the error and does not run.
    Invalid(Arc<AppError>),
    /// A runnable query.
    Query(QueryKey),
}

impl QueryTarget {
    /// Trending books; always runnable.
    pub fn global(limit: Limit) -> Self {
        Self::Query(QueryKey::global(limit))
    }

    /// Personalized books; disabled without a user, invalid for ids <= 0.
    pub fn user(user_id: Option<i64>, limit: Limit) -> Self {
        match user_id {
            None => Self::Disabled,
            Some(id) if id <= 0 => Self::Invalid(Arc::new(AppError::validation(format!(
                "User ID must be a positive integer, got {id}"
            )))),
            Some(id) => Self::Query(QueryKey::user(id, limit)),
        }
    }

    /// Similar books; disabled until at least one title is present.
    pub fn items(titles: &[String], limit: Limit) -> Self {
        if titles.is_empty() {
            Self::Disabled
        } else {
            Self::Query(QueryKey::items(titles, limit))
        }
    }

    pub fn key(&self) -> Option<&QueryKey> {
        match self {
            Self::Query(key) => Some(key),
            _ => None,
        }
    }

    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Disabled, Self::Disabled) => true,
            (Self::Invalid(a), Self::Invalid(b)) => a.to_string() == b.to_string(),
            (Self::Query(a), Self::Query(b)) => a == b,
            _ => false,
        }
    }
}

struct Observed {
    target: QueryTarget,
    state: QueryState,
}

/// One page's subscription to the cache.
pub struct QueryHook {
    cache: Arc<QueryCache>,
    observed: Mutex<Observed>,
}

impl QueryHook {
    /// Create a hook that starts disabled.
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self {
            cache,
            observed: Mutex::new(Observed {
                target: QueryTarget::Disabled,
                state: QueryState::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Observed> {
        self.observed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Point the hook at new parameters.
    ///
    /// Returns `true` when the target changed, which means the caller should
    /// [`refresh`](Self::refresh).
    pub fn set(&self, target: QueryTarget) -> bool {
        let mut observed = self.lock();
        if observed.target.same_as(&target) {
            return false;
        }

        observed.state = match &target {
            QueryTarget::Disabled => QueryState::default(),
            QueryTarget::Invalid(err) => QueryState::failed(Arc::clone(err)),
            QueryTarget::Query(key) => match self.cache.peek_fresh(key) {
                Some(data) => QueryState::success(data),
                None => QueryState::loading(self.cache.peek(key)),
            },
        };
        observed.target = target;
        true
    }

    /// Run the current target through the cache and return the new state.
    ///
    /// If the target changes while the fetch is pending, the answer is
    /// dropped and the state of the newer target is returned instead.
    pub async fn refresh(&self) -> QueryState {
        let key = {
            let mut observed = self.lock();
            let Some(key) = observed.target.key().cloned() else {
                return observed.state.clone();
            };
            let previous = observed.state.data.take();
            observed.state = QueryState::loading(previous);
            key
        };

        let result = self.cache.fetch(&key).await;

        let mut observed = self.lock();
        if observed.target.key() != Some(&key) {
            log::debug!("dropping answer for {}, hook moved on", key);
            return observed.state.clone();
        }

        observed.state = match result {
            Ok(books) => QueryState::success(books),
            Err(err) => {
                log::warn!("{} failed: {}", key, err);
                QueryState::failed(err)
            }
        };
        observed.state.clone()
    }

    /// Point the hook at `target` and run it.
    pub async fn load(&self, target: QueryTarget) -> QueryState {
        self.set(target);
        self.refresh().await
    }

    /// Current state without fetching.
    pub fn state(&self) -> QueryState {
        self.lock().state.clone()
    }

    pub fn target(&self) -> QueryTarget {
        self.lock().target.clone()
    }

    /// Mark the current target stale in the cache.
    pub fn invalidate(&self) {
        if let Some(key) = self.lock().target.key() {
            self.cache.invalidate(key);
        }
    }
}
