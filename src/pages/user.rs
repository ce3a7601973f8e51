//! Personalized recommendations page.

use std::sync::Arc;

use crate::models::{Limit, parse_user_id};
use crate::query::{QueryCache, QueryHook, QueryTarget};
use crate::view::ViewState;

pub const PROMPT: &str = "Enter a User ID to see personalized recommendations";

/// Recommendations for one user id typed into a search field.
pub struct UserPage {
    hook: QueryHook,
    user_id: Option<i64>,
    limit: Limit,
}

impl UserPage {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self {
            hook: QueryHook::new(cache),
            user_id: None,
            limit: Limit::PAGE_DEFAULT,
        }
    }

    fn target(&self) -> QueryTarget {
        QueryTarget::user(self.user_id, self.limit)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    /// Handle the search field.
    ///
    /// Input that is not a positive integer is ignored and the previous
    /// user stays selected. Returns `true` if a new query is needed.
    pub fn search(&mut self, input: &str) -> bool {
        match parse_user_id(input) {
            Some(id) => self.set_user(Some(id)),
            None => {
                log::debug!("ignoring user id input {:?}", input);
                false
            }
        }
    }

    /// Set the user id directly. Non-positive ids surface a validation error.
    pub fn set_user(&mut self, user_id: Option<i64>) -> bool {
        self.user_id = user_id;
        self.hook.set(self.target())
    }

    pub fn set_limit(&mut self, limit: Limit) -> bool {
        self.limit = limit;
        self.hook.set(self.target())
    }

    pub async fn load(&self) -> ViewState {
        ViewState::from(&self.hook.refresh().await)
    }

    pub fn view(&self) -> ViewState {
        ViewState::from(&self.hook.state())
    }

    /// Force the next load to refetch.
    pub fn invalidate(&self) {
        self.hook.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::cache::testing::FakeSource;
    use crate::services::RecommendationSource;

    fn page_with(source: &Arc<FakeSource>) -> UserPage {
        let cache = QueryCache::new(Arc::clone(source) as Arc<dyn RecommendationSource>);
        UserPage::new(Arc::new(cache))
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_until_user_given() {
        let source = Arc::new(FakeSource::with_books(20));
        let page = page_with(&source);

        assert!(matches!(page.load().await, ViewState::Idle));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_ignores_bad_input() {
        let source = Arc::new(FakeSource::with_books(20));
        let mut page = page_with(&source);

        assert!(page.search("3"));
        assert!(!page.search("abc"));
        assert!(!page.search("-1"));
        assert_eq!(page.user_id(), Some(3));

        let view = page.load().await;
        assert!(view.books().iter().all(|b| b.score.is_some()));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_invalid_id_shows_validation_message() {
        let source = Arc::new(FakeSource::with_books(20));
        let mut page = page_with(&source);

        page.set_user(Some(0));
        match page.load().await {
            ViewState::Error(message) => assert!(message.starts_with("Validation error")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(source.calls(), 0);
    }
}
