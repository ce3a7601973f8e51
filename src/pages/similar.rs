//! Similar-books page.

use std::sync::Arc;

use crate::models::Limit;
use crate::query::{QueryCache, QueryHook, QueryTarget};
use crate::view::{Selection, ViewState};

pub const PROMPT: &str = "Add book titles to find similar recommendations";

/// Recommendations for a growing list of titles.
pub struct SimilarPage {
    hook: QueryHook,
    selection: Selection,
    limit: Limit,
}

impl SimilarPage {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self {
            hook: QueryHook::new(cache),
            selection: Selection::new(),
            limit: Limit::PAGE_DEFAULT,
        }
    }

    fn target(&self) -> QueryTarget {
        QueryTarget::items(self.selection.titles(), self.limit)
    }

    /// Re-point the hook after the selection or limit moved.
    fn sync(&self, changed: bool) -> bool {
        changed && self.hook.set(self.target())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    pub fn add(&mut self, title: &str) -> bool {
        let changed = self.selection.add(title);
        self.sync(changed)
    }

    pub fn remove(&mut self, title: &str) -> bool {
        let changed = self.selection.remove(title);
        self.sync(changed)
    }

    pub fn clear(&mut self) -> bool {
        let changed = self.selection.clear();
        self.sync(changed)
    }

    pub fn set_limit(&mut self, limit: Limit) -> bool {
        let changed = self.limit != limit;
        self.limit = limit;
        self.sync(changed)
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

    fn page_with(source: &Arc<FakeSource>) -> SimilarPage {
        let cache = QueryCache::new(Arc::clone(source) as Arc<dyn RecommendationSource>);
        SimilarPage::new(Arc::new(cache))
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_titles_no_request() {
        let source = Arc::new(FakeSource::with_books(20));
        let page = page_with(&source);

        let view = page.load().await;
        assert!(matches!(view, ViewState::Idle));
        assert!(view.books().is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_change_triggers_one_fetch() {
        let source = Arc::new(FakeSource::with_books(20));
        let mut page = page_with(&source);

        assert!(page.add("Dune"));
        assert_eq!(page.load().await.books().len(), 12);

        assert!(!page.add("Dune"));
        page.load().await;
        assert_eq!(source.calls(), 1);

        assert!(page.add("Emma"));
        page.load().await;
        assert_eq!(source.calls(), 2);

        // Back to a selection already fetched: served from cache.
        assert!(page.remove("Emma"));
        assert!(matches!(page.view(), ViewState::Ready(_)));
        page.load().await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_returns_to_prompt() {
        let source = Arc::new(FakeSource::with_books(20));
        let mut page = page_with(&source);

        page.add("Dune");
        page.add("Emma");
        page.load().await;

        assert!(page.clear());
        assert!(page.selection().is_empty());
        assert!(matches!(page.load().await, ViewState::Idle));
        assert_eq!(source.calls(), 1);
    }
}
