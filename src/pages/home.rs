//! Trending page.

use std::sync::Arc;

use crate::models::Limit;
use crate::query::{QueryCache, QueryHook, QueryTarget};
use crate::view::ViewState;

/// Global recommendations with a limit selector.
pub struct HomePage {
    hook: QueryHook,
    limit: Limit,
}

impl HomePage {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        let page = Self {
            hook: QueryHook::new(cache),
            limit: Limit::PAGE_DEFAULT,
        };
        page.hook.set(page.target());
        page
    }

    fn target(&self) -> QueryTarget {
        QueryTarget::global(self.limit)
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    /// Change the limit. Returns `true` if a new query is needed.
    pub fn set_limit(&mut self, limit: Limit) -> bool {
        self.limit = limit;
        self.hook.set(self.target())
    }

    /// Fetch (or reuse) the books for the current limit.
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
