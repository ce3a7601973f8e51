//! Pages and the navigation session that owns them.
//!
//! All pages of a session share one [`QueryCache`]; page state (user id,
//! selected titles, limit) is created fresh on every navigation.

pub mod home;
pub mod similar;
pub mod user;

use std::sync::Arc;

use crate::query::QueryCache;
use crate::view::{Route, ViewState};

pub use home::HomePage;
pub use similar::SimilarPage;
pub use user::UserPage;

/// The page currently on screen.
pub enum Page {
    Home(HomePage),
    User(UserPage),
    Similar(SimilarPage),
    NotFound,
}

impl Page {
    fn for_route(route: Route, cache: Arc<QueryCache>) -> Self {
        match route {
            Route::Home => Self::Home(HomePage::new(cache)),
            Route::User => Self::User(UserPage::new(cache)),
            Route::Similar => Self::Similar(SimilarPage::new(cache)),
            Route::NotFound => Self::NotFound,
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Self::Home(_) => Route::Home,
            Self::User(_) => Route::User,
            Self::Similar(_) => Route::Similar,
            Self::NotFound => Route::NotFound,
        }
    }

    /// Fetch what the page needs and return its view.
    pub async fn load(&self) -> ViewState {
        match self {
            Self::Home(page) => page.load().await,
            Self::User(page) => page.load().await,
            Self::Similar(page) => page.load().await,
            Self::NotFound => ViewState::Idle,
        }
    }

    /// Mark the page's current query stale.
    pub fn invalidate(&self) {
        match self {
            Self::Home(page) => page.invalidate(),
            Self::User(page) => page.invalidate(),
            Self::Similar(page) => page.invalidate(),
            Self::NotFound => {}
        }
    }

    /// Prompt shown while the page's query is not enabled.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Self::User(_) => Some(user::PROMPT),
            Self::Similar(_) => Some(similar::PROMPT),
            Self::Home(_) | Self::NotFound => None,
        }
    }
}

/// One user's navigation through the app.
pub struct Session {
    cache: Arc<QueryCache>,
    page: Page,
}

impl Session {
    /// Start on the home page.
    pub fn new(cache: Arc<QueryCache>) -> Self {
        let page = Page::for_route(Route::Home, Arc::clone(&cache));
        Self { cache, page }
    }

    /// Go to a path. Page state is reset even when the route is the same.
    pub fn navigate(&mut self, path: &str) -> Route {
        let route = Route::parse(path);
        log::debug!("navigating to {} ({:?})", path, route);
        self.page = Page::for_route(route, Arc::clone(&self.cache));
        route
    }

    pub fn route(&self) -> Route {
        self.page.route()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }
}
