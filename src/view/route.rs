//! Client-side routes.

use std::fmt;

/// Page a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`: trending recommendations
    Home,
    /// `/user`: personalized recommendations
    User,
    /// `/similar`: books similar to picked titles
    Similar,
    /// Anything else
    NotFound,
}

impl Route {
    /// Resolve a path. Query strings, fragments and a trailing slash are
    /// ignored.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let path = path.trim_end_matches('/');

        match path {
            "" => Self::Home,
            "/user" => Self::User,
            "/similar" => Self::Similar,
            _ => Self::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::User => "/user",
            Self::Similar => "/similar",
            Self::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Trending Recommendations",
            Self::User => "User Recommendations",
            Self::Similar => "Similar Books",
            Self::NotFound => "Page Not Found",
        }
    }

    /// Routes shown in the navigation header.
    pub fn navigation() -> [Route; 3] {
        [Self::Home, Self::User, Self::Similar]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
