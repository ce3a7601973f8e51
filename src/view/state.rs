//! What a page shows for a query state.

use std::sync::Arc;

use crate::models::Book;
use crate::query::QueryState;

/// Message shown when a query succeeded with zero books.
pub const EMPTY_MESSAGE: &str = "No recommendations found";

/// Displayable outcome of a query.
#[derive(Debug, Clone)]
pub enum ViewState {
    /// The query has not been enabled yet; the page shows its prompt.
    Idle,
    /// Placeholders while the first answer is pending.
    Loading,
    /// Answer arrived but holds no books.
    Empty,
    /// Failure text from the layer that failed.
    Error(String),
    Ready(Arc<Vec<Book>>),
}

impl ViewState {
    /// Derive the view from a hook's state.
    ///
    /// Errors win over data, and data (even stale) wins over the loading
    /// placeholder.
    pub fn from_query(state: &QueryState) -> Self {
        if let Some(err) = &state.error {
            return Self::Error(err.to_string());
        }
        match &state.data {
            Some(books) if books.is_empty() => Self::Empty,
            Some(books) => Self::Ready(Arc::clone(books)),
            None if state.is_loading => Self::Loading,
            None => Self::Idle,
        }
    }

    pub fn books(&self) -> &[Book] {
        match self {
            Self::Ready(books) => books.as_slice(),
            _ => &[],
        }
    }
}

impl From<&QueryState> for ViewState {
    fn from(state: &QueryState) -> Self {
        Self::from_query(state)
    }
}
