//! Titles picked on the similar-books page.

/// Whether any title is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    Populated,
}

/// Ordered set of titles, unique by exact match.
///
/// Lives for one page visit only. Every mutation reports whether the
/// content changed so the page knows when to fetch again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    titles: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        if self.titles.is_empty() {
            SelectionState::Empty
        } else {
            SelectionState::Populated
        }
    }

    /// Add a title typed by the user.
    ///
    /// Surrounding whitespace is trimmed; blank input and titles already
    /// present (case-sensitive) are ignored.
    pub fn add(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() || self.contains(title) {
            return false;
        }
        self.titles.push(title.to_string());
        true
    }

    /// Remove a title if present, matching the way [`add`](Self::add) trims.
    pub fn remove(&mut self, title: &str) -> bool {
        let title = title.trim();
        let before = self.titles.len();
        self.titles.retain(|t| t != title);
        self.titles.len() != before
    }

    /// Remove every title.
    pub fn clear(&mut self) -> bool {
        let changed = !self.titles.is_empty();
        self.titles.clear();
        changed
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t == title)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
