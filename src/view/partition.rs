//! Display buckets derived from one result list.
//!
//! ```text
//! index:  0   1 ... 9 | 10 ... 19 | 20 ...
//!         ^featured
//!         [ trending ] [new arrivals] [remaining]
//! top rated: first 10 books rated >= 4.5, anywhere in the list
//! ```

use crate::models::Book;

/// Minimum average rating for the top rated bucket.
pub const TOP_RATED_THRESHOLD: f64 = 4.5;

/// Size of the trending, top rated and new arrivals buckets.
pub const BUCKET_SIZE: usize = 10;

/// Named views into a book list. Every bucket borrows from the source and
/// keeps its order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buckets<'a> {
    pub featured: Option<&'a Book>,
    pub trending: &'a [Book],
    pub top_rated: TopRated<'a>,
    pub new_arrivals: &'a [Book],
    pub remaining: &'a [Book],
}

/// Up to [`BUCKET_SIZE`] books rated at least [`TOP_RATED_THRESHOLD`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopRated<'a> {
    source: &'a [Book],
}

impl<'a> TopRated<'a> {
    pub fn iter(self) -> impl Iterator<Item = &'a Book> {
        self.source
            .iter()
            .filter(|b| b.rated_at_least(TOP_RATED_THRESHOLD))
            .take(BUCKET_SIZE)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn to_vec(&self) -> Vec<&'a Book> {
        self.iter().collect()
    }
}

/// Split a result list into display buckets.
pub fn partition(books: &[Book]) -> Buckets<'_> {
    let head = books.len().min(BUCKET_SIZE);
    let middle = books.len().min(2 * BUCKET_SIZE);

    Buckets {
        featured: books.first(),
        trending: &books[..head],
        top_rated: TopRated { source: books },
        new_arrivals: &books[head..middle],
        remaining: &books[middle..],
    }
}

impl Buckets<'_> {
    /// Whether there is nothing to show at all.
    pub fn is_empty(&self) -> bool {
        self.featured.is_none()
    }
}
