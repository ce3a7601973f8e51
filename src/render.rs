// src/render.rs

//! Text rendering of pages.
//!
//! Every function returns lines instead of printing so the output can be
//! checked in tests and wrapped by the failure boundary.

use crate::models::{Book, Limit};
use crate::pages::{Page, Session};
use crate::view::{Buckets, Fallback, Route, ViewState, guard, partition, state::EMPTY_MESSAGE};

const CARD_TEMPLATE: &str = "{title} · {authors} · ★ {rating} ({count} ratings)";

/// One line per book in a list.
pub fn book_card(rank: usize, book: &Book, show_score: bool) -> String {
    let mut line = format!("{:>3}. {}", rank, book.format(CARD_TEMPLATE));
    if show_score && book.score.is_some() {
        line.push_str(&book.format(" · Score: {score}"));
    }
    line
}

/// Full detail view for one book.
pub fn book_detail(book: &Book) -> Vec<String> {
    let mut lines = vec![book.title.clone(), format!("by {}", book.author_line())];

    if let (Some(rating), Some(tier)) = (book.average_rating, book.rating_tier()) {
        lines.push(format!("Rating: {:.1}/5 ({})", rating, tier.as_str()));
    }
    if let Some(count) = book.ratings_count {
        lines.push(format!("{} ratings", count));
    }
    if let Some(percent) = book.match_percent() {
        lines.push(format!("Match: {}%", percent));
    }
    if let Some(cover) = &book.thumbnail {
        lines.push(format!("Cover: {}", cover));
    }
    lines.push(String::new());
    lines.push(
        book.description
            .clone()
            .unwrap_or_else(|| "No description available.".to_string()),
    );
    lines
}

fn section(lines: &mut Vec<String>, title: &str, books: &[&Book], first_rank: usize, show_score: bool) {
    if books.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("── {} ──", title));
    for (offset, book) in books.iter().enumerate() {
        lines.push(book_card(first_rank + offset, book, show_score));
    }
}

/// Home page layout: featured book, then the buckets.
pub fn buckets(buckets: &Buckets<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(featured) = buckets.featured else {
        lines.push(EMPTY_MESSAGE.to_string());
        return lines;
    };

    lines.push(format!("Featured: {}", featured.format("{title} by {authors}")));
    if let Some(description) = &featured.description {
        lines.push(format!("  {}", description));
    }

    let trending: Vec<&Book> = buckets.trending.iter().collect();
    let new_arrivals: Vec<&Book> = buckets.new_arrivals.iter().collect();
    let remaining: Vec<&Book> = buckets.remaining.iter().collect();

    section(&mut lines, "Trending Now", &trending, 1, false);
    section(&mut lines, "Top Rated", &buckets.top_rated.to_vec(), 1, false);
    section(&mut lines, "New Arrivals", &new_arrivals, 11, false);
    section(&mut lines, "More Books", &remaining, 21, false);
    lines
}

/// Plain ranked list (user and similar pages).
pub fn grid(books: &[Book], show_score: bool) -> Vec<String> {
    books
        .iter()
        .enumerate()
        .map(|(i, book)| book_card(i + 1, book, show_score))
        .collect()
}

/// Lines for any view state of a page.
pub fn view(page: &Page, state: &ViewState) -> Vec<String> {
    match state {
        ViewState::Idle => match page.route() {
            Route::NotFound => not_found(),
            _ => vec![page.prompt().unwrap_or_default().to_string()],
        },
        ViewState::Loading => vec!["Loading recommendations…".to_string()],
        ViewState::Empty => vec![EMPTY_MESSAGE.to_string()],
        ViewState::Error(message) => vec![format!("Error: {}", message)],
        ViewState::Ready(books) => match page {
            Page::Home(_) => buckets(&partition(books)),
            Page::User(_) => grid(books, true),
            Page::Similar(_) | Page::NotFound => grid(books, false),
        },
    }
}

/// Status line describing the page parameters.
pub fn page_status(page: &Page) -> Option<String> {
    let limit_text = |limit: Limit| format!("{} books", limit);
    match page {
        Page::Home(home) => Some(limit_text(home.limit())),
        Page::User(user) => user
            .user_id()
            .map(|id| format!("User #{} · {}", id, limit_text(user.limit()))),
        Page::Similar(similar) if !similar.selection().is_empty() => Some(format!(
            "Selected Books ({}): {} · {}",
            similar.selection().len(),
            similar.selection().titles().join(", "),
            limit_text(similar.limit())
        )),
        Page::Similar(_) | Page::NotFound => None,
    }
}

/// Navigation header marking the active route.
pub fn navigation(session: &Session) -> String {
    Route::navigation()
        .iter()
        .map(|route| {
            if *route == session.route() {
                format!("[{}]", route.title())
            } else {
                route.title().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Whole screen for the active page: title, navigation, status and view.
pub fn screen(session: &Session, state: &ViewState) -> Vec<String> {
    let rule = "═".repeat(60);
    let mut lines = vec![
        String::new(),
        rule.clone(),
        format!("  {}", session.route().title()),
        rule,
        navigation(session),
    ];
    lines.extend(page_status(session.page()));
    lines.push("─".repeat(60));
    lines.extend(view(session.page(), state));
    lines
}

/// Render inside the failure boundary. A panic replaces every line with
/// the fallback notice.
pub fn guarded(render: impl FnOnce() -> Vec<String>) -> Vec<String> {
    guard(render).unwrap_or_else(|notice| fallback(&notice))
}

pub fn not_found() -> Vec<String> {
    vec![
        "404".to_string(),
        "The page you're looking for doesn't exist.".to_string(),
        format!("Go back to {}", Route::Home.path()),
    ]
}

pub fn fallback(fallback: &Fallback) -> Vec<String> {
    fallback.lines()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::sample_book;
    use crate::query::QueryCache;
    use crate::query::cache::testing::FakeSource;
    use crate::services::RecommendationSource;

    fn session() -> Session {
        let source: Arc<dyn RecommendationSource> = Arc::new(FakeSource::with_books(25));
        Session::new(Arc::new(QueryCache::new(source)))
    }

    #[test]
    fn test_book_card() {
        let mut book = sample_book(3, Some(4.5));
        book.score = Some(0.8765);
        assert_eq!(
            book_card(1, &book, false),
            "  1. Book 3 · Author · ★ 4.5 (10 ratings)"
        );
        assert!(book_card(1, &book, true).ends_with("Score: 0.88"));
    }

    #[test]
    fn test_book_detail() {
        let mut book = sample_book(0, Some(4.7));
        book.score = Some(0.5);
        let lines = book_detail(&book);
        assert!(lines.contains(&"Rating: 4.7/5 (excellent)".to_string()));
        assert!(lines.contains(&"Match: 50%".to_string()));
        assert_eq!(lines.last().unwrap(), "No description available.");
    }

    #[test]
    fn test_empty_buckets_render_nothing_found() {
        assert_eq!(buckets(&partition(&[])), vec![EMPTY_MESSAGE.to_string()]);
    }

    #[test]
    fn test_home_layout_sections() {
        let books: Vec<Book> = (0..25).map(|i| sample_book(i, Some(4.0))).collect();
        let lines = buckets(&partition(&books));

        assert!(lines[0].starts_with("Featured: Book 0"));
        assert!(lines.contains(&"── Trending Now ──".to_string()));
        assert!(!lines.contains(&"── Top Rated ──".to_string()));
        assert!(lines.iter().any(|l| l.starts_with(" 11. Book 10")));
        assert!(lines.iter().any(|l| l.starts_with(" 25. Book 24")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_states_for_pages() {
        let mut session = session();

        session.navigate("/user");
        let state = session.page().load().await;
        assert_eq!(
            view(session.page(), &state),
            vec![crate::pages::user::PROMPT.to_string()]
        );

        session.navigate("/missing");
        let state = session.page().load().await;
        assert_eq!(view(session.page(), &state)[0], "404");

        let error = ViewState::Error("Network error: refused".into());
        assert_eq!(view(session.page(), &error), vec!["Error: Network error: refused"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_screen_holds_header_and_view() {
        let session = session();
        let state = session.page().load().await;

        let lines = guarded(|| screen(&session, &state));
        assert_eq!(lines[2], "  Trending Recommendations");
        assert!(lines.contains(&"12 books".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("Featured: Book 0")));
    }

    #[test]
    fn test_panicking_render_leaves_only_the_fallback() {
        let lines = guarded(|| {
            let mut lines = vec!["  Trending Recommendations".to_string()];
            lines.extend(book_detail(&sample_book(0, None)));
            panic!("card exploded");
        });

        assert_eq!(lines, Fallback { message: "card exploded".into() }.lines());
        assert_eq!(lines[0], Fallback::TITLE);
        assert!(!lines.iter().any(|l| l.contains("Trending")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_positive_user_renders_validation_error() {
        let mut session = session();
        session.navigate("/user");
        if let Page::User(page) = session.page_mut() {
            page.set_user(Some(-1));
        }

        let state = session.page().load().await;
        let lines = view(session.page(), &state);
        assert!(lines[0].starts_with("Error: Validation error"));
    }

    #[test]
    fn test_navigation_marks_active_route() {
        let mut session = session();
        session.navigate("/similar");
        assert_eq!(
            navigation(&session),
            "Trending Recommendations  User Recommendations  [Similar Books]"
        );
    }
}
