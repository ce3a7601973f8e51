//! Cache-aware recommendation queries.
//!
//! - `QueryKey`: identity of a cacheable query
//! - `RetryPolicy`: retry count and backoff for transient failures
//! - `QueryCache`: freshness windows, request coalescing, superseded-response discard
//! - `QueryHook`: per-page subscription exposing `{data, is_loading, error}`

pub mod cache;
pub mod hooks;
pub mod key;
pub mod retry;

pub use cache::{FetchResult, QueryCache};
pub use hooks::{QueryHook, QueryState, QueryTarget};
pub use key::QueryKey;
pub use retry::RetryPolicy;
