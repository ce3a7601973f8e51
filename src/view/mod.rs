//! Framework-independent view logic.
//!
//! - `partition`: split one result list into display buckets
//! - `selection`: titles picked on the similar-books page
//! - `state`: idle / loading / empty / error / ready
//! - `boundary`: catch render failures and show a fallback
//! - `route`: path to page resolution

pub mod boundary;
pub mod partition;
pub mod route;
pub mod selection;
pub mod state;

pub use boundary::{Fallback, guard, guard_async};
pub use partition::{Buckets, TopRated, partition};
pub use route::Route;
pub use selection::{Selection, SelectionState};
pub use state::ViewState;
