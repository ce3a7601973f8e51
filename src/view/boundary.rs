//! Top-level failure boundary.
//!
//! Wraps a render closure or future. A panic below the boundary is caught
//! and the whole output is replaced by a [`Fallback`]; nothing that was
//! rendered before the panic is kept.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

use crate::error::AppError;

/// Generic failure notice shown instead of the crashed view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub message: String,
}

impl Fallback {
    pub const TITLE: &'static str = "Something went wrong";
    pub const HINT: &'static str =
        "We're sorry, but an unexpected error occurred. Please run the command again to reload.";

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        log::error!("Uncaught error: {}", message);
        Self { message }
    }

    /// Lines of the failure notice.
    pub fn lines(&self) -> Vec<String> {
        vec![
            Self::TITLE.to_string(),
            Self::HINT.to_string(),
            format!("Error: {}", self.message),
        ]
    }
}

impl From<Fallback> for AppError {
    fn from(fallback: Fallback) -> Self {
        AppError::unknown(fallback.message)
    }
}

/// Run `render`, substituting a [`Fallback`] if it panics.
pub fn guard<R>(render: impl FnOnce() -> R) -> Result<R, Fallback> {
    panic::catch_unwind(AssertUnwindSafe(render)).map_err(Fallback::from_panic)
}

/// Await `view`, substituting a [`Fallback`] if it panics while polled.
pub async fn guard_async<F: Future>(view: F) -> Result<F::Output, Fallback> {
    AssertUnwindSafe(view)
        .catch_unwind()
        .await
        .map_err(Fallback::from_panic)
}
