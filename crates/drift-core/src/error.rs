#![allow(non_snake_case)]
use crate::View;
use std::panic::{AssertUnwindSafe, catch_unwind};

#[derive(Debug, thiserror::Error)]
pub enum DriftError {
    #[error("composition was already disposed")]
    Disposed,
    #[error("compose() called while another composition is running")]
    Reentrant,
}

pub struct ErrorInfo {
    pub message: String,
}

/// Catches a panic raised while building `content` and renders `fallback`
/// in its place.
pub fn ErrorBoundary(fallback: impl Fn(ErrorInfo) -> View, content: impl FnOnce() -> View) -> View {
    match catch_unwind(AssertUnwindSafe(content)) {
        Ok(view) => view,
        Err(err) => {
            let message = if let Some(s) = err.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = err.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic".to_string()
            };
            log::error!("ErrorBoundary caught: {message}");
            fallback(ErrorInfo { message })
        }
    }
}
