//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into axum handlers via the `State` extractor. It
//! holds the repository behind an `Arc<dyn Repository>` so the same router
//! runs against Postgres in production and memory in development and tests.

use std::sync::Arc;

use crate::repo::Repository;

/// Shared application state, injected into axum handlers via State extractor.
/// Clone is required by axum; the repository is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
}

impl AppState {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }
}
