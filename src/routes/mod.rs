//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API over the repository and the domain services. Two kinds of
//! endpoint live side by side:
//!
//! - repository-shaped endpoints (`PUT /api/elements`, `PUT /api/pages/{id}/zones`,
//!   ...) that `repo::http::HttpRepository` maps one-to-one onto trait
//!   operations, so a remote editor session persists through this router;
//! - service endpoints (`POST /api/projects/{id}/pages`, `PATCH /api/layouts/{id}`,
//!   ...) for page management and layout administration.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is an [`ApiError`]: a status plus an [`ErrorBody`] carrying
//! the error's code and message. Status mapping lives in one
//! `*_error_to_status` function per error enum.

pub mod elements;
pub mod layouts;
pub mod pages;
pub mod zones;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, patch, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ErrorBody, ErrorCode};
use crate::repo::RepoError;
use crate::services::layout::LayoutError;
use crate::services::page::PageError;
use crate::services::zone::ZoneError;
use crate::state::AppState;

// =============================================================================
// ROUTER
// =============================================================================

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/layouts", get(layouts::list_layouts).post(layouts::create_layout))
        .route("/api/layouts/by-slug/{slug}", get(layouts::get_layout_by_slug))
        .route(
            "/api/layouts/{id}",
            get(layouts::get_layout)
                .put(layouts::save_layout)
                .patch(layouts::update_layout)
                .delete(layouts::delete_layout),
        )
        .route("/api/projects/{id}/pages", get(pages::list_pages).post(pages::add_page))
        .route("/api/projects/{id}/pages/order", put(pages::reorder_pages))
        .route("/api/projects/{id}/pages/plan", post(pages::materialize_plan))
        .route("/api/projects/{id}/pages/{page_id}", delete(pages::remove_page))
        .route(
            "/api/pages/{id}",
            get(pages::get_page).put(pages::save_page).delete(pages::delete_page),
        )
        .route("/api/pages/{id}/zones", put(pages::replace_zones).post(pages::create_zone))
        .route("/api/pages/{id}/layout", post(pages::apply_layout))
        .route("/api/zones", post(zones::create_zone))
        .route(
            "/api/zones/{id}",
            get(zones::get_zone).patch(zones::update_zone).delete(zones::delete_zone),
        )
        .route("/api/elements", put(elements::put_element))
        .route(
            "/api/elements/{id}",
            patch(elements::update_element).delete(elements::delete_element),
        )
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error response: status plus `{code, message}` JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, err: &impl ErrorCode) -> Self {
        if status.is_server_error() {
            tracing::warn!(code = err.error_code(), error = %err, "request failed");
        }
        Self { status, body: ErrorBody::from_error(err) }
    }

    /// 400 for a request whose path and body disagree.
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody { code: "E_BAD_REQUEST".to_owned(), message: message.into() },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub(crate) fn repo_error_to_status(err: &RepoError) -> StatusCode {
    match err {
        RepoError::NotFound { .. } => StatusCode::NOT_FOUND,
        RepoError::Conflict(_) => StatusCode::CONFLICT,
        RepoError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RepoError::Transport(_) | RepoError::Remote { .. } => StatusCode::BAD_GATEWAY,
    }
}

pub(crate) fn zone_error_to_status(err: &ZoneError) -> StatusCode {
    match err {
        ZoneError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ZoneError::Repo(e) => repo_error_to_status(e),
    }
}

pub(crate) fn layout_error_to_status(err: &LayoutError) -> StatusCode {
    match err {
        LayoutError::InvalidSlug(_) | LayoutError::EmptyName | LayoutError::Validation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LayoutError::SlugTaken(_) | LayoutError::SystemLayout(_) => StatusCode::CONFLICT,
        LayoutError::Repo(e) => repo_error_to_status(e),
    }
}

pub(crate) fn page_error_to_status(err: &PageError) -> StatusCode {
    match err {
        PageError::LastPage => StatusCode::CONFLICT,
        PageError::NotInProject(_) | PageError::UnknownLayout(_) => StatusCode::NOT_FOUND,
        PageError::NotAPermutation => StatusCode::UNPROCESSABLE_ENTITY,
        PageError::Zone(e) => zone_error_to_status(e),
        PageError::Repo(e) => repo_error_to_status(e),
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        Self::new(repo_error_to_status(&err), &err)
    }
}

impl From<ZoneError> for ApiError {
    fn from(err: ZoneError) -> Self {
        Self::new(zone_error_to_status(&err), &err)
    }
}

impl From<LayoutError> for ApiError {
    fn from(err: LayoutError) -> Self {
        Self::new(layout_error_to_status(&err), &err)
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        Self::new(page_error_to_status(&err), &err)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
