//! Element routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use canvas::doc::{Element, ElementId, ElementPatch};
use tracing::debug;

use super::ApiError;
use crate::repo::http::PutElementResponse;
use crate::services::zone;
use crate::state::AppState;

/// `PUT /api/elements`: place an element in its zone, returning the one it displaced.
pub async fn put_element(
    State(state): State<AppState>,
    Json(body): Json<Element>,
) -> Result<Json<PutElementResponse>, ApiError> {
    let displaced = state.repo.put_element(&body).await?;
    if let Some(old) = &displaced {
        debug!(zone_id = %body.zone_id, displaced = %old.id, "element displaced");
    }
    Ok(Json(PutElementResponse { displaced }))
}

/// `PATCH /api/elements/{id}`: merge content and style fields.
pub async fn update_element(
    State(state): State<AppState>,
    Path(id): Path<ElementId>,
    Json(body): Json<ElementPatch>,
) -> Result<Json<Element>, ApiError> {
    Ok(Json(zone::update_element(state.repo.as_ref(), id, body).await?))
}

/// `DELETE /api/elements/{id}`
pub async fn delete_element(State(state): State<AppState>, Path(id): Path<ElementId>) -> Result<StatusCode, ApiError> {
    zone::delete_element(state.repo.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
