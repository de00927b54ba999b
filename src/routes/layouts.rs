//! Layout template routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use canvas::consts::MIN_ZONE_SIZE;
use canvas::doc::{Layout, LayoutId, ZoneParent};
use canvas::validate::validate_zone;
use serde::Deserialize;

use super::ApiError;
use crate::repo::RepoError;
use crate::services::layout::{self, LayoutError, LayoutPatch, NewLayout};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListLayoutsQuery {
    /// Only layouts offered to users.
    #[serde(default)]
    pub active: bool,
}

/// `GET /api/layouts`: every layout, or only active ones with `?active=true`.
pub async fn list_layouts(
    State(state): State<AppState>,
    Query(query): Query<ListLayoutsQuery>,
) -> Result<Json<Vec<Layout>>, ApiError> {
    let layouts = if query.active {
        layout::list_active_layouts(state.repo.as_ref()).await?
    } else {
        layout::list_all_layouts(state.repo.as_ref()).await?
    };
    Ok(Json(layouts))
}

/// `POST /api/layouts`: create a custom layout from template zones.
pub async fn create_layout(
    State(state): State<AppState>,
    Json(body): Json<NewLayout>,
) -> Result<(StatusCode, Json<Layout>), ApiError> {
    let layout = layout::create_layout(state.repo.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(layout)))
}

/// `GET /api/layouts/{id}`
pub async fn get_layout(State(state): State<AppState>, Path(id): Path<LayoutId>) -> Result<Json<Layout>, ApiError> {
    Ok(Json(state.repo.fetch_layout(id).await?))
}

/// `GET /api/layouts/by-slug/{slug}`
pub async fn get_layout_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Layout>, ApiError> {
    Ok(Json(state.repo.fetch_layout_by_slug(&slug).await?))
}

/// `PUT /api/layouts/{id}`: store a whole layout as sent, zones included.
/// A system layout keeps its slug and its system flag.
pub async fn save_layout(
    State(state): State<AppState>,
    Path(id): Path<LayoutId>,
    Json(body): Json<Layout>,
) -> Result<StatusCode, ApiError> {
    if body.id != id {
        return Err(ApiError::bad_request("layout id in body does not match path"));
    }
    if !layout::is_valid_slug(&body.slug) {
        return Err(LayoutError::InvalidSlug(body.slug).into());
    }
    for zone in &body.zones {
        if zone.parent() != Some(ZoneParent::Layout(id)) {
            return Err(ApiError::bad_request(format!("zone {} does not belong to layout {id}", zone.id)));
        }
        validate_zone(zone, MIN_ZONE_SIZE).map_err(LayoutError::from)?;
    }
    match state.repo.fetch_layout(id).await {
        Ok(stored) if stored.is_system && (!body.is_system || body.slug != stored.slug) => {
            return Err(LayoutError::SystemLayout(stored.slug).into());
        }
        Ok(_) | Err(RepoError::NotFound { .. }) => {}
        Err(e) => return Err(e.into()),
    }
    state.repo.save_layout(&body).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/layouts/{id}`: sparse metadata update; `zones` replaces the template.
pub async fn update_layout(
    State(state): State<AppState>,
    Path(id): Path<LayoutId>,
    Json(body): Json<LayoutPatch>,
) -> Result<Json<Layout>, ApiError> {
    Ok(Json(layout::update_layout(state.repo.as_ref(), id, body).await?))
}

/// `DELETE /api/layouts/{id}`: system layouts are refused with 409.
pub async fn delete_layout(State(state): State<AppState>, Path(id): Path<LayoutId>) -> Result<StatusCode, ApiError> {
    layout::delete_layout(state.repo.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
