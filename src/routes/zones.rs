//! Zone routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use canvas::consts::MIN_ZONE_SIZE;
use canvas::doc::{PartialZone, Zone, ZoneId};
use canvas::validate::validate_zone;

use super::ApiError;
use crate::services::zone::{self, ZoneError};
use crate::state::AppState;

/// `POST /api/zones`: store a zone built by the client, id and index included.
pub async fn create_zone(
    State(state): State<AppState>,
    Json(body): Json<Zone>,
) -> Result<(StatusCode, Json<Zone>), ApiError> {
    let mut zone = body;
    zone.set_rect(zone.rect().rounded());
    validate_zone(&zone, MIN_ZONE_SIZE).map_err(ZoneError::from)?;
    state.repo.create_zone(&zone).await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

/// `GET /api/zones/{id}`
pub async fn get_zone(State(state): State<AppState>, Path(id): Path<ZoneId>) -> Result<Json<Zone>, ApiError> {
    Ok(Json(state.repo.fetch_zone(id).await?))
}

/// `PATCH /api/zones/{id}`: sparse geometry/type update, validated after merging.
pub async fn update_zone(
    State(state): State<AppState>,
    Path(id): Path<ZoneId>,
    Json(body): Json<PartialZone>,
) -> Result<Json<Zone>, ApiError> {
    Ok(Json(zone::update_zone(state.repo.as_ref(), id, body).await?))
}

/// `DELETE /api/zones/{id}`: the zone's element goes with it.
pub async fn delete_zone(State(state): State<AppState>, Path(id): Path<ZoneId>) -> Result<StatusCode, ApiError> {
    zone::delete_zone(state.repo.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
