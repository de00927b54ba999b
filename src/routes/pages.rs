//! Page routes: repository-shaped page and zone-list endpoints plus the
//! page management services.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use canvas::consts::MIN_ZONE_SIZE;
use canvas::doc::{LayoutId, Page, PageId, PageSnapshot, ProjectId, Zone, ZoneParent};
use canvas::page_builder::PageBuilder;
use canvas::validate::validate_zone;
use serde::Deserialize;

use super::ApiError;
use crate::services::layout::TemplateZone;
use crate::services::page;
use crate::services::zone::{self, ZoneError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AddPageBody {
    #[serde(default)]
    pub layout_slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderBody {
    pub page_ids: Vec<PageId>,
}

/// One entry per page to create; `null` is a blank page.
#[derive(Debug, Deserialize)]
pub struct PlanBody {
    pub layouts: Vec<Option<LayoutId>>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyLayoutBody {
    pub layout_id: LayoutId,
}

// =============================================================================
// PROJECT PAGES
// =============================================================================

/// `GET /api/projects/{id}/pages`: pages ordered by number.
pub async fn list_pages(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<Page>>, ApiError> {
    Ok(Json(state.repo.list_pages(project_id).await?))
}

/// `POST /api/projects/{id}/pages`: append a page, optionally from a layout slug.
pub async fn add_page(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<AddPageBody>,
) -> Result<(StatusCode, Json<Page>), ApiError> {
    let page = page::add_page(state.repo.as_ref(), project_id, body.layout_slug.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

/// `PUT /api/projects/{id}/pages/order`
pub async fn reorder_pages(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Vec<Page>>, ApiError> {
    Ok(Json(page::reorder_pages(state.repo.as_ref(), project_id, &body.page_ids).await?))
}

/// `POST /api/projects/{id}/pages/plan`: create pages from a page-builder plan.
pub async fn materialize_plan(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<PlanBody>,
) -> Result<(StatusCode, Json<Vec<Page>>), ApiError> {
    let plan = PageBuilder::from_layouts(body.layouts);
    let layouts = state.repo.fetch_layouts().await?;
    let pages = page::materialize_plan(state.repo.as_ref(), project_id, &plan, &layouts).await?;
    Ok((StatusCode::CREATED, Json(pages)))
}

/// `DELETE /api/projects/{id}/pages/{page_id}`: delete and renumber.
pub async fn remove_page(
    State(state): State<AppState>,
    Path((project_id, page_id)): Path<(ProjectId, PageId)>,
) -> Result<Json<Vec<Page>>, ApiError> {
    Ok(Json(page::delete_page(state.repo.as_ref(), project_id, page_id).await?))
}

// =============================================================================
// SINGLE PAGE
// =============================================================================

/// `GET /api/pages/{id}`: the page with its zones and elements.
pub async fn get_page(State(state): State<AppState>, Path(id): Path<PageId>) -> Result<Json<PageSnapshot>, ApiError> {
    Ok(Json(state.repo.fetch_page(id).await?))
}

/// `PUT /api/pages/{id}`: create or replace the page row.
pub async fn save_page(
    State(state): State<AppState>,
    Path(id): Path<PageId>,
    Json(body): Json<Page>,
) -> Result<StatusCode, ApiError> {
    if body.id != id {
        return Err(ApiError::bad_request("page id in body does not match path"));
    }
    if body.page_number < 1 {
        return Err(ApiError::bad_request("page_number must be at least 1"));
    }
    state.repo.save_page(&body).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/pages/{id}`: delete and renumber the rest of the project.
/// A project's last page is refused with 409.
pub async fn delete_page(State(state): State<AppState>, Path(id): Path<PageId>) -> Result<StatusCode, ApiError> {
    let project_id = state.repo.fetch_page(id).await?.page.project_id;
    page::delete_page(state.repo.as_ref(), project_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/pages/{id}/zones`: atomically replace every zone on the page.
pub async fn replace_zones(
    State(state): State<AppState>,
    Path(id): Path<PageId>,
    Json(body): Json<Vec<Zone>>,
) -> Result<StatusCode, ApiError> {
    for zone in &body {
        if zone.parent() != Some(ZoneParent::Page(id)) {
            return Err(ApiError::bad_request(format!("zone {} does not belong to page {id}", zone.id)));
        }
        validate_zone(zone, MIN_ZONE_SIZE).map_err(ZoneError::from)?;
    }
    state.repo.replace_page_zones(id, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/pages/{id}/zones`: add a zone after the page's existing ones.
pub async fn create_zone(
    State(state): State<AppState>,
    Path(id): Path<PageId>,
    Json(body): Json<TemplateZone>,
) -> Result<(StatusCode, Json<Zone>), ApiError> {
    let zone = zone::create_zone(state.repo.as_ref(), ZoneParent::Page(id), body.rect(), body.zone_type).await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

/// `POST /api/pages/{id}/layout`: replace the page's zones with a layout's.
pub async fn apply_layout(
    State(state): State<AppState>,
    Path(id): Path<PageId>,
    Json(body): Json<ApplyLayoutBody>,
) -> Result<Json<Vec<Zone>>, ApiError> {
    let layout = state.repo.fetch_layout(body.layout_id).await?;
    Ok(Json(zone::apply_layout_to_page(state.repo.as_ref(), id, &layout).await?))
}
