//! Zone service: zone and element operations against a repository.
//!
//! DESIGN
//! ======
//! These are the server-side counterparts of the engine's local edits. Every
//! geometry value is rounded to the persisted precision before it is
//! validated or written, so what is stored is exactly what was checked.
//!
//! ERROR HANDLING
//! ==============
//! Validation failures are rejected before any write. Repository errors are
//! passed through unchanged; `NotFound` keeps its entity so the HTTP code is
//! specific (`E_ZONE_NOT_FOUND`, `E_PAGE_NOT_FOUND`).

use canvas::consts::MIN_ZONE_SIZE;
use canvas::doc::{
    Element, ElementContent, ElementId, ElementPatch, Layout, PageId, PartialZone, Zone, ZoneId, ZoneParent,
    ZoneType,
};
use canvas::geometry::Rect;
use canvas::validate::{ZoneValidationError, validate_fits_page, validate_partial, validate_zone};
use tracing::{debug, info, warn};

use crate::error::ErrorCode;
use crate::repo::{RepoError, Repository};

#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error(transparent)]
    Validation(#[from] ZoneValidationError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ErrorCode for ZoneError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Repo(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Repo(e) => e.retryable(),
        }
    }
}

// =============================================================================
// ZONES
// =============================================================================

/// Zones currently on `parent`.
async fn zones_on(repo: &dyn Repository, parent: ZoneParent) -> Result<Vec<Zone>, RepoError> {
    match parent {
        ZoneParent::Page(id) => Ok(repo.fetch_page(id).await?.zones),
        ZoneParent::Layout(id) => Ok(repo.fetch_layout(id).await?.zones),
    }
}

/// Create a zone on `parent` after the existing ones.
///
/// # Errors
///
/// `Validation` if the rounded rectangle is out of bounds, too small or
/// overflows the page; `Repo` if the parent is missing or the write fails.
pub async fn create_zone(
    repo: &dyn Repository,
    parent: ZoneParent,
    rect: Rect,
    zone_type: ZoneType,
) -> Result<Zone, ZoneError> {
    let existing = zones_on(repo, parent).await?;
    let zone_index = existing.iter().map(|z| z.zone_index + 1).max().unwrap_or(0);

    let zone = Zone::new(parent, zone_index, rect.rounded(), zone_type);
    validate_zone(&zone, MIN_ZONE_SIZE)?;
    repo.create_zone(&zone).await?;

    debug!(zone_id = %zone.id, zone_index, "zone created");
    Ok(zone)
}

/// Apply a sparse geometry/type update.
///
/// # Errors
///
/// `Validation` if a supplied field is out of range or the merged rectangle
/// overflows the page; `Repo` if the zone is missing or the write fails.
pub async fn update_zone(repo: &dyn Repository, zone_id: ZoneId, partial: PartialZone) -> Result<Zone, ZoneError> {
    let partial = partial.rounded();
    validate_partial(&partial, MIN_ZONE_SIZE)?;

    let mut merged = repo.fetch_zone(zone_id).await?;
    merged.apply_partial(&partial);
    validate_fits_page(merged.rect())?;

    Ok(repo.update_zone(zone_id, &partial).await?)
}

/// Delete a zone and whatever element it holds.
///
/// # Errors
///
/// `Repo` if the zone is missing or the delete fails.
pub async fn delete_zone(repo: &dyn Repository, zone_id: ZoneId) -> Result<(), ZoneError> {
    repo.delete_zone(zone_id).await?;
    debug!(%zone_id, "zone deleted");
    Ok(())
}

/// Replace every zone on a page with fresh copies of `layout`'s template
/// zones, re-indexed by order. Elements on the page are dropped. The layout
/// slug is recorded on the page afterwards; if that write fails the zones
/// stay applied and the failure is only logged.
///
/// # Errors
///
/// `Validation` if a template zone is invalid (nothing is written);
/// `Repo` if the page is missing or the replacement fails.
pub async fn apply_layout_to_page(repo: &dyn Repository, page_id: PageId, layout: &Layout) -> Result<Vec<Zone>, ZoneError> {
    let mut page = repo.fetch_page(page_id).await?.page;

    let zones: Vec<Zone> = layout
        .stamp(page_id)
        .into_iter()
        .map(|mut zone| {
            zone.set_rect(zone.rect().rounded());
            zone
        })
        .collect();
    for zone in &zones {
        validate_zone(zone, MIN_ZONE_SIZE)?;
    }

    repo.replace_page_zones(page_id, &zones).await?;

    page.layout_slug = Some(layout.slug.clone());
    if let Err(e) = repo.save_page(&page).await {
        warn!(%page_id, layout = %layout.slug, error = %e, "layout applied but page slug not recorded");
    }

    info!(%page_id, layout = %layout.slug, count = zones.len(), "layout applied to page");
    Ok(zones)
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// Place new content in a zone, replacing whatever was there.
///
/// # Errors
///
/// `Repo` if the zone is missing or the write fails.
pub async fn add_element_to_zone(
    repo: &dyn Repository,
    zone_id: ZoneId,
    content: ElementContent,
) -> Result<Element, ZoneError> {
    let element = Element::new(zone_id, content);
    if let Some(displaced) = repo.put_element(&element).await? {
        debug!(%zone_id, displaced = %displaced.id, "element displaced");
    }
    Ok(element)
}

/// Merge a content patch into an element.
///
/// # Errors
///
/// `Repo` if the element is missing or the write fails.
pub async fn update_element(repo: &dyn Repository, element_id: ElementId, patch: ElementPatch) -> Result<Element, ZoneError> {
    Ok(repo.update_element(element_id, &patch).await?)
}

/// # Errors
///
/// `Repo` if the element is missing or the delete fails.
pub async fn delete_element(repo: &dyn Repository, element_id: ElementId) -> Result<(), ZoneError> {
    repo.delete_element(element_id).await?;
    Ok(())
}

#[cfg(test)]
#[path = "zone_test.rs"]
mod zone_test;
