//! Layout service: admin management of layout templates.
//!
//! DESIGN
//! ======
//! A layout is a named list of template zones. Admins create, edit and
//! retire them; pages copy their zones when a layout is applied. System
//! layouts ship with the service (`seed_system_layouts`) and cannot be
//! deleted or renamed, only re-described, re-ordered or deactivated.
//!
//! Template zones supplied by a form are re-indexed by their order in the
//! request and given fresh ids; the stored zone set is always replaced
//! wholesale.

use canvas::consts::{BLANK_LAYOUT_SLUG, MIN_ZONE_SIZE};
use canvas::doc::{Layout, LayoutId, Zone, ZoneParent, ZoneType};
use canvas::geometry::Rect;
use canvas::validate::{ZoneValidationError, validate_zone};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::repo::{RepoError, Repository};

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid layout slug {0:?}: use lowercase letters, digits and dashes")]
    InvalidSlug(String),
    #[error("layout slug already exists: {0}")]
    SlugTaken(String),
    #[error("layout name must not be empty")]
    EmptyName,
    #[error("system layout {0} cannot be changed that way")]
    SystemLayout(String),
    #[error(transparent)]
    Validation(#[from] ZoneValidationError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ErrorCode for LayoutError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSlug(_) => "E_INVALID_SLUG",
            Self::SlugTaken(_) => "E_SLUG_TAKEN",
            Self::EmptyName => "E_VALIDATION",
            Self::SystemLayout(_) => "E_SYSTEM_LAYOUT",
            Self::Validation(_) => "E_VALIDATION",
            Self::Repo(e) => e.error_code(),
        }
    }
}

// =============================================================================
// INPUT
// =============================================================================

/// One template zone as submitted by the layout form.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, serde::Serialize)]
pub struct TemplateZone {
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub zone_type: ZoneType,
}

impl TemplateZone {
    #[must_use]
    pub fn new(rect: Rect, zone_type: ZoneType) -> Self {
        Self { position_x: rect.x, position_y: rect.y, width: rect.width, height: rect.height, zone_type }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.position_x, self.position_y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLayout {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub zones: Vec<TemplateZone>,
}

/// Sparse layout update. `zones`, when present, replaces the template zones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutPatch {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub zones: Option<Vec<TemplateZone>>,
}

/// Slugs are non-empty lowercase `[a-z0-9-]`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn build_zones(layout_id: LayoutId, input: &[TemplateZone]) -> Result<Vec<Zone>, LayoutError> {
    let zones: Vec<Zone> = input
        .iter()
        .zip(0..)
        .map(|(t, index)| Zone::new(ZoneParent::Layout(layout_id), index, t.rect().rounded(), t.zone_type))
        .collect();
    for zone in &zones {
        validate_zone(zone, MIN_ZONE_SIZE)?;
    }
    Ok(zones)
}

async fn ensure_slug_free(repo: &dyn Repository, slug: &str, own_id: Option<LayoutId>) -> Result<(), LayoutError> {
    match repo.fetch_layout_by_slug(slug).await {
        Ok(existing) if Some(existing.id) != own_id => Err(LayoutError::SlugTaken(slug.to_owned())),
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// Active layouts for the page editor's picker.
///
/// # Errors
///
/// Returns a repository error if the listing fails.
pub async fn list_active_layouts(repo: &dyn Repository) -> Result<Vec<Layout>, LayoutError> {
    let mut layouts = repo.fetch_layouts().await?;
    layouts.retain(|l| l.is_active);
    Ok(layouts)
}

/// Every layout, including inactive ones, for the admin list.
///
/// # Errors
///
/// Returns a repository error if the listing fails.
pub async fn list_all_layouts(repo: &dyn Repository) -> Result<Vec<Layout>, LayoutError> {
    Ok(repo.fetch_layouts().await?)
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Create a custom (non-system) layout.
///
/// # Errors
///
/// `InvalidSlug`, `SlugTaken`, `EmptyName` or `Validation` for bad input;
/// `Repo` if the write fails.
pub async fn create_layout(repo: &dyn Repository, input: NewLayout) -> Result<Layout, LayoutError> {
    if !is_valid_slug(&input.slug) {
        return Err(LayoutError::InvalidSlug(input.slug));
    }
    if input.name.trim().is_empty() {
        return Err(LayoutError::EmptyName);
    }
    ensure_slug_free(repo, &input.slug, None).await?;

    let id = Uuid::new_v4();
    let layout = Layout {
        id,
        zones: build_zones(id, &input.zones)?,
        slug: input.slug,
        name: input.name,
        description: input.description,
        icon: input.icon,
        is_system: false,
        is_active: true,
        sort_order: input.sort_order,
    };
    repo.save_layout(&layout).await?;

    info!(layout_id = %layout.id, slug = %layout.slug, zones = layout.zones.len(), "layout created");
    Ok(layout)
}

/// Apply a sparse update to a layout.
///
/// # Errors
///
/// `SystemLayout` when renaming a system layout's slug; otherwise as
/// [`create_layout`], plus `Repo` (`E_LAYOUT_NOT_FOUND`) for a missing id.
pub async fn update_layout(repo: &dyn Repository, id: LayoutId, patch: LayoutPatch) -> Result<Layout, LayoutError> {
    let mut layout = repo.fetch_layout(id).await?;

    if let Some(slug) = patch.slug {
        if slug != layout.slug {
            if layout.is_system {
                return Err(LayoutError::SystemLayout(layout.slug));
            }
            if !is_valid_slug(&slug) {
                return Err(LayoutError::InvalidSlug(slug));
            }
            ensure_slug_free(repo, &slug, Some(id)).await?;
            layout.slug = slug;
        }
    }
    if let Some(name) = patch.name {
        if name.trim().is_empty() {
            return Err(LayoutError::EmptyName);
        }
        layout.name = name;
    }
    if patch.description.is_some() {
        layout.description = patch.description;
    }
    if patch.icon.is_some() {
        layout.icon = patch.icon;
    }
    if let Some(active) = patch.is_active {
        layout.is_active = active;
    }
    if let Some(order) = patch.sort_order {
        layout.sort_order = order;
    }
    if let Some(zones) = patch.zones {
        layout.zones = build_zones(id, &zones)?;
    }

    repo.save_layout(&layout).await?;
    info!(layout_id = %id, slug = %layout.slug, "layout updated");
    Ok(layout)
}

/// Delete a custom layout.
///
/// # Errors
///
/// `SystemLayout` for system layouts; `Repo` if missing or the delete fails.
pub async fn delete_layout(repo: &dyn Repository, id: LayoutId) -> Result<(), LayoutError> {
    let layout = repo.fetch_layout(id).await?;
    if layout.is_system {
        return Err(LayoutError::SystemLayout(layout.slug));
    }
    repo.delete_layout(id).await?;
    info!(layout_id = %id, slug = %layout.slug, "layout deleted");
    Ok(())
}

// =============================================================================
// SYSTEM LAYOUTS
// =============================================================================

fn system_layout(slug: &str, name: &str, icon: &str, sort_order: i32, zones: &[(Rect, ZoneType)]) -> Layout {
    let id = Uuid::new_v4();
    Layout {
        id,
        slug: slug.to_owned(),
        name: name.to_owned(),
        description: None,
        icon: Some(icon.to_owned()),
        is_system: true,
        is_active: true,
        sort_order,
        zones: zones
            .iter()
            .zip(0..)
            .map(|((rect, zone_type), index)| Zone::new(ZoneParent::Layout(id), index, *rect, *zone_type))
            .collect(),
    }
}

/// The layouts every installation starts with.
#[must_use]
pub fn system_layouts() -> Vec<Layout> {
    use ZoneType::{Photo, Text};
    vec![
        system_layout(BLANK_LAYOUT_SLUG, "Blank", "square", 0, &[]),
        system_layout("full-page", "Full page", "image", 1, &[(Rect::FULL, Photo)]),
        system_layout(
            "two-vertical",
            "Two columns",
            "columns",
            2,
            &[(Rect::new(0.0, 0.0, 50.0, 100.0), Photo), (Rect::new(50.0, 0.0, 50.0, 100.0), Photo)],
        ),
        system_layout(
            "two-horizontal",
            "Two rows",
            "rows",
            3,
            &[(Rect::new(0.0, 0.0, 100.0, 50.0), Photo), (Rect::new(0.0, 50.0, 100.0, 50.0), Photo)],
        ),
        system_layout(
            "grid-4",
            "Grid of four",
            "grid",
            4,
            &[
                (Rect::new(0.0, 0.0, 50.0, 50.0), Photo),
                (Rect::new(50.0, 0.0, 50.0, 50.0), Photo),
                (Rect::new(0.0, 50.0, 50.0, 50.0), Photo),
                (Rect::new(50.0, 50.0, 50.0, 50.0), Photo),
            ],
        ),
        system_layout(
            "photo-caption",
            "Photo with caption",
            "caption",
            5,
            &[(Rect::new(0.0, 0.0, 100.0, 80.0), Photo), (Rect::new(0.0, 80.0, 100.0, 20.0), Text)],
        ),
    ]
}

/// Insert the system layouts into an empty repository. Returns how many
/// were inserted; a repository that already holds layouts is left alone.
///
/// # Errors
///
/// Returns a repository error if listing or saving fails.
pub async fn seed_system_layouts(repo: &dyn Repository) -> Result<usize, LayoutError> {
    if !repo.fetch_layouts().await?.is_empty() {
        return Ok(0);
    }
    let layouts = system_layouts();
    for layout in &layouts {
        repo.save_layout(layout).await?;
    }
    info!(count = layouts.len(), "system layouts seeded");
    Ok(layouts.len())
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;
