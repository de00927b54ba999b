//! Persistence boundary.
//!
//! DESIGN
//! ======
//! Everything that leaves the process goes through [`Repository`]. Three
//! backends implement it:
//!
//! - [`postgres::PgRepository`] for the service itself,
//! - [`memory::MemoryRepository`] for development mode and tests,
//! - [`http::HttpRepository`] for an editor session talking to a remote
//!   service over the routes in `crate::routes`.
//!
//! Multi-step operations (`replace_page_zones`, `put_element`, `save_layout`,
//! `delete_zone`) are atomic in every backend: a transaction in Postgres, a
//! single write-lock scope in memory, a single request over HTTP.
//!
//! ERROR HANDLING
//! ==============
//! `NotFound` carries the entity name so the HTTP layer can emit a specific
//! code (`E_ZONE_NOT_FOUND`) and the HTTP backend can rebuild the same
//! variant on the far side.

pub mod http;
pub mod memory;
pub mod postgres;

use canvas::doc::{
    Element, ElementId, ElementPatch, Layout, LayoutId, Page, PageId, PageSnapshot, PartialZone, ProjectId, Zone,
    ZoneId,
};

use crate::error::ErrorCode;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote error {status} ({code}): {message}")]
    Remote { status: u16, code: String, message: String },
}

impl RepoError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl ErrorCode for RepoError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { entity, .. } => not_found_code(entity),
            Self::Conflict(_) => "E_CONFLICT",
            Self::Database(_) => "E_DATABASE",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Remote { .. } => "E_REMOTE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Error code for a missing entity of the given kind.
#[must_use]
pub fn not_found_code(entity: &str) -> &'static str {
    match entity {
        "page" => "E_PAGE_NOT_FOUND",
        "zone" => "E_ZONE_NOT_FOUND",
        "element" => "E_ELEMENT_NOT_FOUND",
        "layout" => "E_LAYOUT_NOT_FOUND",
        _ => "E_NOT_FOUND",
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Storage for layouts, pages, zones and elements.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// All layouts with their template zones sorted by `zone_index`, ordered
    /// by `sort_order` then name.
    async fn fetch_layouts(&self) -> Result<Vec<Layout>, RepoError>;

    async fn fetch_layout(&self, id: LayoutId) -> Result<Layout, RepoError>;

    async fn fetch_layout_by_slug(&self, slug: &str) -> Result<Layout, RepoError>;

    /// Upsert layout metadata and replace its template zones.
    async fn save_layout(&self, layout: &Layout) -> Result<(), RepoError>;

    /// Delete a layout and its template zones.
    async fn delete_layout(&self, id: LayoutId) -> Result<(), RepoError>;

    /// A page with its zones (sorted) and elements.
    async fn fetch_page(&self, id: PageId) -> Result<PageSnapshot, RepoError>;

    /// Pages of a project ordered by `page_number`.
    async fn list_pages(&self, project_id: ProjectId) -> Result<Vec<Page>, RepoError>;

    /// Upsert a page row.
    async fn save_page(&self, page: &Page) -> Result<(), RepoError>;

    /// Delete a page with its zones and elements.
    async fn delete_page(&self, id: PageId) -> Result<(), RepoError>;

    async fn fetch_zone(&self, id: ZoneId) -> Result<Zone, RepoError>;

    /// Insert a zone with a caller-generated id.
    async fn create_zone(&self, zone: &Zone) -> Result<(), RepoError>;

    /// Merge a partial update and return the stored result.
    async fn update_zone(&self, id: ZoneId, partial: &PartialZone) -> Result<Zone, RepoError>;

    /// Delete a zone and the element bound to it.
    async fn delete_zone(&self, id: ZoneId) -> Result<(), RepoError>;

    /// Replace every zone on a page, dropping its elements. All-or-nothing.
    async fn replace_page_zones(&self, page_id: PageId, zones: &[Zone]) -> Result<(), RepoError>;

    /// Store an element, first removing whatever occupied its zone. Returns
    /// the displaced element.
    async fn put_element(&self, element: &Element) -> Result<Option<Element>, RepoError>;

    /// Merge a content patch and return the stored result.
    async fn update_element(&self, id: ElementId, patch: &ElementPatch) -> Result<Element, RepoError>;

    async fn delete_element(&self, id: ElementId) -> Result<(), RepoError>;
}

/// Sort zones into display order.
pub(crate) fn sort_zones(zones: &mut [Zone]) {
    zones.sort_by(|a, b| a.zone_index.cmp(&b.zone_index).then_with(|| a.id.cmp(&b.id)));
}

/// Sort layouts into listing order.
pub(crate) fn sort_layouts(layouts: &mut [Layout]) {
    layouts.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
}
