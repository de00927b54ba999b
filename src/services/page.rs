//! Page service: adding, removing and ordering a project's pages.
//!
//! DESIGN
//! ======
//! Page numbers are dense and 1-based within a project. Every operation that
//! removes or moves a page renumbers the rest so the sequence stays 1..n.
//! Applying a layout to a freshly created page goes through
//! `zone::apply_layout_to_page`, so the same copy-and-reindex rules hold for
//! a page built from the page builder and one edited later.

use std::collections::HashSet;

use canvas::consts::BLANK_LAYOUT_SLUG;
use canvas::doc::{Layout, LayoutId, Page, PageId, ProjectId};
use canvas::page_builder::PageBuilder;
use tracing::{debug, info};
use uuid::Uuid;

use super::zone::{self, ZoneError};
use crate::error::ErrorCode;
use crate::repo::{RepoError, Repository};

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("a project must keep at least one page")]
    LastPage,
    #[error("page {0} does not belong to this project")]
    NotInProject(PageId),
    #[error("page order must list every page of the project exactly once")]
    NotAPermutation,
    #[error("unknown layout in page plan: {0}")]
    UnknownLayout(LayoutId),
    #[error(transparent)]
    Zone(#[from] ZoneError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ErrorCode for PageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LastPage => "E_LAST_PAGE",
            Self::NotInProject(_) => "E_PAGE_NOT_FOUND",
            Self::NotAPermutation => "E_INVALID_ORDER",
            Self::UnknownLayout(_) => "E_LAYOUT_NOT_FOUND",
            Self::Zone(e) => e.error_code(),
            Self::Repo(e) => e.error_code(),
        }
    }
}

fn new_page(project_id: ProjectId, page_number: i32) -> Page {
    Page { id: Uuid::new_v4(), project_id, page_number, title: None, layout_slug: None }
}

fn next_page_number(pages: &[Page]) -> i32 {
    pages.iter().map(|p| p.page_number).max().unwrap_or(0) + 1
}

/// Save every page whose number differs from its position.
async fn renumber(repo: &dyn Repository, pages: Vec<Page>) -> Result<Vec<Page>, PageError> {
    let mut out = Vec::with_capacity(pages.len());
    for (mut page, number) in pages.into_iter().zip(1..) {
        if page.page_number != number {
            page.page_number = number;
            repo.save_page(&page).await?;
        }
        out.push(page);
    }
    Ok(out)
}

/// Append a page to the project. Its zones are copied from the layout named
/// `layout_slug`; `blank`, `None` or an unknown slug give an empty page.
///
/// # Errors
///
/// Returns a repository error if any read or write fails.
pub async fn add_page(repo: &dyn Repository, project_id: ProjectId, layout_slug: Option<&str>) -> Result<Page, PageError> {
    let pages = repo.list_pages(project_id).await?;
    let mut page = new_page(project_id, next_page_number(&pages));
    repo.save_page(&page).await?;

    if let Some(slug) = layout_slug.filter(|s| *s != BLANK_LAYOUT_SLUG) {
        match repo.fetch_layout_by_slug(slug).await {
            Ok(layout) => {
                zone::apply_layout_to_page(repo, page.id, &layout).await?;
                page.layout_slug = Some(layout.slug);
            }
            Err(e) if e.is_not_found() => debug!(%slug, "unknown layout; page left blank"),
            Err(e) => return Err(e.into()),
        }
    }

    info!(%project_id, page_id = %page.id, page_number = page.page_number, "page added");
    Ok(page)
}

/// Delete a page and renumber the rest.
///
/// # Errors
///
/// `LastPage` if it is the project's only page; `NotInProject` if the page
/// is not part of the project; repository errors otherwise.
pub async fn delete_page(repo: &dyn Repository, project_id: ProjectId, page_id: PageId) -> Result<Vec<Page>, PageError> {
    let pages = repo.list_pages(project_id).await?;
    if !pages.iter().any(|p| p.id == page_id) {
        return Err(PageError::NotInProject(page_id));
    }
    if pages.len() <= 1 {
        return Err(PageError::LastPage);
    }

    repo.delete_page(page_id).await?;
    let remaining = pages.into_iter().filter(|p| p.id != page_id).collect();
    let pages = renumber(repo, remaining).await?;

    info!(%project_id, %page_id, remaining = pages.len(), "page deleted");
    Ok(pages)
}

/// Put the project's pages in the order given.
///
/// # Errors
///
/// `NotAPermutation` unless `ordered_ids` lists every page exactly once.
pub async fn reorder_pages(repo: &dyn Repository, project_id: ProjectId, ordered_ids: &[PageId]) -> Result<Vec<Page>, PageError> {
    let pages = repo.list_pages(project_id).await?;

    let unique: HashSet<&PageId> = ordered_ids.iter().collect();
    if unique.len() != ordered_ids.len() || ordered_ids.len() != pages.len() {
        return Err(PageError::NotAPermutation);
    }
    let mut ordered = Vec::with_capacity(pages.len());
    for id in ordered_ids {
        let Some(page) = pages.iter().find(|p| p.id == *id) else {
            return Err(PageError::NotAPermutation);
        };
        ordered.push(page.clone());
    }

    renumber(repo, ordered).await
}

/// Create one page per page-builder assignment, after the project's existing
/// pages, and apply each page's layout.
///
/// # Errors
///
/// `UnknownLayout` (before anything is written) if the plan names a layout
/// not in `layouts`; zone or repository errors from the writes.
pub async fn materialize_plan(
    repo: &dyn Repository,
    project_id: ProjectId,
    plan: &PageBuilder,
    layouts: &[Layout],
) -> Result<Vec<Page>, PageError> {
    let mut resolved = Vec::with_capacity(plan.len());
    for assignment in plan.pages() {
        let layout = match assignment.layout_id {
            Some(id) => Some(layouts.iter().find(|l| l.id == id).ok_or(PageError::UnknownLayout(id))?),
            None => None,
        };
        resolved.push(layout);
    }

    let existing = repo.list_pages(project_id).await?;
    let first_number = next_page_number(&existing);

    let mut created = Vec::with_capacity(resolved.len());
    for (layout, page_number) in resolved.into_iter().zip(first_number..) {
        let mut page = new_page(project_id, page_number);
        repo.save_page(&page).await?;
        if let Some(layout) = layout {
            zone::apply_layout_to_page(repo, page.id, layout).await?;
            page.layout_slug = Some(layout.slug.clone());
        }
        created.push(page);
    }

    info!(%project_id, count = created.len(), "page plan materialized");
    Ok(created)
}

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;
