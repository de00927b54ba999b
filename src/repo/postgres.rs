//! Postgres repository.
//!
//! DESIGN
//! ======
//! Plain `sqlx::query` / `query_as` with tuple rows; no compile-time checked
//! macros so the crate builds without a database. Text styling is stored as a
//! JSONB column and decoded straight into `TextStyle`.
//!
//! Every multi-statement operation runs in one transaction. Operations that
//! rewrite a page's zone set take `SELECT ... FOR UPDATE` on the page row
//! first, which serialises concurrent `replace_page_zones` callers; the
//! loser sees the winner's result rather than an interleaving of both.
//!
//! ERROR HANDLING
//! ==============
//! Unique and check violations become `RepoError::Conflict` so callers can
//! tell a rejected write from an outage. Everything else is `Database`.

use std::collections::HashMap;

use canvas::doc::{
    Element, ElementContent, ElementId, ElementPatch, Layout, LayoutId, Page, PageId, PageSnapshot, PartialZone,
    ProjectId, TextStyle, Zone, ZoneId, ZoneParent, ZoneType,
};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::{RepoError, Repository};

// =============================================================================
// ROWS
// =============================================================================

type LayoutRow = (Uuid, String, String, Option<String>, Option<String>, bool, bool, i32);
type PageRow = (Uuid, Uuid, i32, Option<String>, Option<String>);
type ZoneRow = (Uuid, Option<Uuid>, Option<Uuid>, i32, f64, f64, f64, f64, String);
type ElementRow = (Uuid, Uuid, String, Option<String>, Option<String>, Option<String>, Json<TextStyle>);

/// Bind values for an element: type, photo url, storage path, text, style.
type ElementColumns<'a> = (&'static str, Option<&'a str>, Option<&'a str>, Option<&'a str>, Json<TextStyle>);

fn layout_from_row(row: LayoutRow, zones: Vec<Zone>) -> Layout {
    let (id, slug, name, description, icon, is_system, is_active, sort_order) = row;
    Layout { id, slug, name, description, icon, is_system, is_active, sort_order, zones }
}

fn page_from_row((id, project_id, page_number, title, layout_slug): PageRow) -> Page {
    Page { id, project_id, page_number, title, layout_slug }
}

fn zone_from_row(row: ZoneRow) -> Zone {
    let (id, page_id, layout_id, zone_index, position_x, position_y, width, height, zone_type) = row;
    Zone {
        id,
        page_id,
        layout_id,
        zone_index,
        position_x,
        position_y,
        width,
        height,
        zone_type: ZoneType::normalize(Some(&zone_type)),
    }
}

fn element_from_row(row: ElementRow) -> Element {
    let (id, zone_id, kind, photo_url, photo_storage_path, text_content, style) = row;
    let content = match ZoneType::normalize(Some(&kind)) {
        ZoneType::Text => ElementContent::Text { text_content, style: style.0 },
        ZoneType::Photo => ElementContent::Photo { photo_url, photo_storage_path },
    };
    Element { id, zone_id, content }
}

fn element_columns(element: &Element) -> ElementColumns<'_> {
    let kind = element.content.element_type().as_str();
    match &element.content {
        ElementContent::Photo { photo_url, photo_storage_path } => {
            (kind, photo_url.as_deref(), photo_storage_path.as_deref(), None, Json(TextStyle::default()))
        }
        ElementContent::Text { text_content, style } => (kind, None, None, text_content.as_deref(), Json(style.clone())),
    }
}

fn conflict_or_database(err: sqlx::Error, what: impl FnOnce() -> String) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() || db.is_check_violation() || db.is_foreign_key_violation() {
            return RepoError::Conflict(what());
        }
    }
    RepoError::Database(err)
}

// =============================================================================
// SHARED STATEMENTS
// =============================================================================

async fn insert_zone(conn: &mut PgConnection, zone: &Zone) -> Result<(), RepoError> {
    sqlx::query(
        "INSERT INTO zones (id, page_id, layout_id, zone_index, position_x, position_y, width, height, zone_type)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(zone.id)
    .bind(zone.page_id)
    .bind(zone.layout_id)
    .bind(zone.zone_index)
    .bind(zone.position_x)
    .bind(zone.position_y)
    .bind(zone.width)
    .bind(zone.height)
    .bind(zone.zone_type.as_str())
    .execute(conn)
    .await
    .map_err(|e| conflict_or_database(e, || format!("zone rejected: {}", zone.id)))?;
    Ok(())
}

async fn zones_for_page(conn: &mut PgConnection, page_id: PageId) -> Result<Vec<Zone>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ZoneRow>(
        "SELECT id, page_id, layout_id, zone_index, position_x, position_y, width, height, zone_type
         FROM zones
         WHERE page_id = $1
         ORDER BY zone_index ASC, id ASC",
    )
    .bind(page_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(zone_from_row).collect())
}

async fn zones_for_layout(conn: &mut PgConnection, layout_id: LayoutId) -> Result<Vec<Zone>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ZoneRow>(
        "SELECT id, page_id, layout_id, zone_index, position_x, position_y, width, height, zone_type
         FROM zones
         WHERE layout_id = $1
         ORDER BY zone_index ASC, id ASC",
    )
    .bind(layout_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(zone_from_row).collect())
}

// =============================================================================
// REPOSITORY
// =============================================================================

/// Repository backed by Postgres.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn layout_with_zones(&self, row: Option<LayoutRow>, key: String) -> Result<Layout, RepoError> {
        let Some(row) = row else {
            return Err(RepoError::NotFound { entity: "layout", id: key });
        };
        let mut conn = self.pool.acquire().await?;
        let zones = zones_for_layout(conn.as_mut(), row.0).await?;
        Ok(layout_from_row(row, zones))
    }
}

#[async_trait::async_trait]
impl Repository for PgRepository {
    async fn fetch_layouts(&self) -> Result<Vec<Layout>, RepoError> {
        let rows = sqlx::query_as::<_, LayoutRow>(
            "SELECT id, slug, name, description, icon, is_system, is_active, sort_order
             FROM layouts
             ORDER BY sort_order ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let zone_rows = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, page_id, layout_id, zone_index, position_x, position_y, width, height, zone_type
             FROM zones
             WHERE layout_id IS NOT NULL
             ORDER BY zone_index ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_layout: HashMap<LayoutId, Vec<Zone>> = HashMap::new();
        for zone in zone_rows.into_iter().map(zone_from_row) {
            if let Some(layout_id) = zone.layout_id {
                by_layout.entry(layout_id).or_default().push(zone);
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let zones = by_layout.remove(&row.0).unwrap_or_default();
                layout_from_row(row, zones)
            })
            .collect())
    }

    async fn fetch_layout(&self, id: LayoutId) -> Result<Layout, RepoError> {
        let row = sqlx::query_as::<_, LayoutRow>(
            "SELECT id, slug, name, description, icon, is_system, is_active, sort_order
             FROM layouts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        self.layout_with_zones(row, id.to_string()).await
    }

    async fn fetch_layout_by_slug(&self, slug: &str) -> Result<Layout, RepoError> {
        let row = sqlx::query_as::<_, LayoutRow>(
            "SELECT id, slug, name, description, icon, is_system, is_active, sort_order
             FROM layouts WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        self.layout_with_zones(row, slug.to_owned()).await
    }

    async fn save_layout(&self, layout: &Layout) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO layouts (id, slug, name, description, icon, is_system, is_active, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO UPDATE SET
                slug = EXCLUDED.slug,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                icon = EXCLUDED.icon,
                is_system = EXCLUDED.is_system,
                is_active = EXCLUDED.is_active,
                sort_order = EXCLUDED.sort_order",
        )
        .bind(layout.id)
        .bind(&layout.slug)
        .bind(&layout.name)
        .bind(&layout.description)
        .bind(&layout.icon)
        .bind(layout.is_system)
        .bind(layout.is_active)
        .bind(layout.sort_order)
        .execute(tx.as_mut())
        .await
        .map_err(|e| conflict_or_database(e, || format!("layout slug already exists: {}", layout.slug)))?;

        sqlx::query("DELETE FROM zones WHERE layout_id = $1")
            .bind(layout.id)
            .execute(tx.as_mut())
            .await?;

        for zone in &layout.zones {
            let zone = Zone { page_id: None, layout_id: Some(layout.id), ..zone.clone() };
            insert_zone(tx.as_mut(), &zone).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_layout(&self, id: LayoutId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM layouts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("layout", id));
        }
        Ok(())
    }

    async fn fetch_page(&self, id: PageId) -> Result<PageSnapshot, RepoError> {
        let mut conn = self.pool.acquire().await?;

        let page = sqlx::query_as::<_, PageRow>(
            "SELECT id, project_id, page_number, title, layout_slug FROM pages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn.as_mut())
        .await?
        .map(page_from_row)
        .ok_or_else(|| RepoError::not_found("page", id))?;

        let zones = zones_for_page(conn.as_mut(), id).await?;

        let elements = sqlx::query_as::<_, ElementRow>(
            "SELECT e.id, e.zone_id, e.type, e.photo_url, e.photo_storage_path, e.text_content, e.style
             FROM elements e
             JOIN zones z ON z.id = e.zone_id
             WHERE z.page_id = $1
             ORDER BY z.zone_index ASC",
        )
        .bind(id)
        .fetch_all(conn.as_mut())
        .await?
        .into_iter()
        .map(element_from_row)
        .collect();

        Ok(PageSnapshot { page, zones, elements })
    }

    async fn list_pages(&self, project_id: ProjectId) -> Result<Vec<Page>, RepoError> {
        let rows = sqlx::query_as::<_, PageRow>(
            "SELECT id, project_id, page_number, title, layout_slug
             FROM pages
             WHERE project_id = $1
             ORDER BY page_number ASC, id ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(page_from_row).collect())
    }

    async fn save_page(&self, page: &Page) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO pages (id, project_id, page_number, title, layout_slug)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                page_number = EXCLUDED.page_number,
                title = EXCLUDED.title,
                layout_slug = EXCLUDED.layout_slug",
        )
        .bind(page.id)
        .bind(page.project_id)
        .bind(page.page_number)
        .bind(&page.title)
        .bind(&page.layout_slug)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, || format!("page rejected: {}", page.id)))?;
        Ok(())
    }

    async fn delete_page(&self, id: PageId) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM elements WHERE zone_id IN (SELECT id FROM zones WHERE page_id = $1)")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        sqlx::query("DELETE FROM zones WHERE page_id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("page", id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn fetch_zone(&self, id: ZoneId) -> Result<Zone, RepoError> {
        sqlx::query_as::<_, ZoneRow>(
            "SELECT id, page_id, layout_id, zone_index, position_x, position_y, width, height, zone_type
             FROM zones WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(zone_from_row)
        .ok_or_else(|| RepoError::not_found("zone", id))
    }

    async fn create_zone(&self, zone: &Zone) -> Result<(), RepoError> {
        let Some(parent) = zone.parent() else {
            return Err(RepoError::Conflict("zone must belong to exactly one page or layout".into()));
        };
        let mut conn = self.pool.acquire().await?;

        let (sql, entity, parent_id) = match parent {
            ZoneParent::Page(id) => ("SELECT id FROM pages WHERE id = $1", "page", id),
            ZoneParent::Layout(id) => ("SELECT id FROM layouts WHERE id = $1", "layout", id),
        };
        let exists = sqlx::query_as::<_, (Uuid,)>(sql)
            .bind(parent_id)
            .fetch_optional(conn.as_mut())
            .await?;
        if exists.is_none() {
            return Err(RepoError::not_found(entity, parent_id));
        }

        insert_zone(conn.as_mut(), zone).await
    }

    async fn update_zone(&self, id: ZoneId, partial: &PartialZone) -> Result<Zone, RepoError> {
        let mut tx = self.pool.begin().await?;

        let mut zone = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, page_id, layout_id, zone_index, position_x, position_y, width, height, zone_type
             FROM zones WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(tx.as_mut())
        .await?
        .map(zone_from_row)
        .ok_or_else(|| RepoError::not_found("zone", id))?;

        zone.apply_partial(partial);

        sqlx::query(
            "UPDATE zones
             SET position_x = $2, position_y = $3, width = $4, height = $5, zone_type = $6
             WHERE id = $1",
        )
        .bind(id)
        .bind(zone.position_x)
        .bind(zone.position_y)
        .bind(zone.width)
        .bind(zone.height)
        .bind(zone.zone_type.as_str())
        .execute(tx.as_mut())
        .await
        .map_err(|e| conflict_or_database(e, || format!("zone update rejected: {id}")))?;

        tx.commit().await?;
        Ok(zone)
    }

    async fn delete_zone(&self, id: ZoneId) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM elements WHERE zone_id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        let result = sqlx::query("DELETE FROM zones WHERE id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("zone", id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn replace_page_zones(&self, page_id: PageId, zones: &[Zone]) -> Result<(), RepoError> {
        if let Some(stray) = zones.iter().find(|z| z.parent() != Some(ZoneParent::Page(page_id))) {
            return Err(RepoError::Conflict(format!("zone {} does not belong to page {page_id}", stray.id)));
        }

        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM pages WHERE id = $1 FOR UPDATE")
            .bind(page_id)
            .fetch_optional(tx.as_mut())
            .await?;
        if locked.is_none() {
            return Err(RepoError::not_found("page", page_id));
        }

        sqlx::query("DELETE FROM elements WHERE zone_id IN (SELECT id FROM zones WHERE page_id = $1)")
            .bind(page_id)
            .execute(tx.as_mut())
            .await?;
        sqlx::query("DELETE FROM zones WHERE page_id = $1")
            .bind(page_id)
            .execute(tx.as_mut())
            .await?;
        for zone in zones {
            insert_zone(tx.as_mut(), zone).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn put_element(&self, element: &Element) -> Result<Option<Element>, RepoError> {
        let mut tx = self.pool.begin().await?;

        let zone = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM zones WHERE id = $1 FOR UPDATE")
            .bind(element.zone_id)
            .fetch_optional(tx.as_mut())
            .await?;
        if zone.is_none() {
            return Err(RepoError::not_found("zone", element.zone_id));
        }

        let displaced = sqlx::query_as::<_, ElementRow>(
            "DELETE FROM elements WHERE zone_id = $1 AND id <> $2
             RETURNING id, zone_id, type, photo_url, photo_storage_path, text_content, style",
        )
        .bind(element.zone_id)
        .bind(element.id)
        .fetch_optional(tx.as_mut())
        .await?
        .map(element_from_row);

        let (kind, photo_url, storage_path, text_content, style) = element_columns(element);
        sqlx::query(
            "INSERT INTO elements (id, zone_id, type, photo_url, photo_storage_path, text_content, style)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                zone_id = EXCLUDED.zone_id,
                type = EXCLUDED.type,
                photo_url = EXCLUDED.photo_url,
                photo_storage_path = EXCLUDED.photo_storage_path,
                text_content = EXCLUDED.text_content,
                style = EXCLUDED.style",
        )
        .bind(element.id)
        .bind(element.zone_id)
        .bind(kind)
        .bind(photo_url)
        .bind(storage_path)
        .bind(text_content)
        .bind(style)
        .execute(tx.as_mut())
        .await
        .map_err(|e| conflict_or_database(e, || format!("element rejected: {}", element.id)))?;

        tx.commit().await?;
        Ok(displaced)
    }

    async fn update_element(&self, id: ElementId, patch: &ElementPatch) -> Result<Element, RepoError> {
        let mut tx = self.pool.begin().await?;

        let mut element = sqlx::query_as::<_, ElementRow>(
            "SELECT id, zone_id, type, photo_url, photo_storage_path, text_content, style
             FROM elements WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(tx.as_mut())
        .await?
        .map(element_from_row)
        .ok_or_else(|| RepoError::not_found("element", id))?;

        element.apply_patch(patch);

        let (_, photo_url, storage_path, text_content, style) = element_columns(&element);
        sqlx::query(
            "UPDATE elements
             SET photo_url = $2, photo_storage_path = $3, text_content = $4, style = $5
             WHERE id = $1",
        )
        .bind(id)
        .bind(photo_url)
        .bind(storage_path)
        .bind(text_content)
        .bind(style)
        .execute(tx.as_mut())
        .await?;

        tx.commit().await?;
        Ok(element)
    }

    async fn delete_element(&self, id: ElementId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM elements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("element", id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod postgres_test;
