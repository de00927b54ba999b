//! In-memory repository.
//!
//! DESIGN
//! ======
//! One `RwLock` around all four tables. Every write operation takes the write
//! lock once and does all of its work inside that scope, so multi-step
//! operations are atomic and concurrent callers are serialised. Layouts are
//! stored without their zones; template zones live in the shared zone table
//! like page zones do and are reattached on read.

use std::collections::HashMap;

use canvas::doc::{
    Element, ElementId, ElementPatch, Layout, LayoutId, Page, PageId, PageSnapshot, PartialZone, ProjectId, Zone,
    ZoneId, ZoneParent,
};
use tokio::sync::RwLock;

use super::{RepoError, Repository, sort_layouts, sort_zones};

#[derive(Debug, Default)]
struct Tables {
    layouts: HashMap<LayoutId, Layout>,
    pages: HashMap<PageId, Page>,
    zones: HashMap<ZoneId, Zone>,
    elements: HashMap<ElementId, Element>,
}

impl Tables {
    fn zones_of(&self, parent: ZoneParent) -> Vec<Zone> {
        let mut zones: Vec<Zone> = self
            .zones
            .values()
            .filter(|z| z.parent() == Some(parent))
            .cloned()
            .collect();
        sort_zones(&mut zones);
        zones
    }

    fn with_zones(&self, layout: &Layout) -> Layout {
        Layout { zones: self.zones_of(ZoneParent::Layout(layout.id)), ..layout.clone() }
    }

    fn parent_exists(&self, parent: ZoneParent) -> bool {
        match parent {
            ZoneParent::Page(id) => self.pages.contains_key(&id),
            ZoneParent::Layout(id) => self.layouts.contains_key(&id),
        }
    }

    /// Remove every zone on `parent` together with the elements in them.
    fn drop_zones_of(&mut self, parent: ZoneParent) {
        let doomed: Vec<ZoneId> = self
            .zones
            .values()
            .filter(|z| z.parent() == Some(parent))
            .map(|z| z.id)
            .collect();
        for zone_id in &doomed {
            self.zones.remove(zone_id);
        }
        self.elements.retain(|_, e| !doomed.contains(&e.zone_id));
    }

    fn element_in_zone(&self, zone_id: ZoneId) -> Option<ElementId> {
        self.elements.values().find(|e| e.zone_id == zone_id).map(|e| e.id)
    }
}

/// Repository backed by process memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    async fn fetch_layouts(&self) -> Result<Vec<Layout>, RepoError> {
        let tables = self.tables.read().await;
        let mut layouts: Vec<Layout> = tables.layouts.values().map(|l| tables.with_zones(l)).collect();
        sort_layouts(&mut layouts);
        Ok(layouts)
    }

    async fn fetch_layout(&self, id: LayoutId) -> Result<Layout, RepoError> {
        let tables = self.tables.read().await;
        tables
            .layouts
            .get(&id)
            .map(|l| tables.with_zones(l))
            .ok_or_else(|| RepoError::not_found("layout", id))
    }

    async fn fetch_layout_by_slug(&self, slug: &str) -> Result<Layout, RepoError> {
        let tables = self.tables.read().await;
        tables
            .layouts
            .values()
            .find(|l| l.slug == slug)
            .map(|l| tables.with_zones(l))
            .ok_or_else(|| RepoError::not_found("layout", slug))
    }

    async fn save_layout(&self, layout: &Layout) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.layouts.values().any(|l| l.slug == layout.slug && l.id != layout.id) {
            return Err(RepoError::Conflict(format!("layout slug already exists: {}", layout.slug)));
        }

        let parent = ZoneParent::Layout(layout.id);
        tables.drop_zones_of(parent);
        for zone in &layout.zones {
            let mut zone = zone.clone();
            zone.page_id = None;
            zone.layout_id = Some(layout.id);
            tables.zones.insert(zone.id, zone);
        }
        tables.layouts.insert(layout.id, Layout { zones: Vec::new(), ..layout.clone() });
        Ok(())
    }

    async fn delete_layout(&self, id: LayoutId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.layouts.remove(&id).is_none() {
            return Err(RepoError::not_found("layout", id));
        }
        tables.drop_zones_of(ZoneParent::Layout(id));
        Ok(())
    }

    async fn fetch_page(&self, id: PageId) -> Result<PageSnapshot, RepoError> {
        let tables = self.tables.read().await;
        let page = tables.pages.get(&id).cloned().ok_or_else(|| RepoError::not_found("page", id))?;
        let zones = tables.zones_of(ZoneParent::Page(id));
        let elements = zones
            .iter()
            .filter_map(|z| tables.element_in_zone(z.id))
            .filter_map(|eid| tables.elements.get(&eid).cloned())
            .collect();
        Ok(PageSnapshot { page, zones, elements })
    }

    async fn list_pages(&self, project_id: ProjectId) -> Result<Vec<Page>, RepoError> {
        let tables = self.tables.read().await;
        let mut pages: Vec<Page> = tables
            .pages
            .values()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect();
        pages.sort_by(|a, b| a.page_number.cmp(&b.page_number).then_with(|| a.id.cmp(&b.id)));
        Ok(pages)
    }

    async fn save_page(&self, page: &Page) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.pages.insert(page.id, page.clone());
        Ok(())
    }

    async fn delete_page(&self, id: PageId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.pages.remove(&id).is_none() {
            return Err(RepoError::not_found("page", id));
        }
        tables.drop_zones_of(ZoneParent::Page(id));
        Ok(())
    }

    async fn fetch_zone(&self, id: ZoneId) -> Result<Zone, RepoError> {
        let tables = self.tables.read().await;
        tables.zones.get(&id).cloned().ok_or_else(|| RepoError::not_found("zone", id))
    }

    async fn create_zone(&self, zone: &Zone) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let Some(parent) = zone.parent() else {
            return Err(RepoError::Conflict("zone must belong to exactly one page or layout".into()));
        };
        if !tables.parent_exists(parent) {
            return Err(match parent {
                ZoneParent::Page(id) => RepoError::not_found("page", id),
                ZoneParent::Layout(id) => RepoError::not_found("layout", id),
            });
        }
        if tables.zones.contains_key(&zone.id) {
            return Err(RepoError::Conflict(format!("zone already exists: {}", zone.id)));
        }
        tables.zones.insert(zone.id, zone.clone());
        Ok(())
    }

    async fn update_zone(&self, id: ZoneId, partial: &PartialZone) -> Result<Zone, RepoError> {
        let mut tables = self.tables.write().await;
        let zone = tables.zones.get_mut(&id).ok_or_else(|| RepoError::not_found("zone", id))?;
        zone.apply_partial(partial);
        Ok(zone.clone())
    }

    async fn delete_zone(&self, id: ZoneId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(element_id) = tables.element_in_zone(id) {
            tables.elements.remove(&element_id);
        }
        if tables.zones.remove(&id).is_none() {
            return Err(RepoError::not_found("zone", id));
        }
        Ok(())
    }

    async fn replace_page_zones(&self, page_id: PageId, zones: &[Zone]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.pages.contains_key(&page_id) {
            return Err(RepoError::not_found("page", page_id));
        }
        if let Some(stray) = zones.iter().find(|z| z.parent() != Some(ZoneParent::Page(page_id))) {
            return Err(RepoError::Conflict(format!("zone {} does not belong to page {page_id}", stray.id)));
        }

        tables.drop_zones_of(ZoneParent::Page(page_id));
        for zone in zones {
            tables.zones.insert(zone.id, zone.clone());
        }
        Ok(())
    }

    async fn put_element(&self, element: &Element) -> Result<Option<Element>, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.zones.contains_key(&element.zone_id) {
            return Err(RepoError::not_found("zone", element.zone_id));
        }
        let displaced = tables
            .element_in_zone(element.zone_id)
            .filter(|id| *id != element.id)
            .and_then(|id| tables.elements.remove(&id));
        tables.elements.insert(element.id, element.clone());
        Ok(displaced)
    }

    async fn update_element(&self, id: ElementId, patch: &ElementPatch) -> Result<Element, RepoError> {
        let mut tables = self.tables.write().await;
        let element = tables.elements.get_mut(&id).ok_or_else(|| RepoError::not_found("element", id))?;
        element.apply_patch(patch);
        Ok(element.clone())
    }

    async fn delete_element(&self, id: ElementId) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .elements
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("element", id))
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
