//! Document model: pages, zones, elements, layouts, and the in-memory store.
//!
//! This module defines the data that describes a photobook page (`Page`,
//! `Zone`, `Element`), the reusable zone templates (`Layout`), sparse update
//! types for incremental edits (`PartialZone`, `ElementPatch`), and the
//! runtime store that owns all live state on the editing side (`DocStore`).
//!
//! Ownership follows the book: a page owns its zones, a zone owns at most one
//! element. The store keeps that relation as an explicit `zone -> element`
//! map, so "which element is in this zone" never depends on ordinal matching.
//!
//! Every change the engine makes is expressed as a [`Mutation`]. A mutation
//! carries enough of the prior state to be reverted, which is how the editor
//! session rolls back local state after a failed persist.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::geometry::Rect;

pub type ProjectId = Uuid;
pub type PageId = Uuid;
pub type ZoneId = Uuid;
pub type ElementId = Uuid;
pub type LayoutId = Uuid;

// =============================================================
// Enumerations
// =============================================================

/// What a zone is meant to hold, and what an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    #[default]
    Photo,
    Text,
}

/// Elements share the zone type literals (`photo` / `text`).
pub type ElementType = ZoneType;

impl ZoneType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Text => "text",
        }
    }

    /// Parse a stored type hint. Anything that is not `text` is a photo zone.
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("text") => Self::Text,
            _ => Self::Photo,
        }
    }

    /// Strict parse used when validating input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "photo" => Some(Self::Photo),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

fn deserialize_zone_type<'de, D>(deserializer: D) -> Result<ZoneType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(ZoneType::normalize(raw.as_deref()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    None,
    Underline,
}

/// Which surface a zone belongs to: a real page, or a layout template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ZoneParent {
    Page(PageId),
    Layout(LayoutId),
}

// =============================================================
// Entities
// =============================================================

/// A project page. `layout_slug` records which layout was last applied and is
/// informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub project_id: ProjectId,
    pub page_number: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub layout_slug: Option<String>,
}

/// A rectangular region on a page or layout, in page percentages.
///
/// Exactly one of `page_id` / `layout_id` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    #[serde(default)]
    pub page_id: Option<PageId>,
    #[serde(default)]
    pub layout_id: Option<LayoutId>,
    pub zone_index: i32,
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, deserialize_with = "deserialize_zone_type")]
    pub zone_type: ZoneType,
}

impl Zone {
    /// A fresh zone with a new id on `parent`.
    #[must_use]
    pub fn new(parent: ZoneParent, zone_index: i32, rect: Rect, zone_type: ZoneType) -> Self {
        let (page_id, layout_id) = match parent {
            ZoneParent::Page(id) => (Some(id), None),
            ZoneParent::Layout(id) => (None, Some(id)),
        };
        Self {
            id: Uuid::new_v4(),
            page_id,
            layout_id,
            zone_index,
            position_x: rect.x,
            position_y: rect.y,
            width: rect.width,
            height: rect.height,
            zone_type,
        }
    }

    /// The owning surface, or `None` when the parent fields are inconsistent.
    #[must_use]
    pub fn parent(&self) -> Option<ZoneParent> {
        match (self.page_id, self.layout_id) {
            (Some(page), None) => Some(ZoneParent::Page(page)),
            (None, Some(layout)) => Some(ZoneParent::Layout(layout)),
            _ => None,
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.position_x, self.position_y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.position_x = rect.x;
        self.position_y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Copy this zone's geometry and type onto a new parent.
    #[must_use]
    pub fn copy_to(&self, parent: ZoneParent, zone_index: i32) -> Zone {
        Zone::new(parent, zone_index, self.rect(), self.zone_type)
    }

    /// Merge a partial update into this zone.
    pub fn apply_partial(&mut self, partial: &PartialZone) {
        if let Some(x) = partial.position_x {
            self.position_x = x;
        }
        if let Some(y) = partial.position_y {
            self.position_y = y;
        }
        if let Some(w) = partial.width {
            self.width = w;
        }
        if let Some(h) = partial.height {
            self.height = h;
        }
        if let Some(t) = partial.zone_type {
            self.zone_type = t;
        }
    }
}

/// Font and alignment properties of a text element. Absent fields use the
/// renderer's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
}

impl TextStyle {
    /// Overwrite every field that is set in `other`.
    pub fn merge(&mut self, other: &TextStyle) {
        if other.font_family.is_some() {
            self.font_family.clone_from(&other.font_family);
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.font_color.is_some() {
            self.font_color.clone_from(&other.font_color);
        }
        if other.font_weight.is_some() {
            self.font_weight = other.font_weight;
        }
        if other.font_style.is_some() {
            self.font_style = other.font_style;
        }
        if other.text_align.is_some() {
            self.text_align = other.text_align;
        }
        if other.text_decoration.is_some() {
            self.text_decoration = other.text_decoration;
        }
    }
}

/// What an element shows. Serialized with a `type` tag of `photo` or `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementContent {
    Photo {
        #[serde(default)]
        photo_url: Option<String>,
        #[serde(default)]
        photo_storage_path: Option<String>,
    },
    Text {
        #[serde(default)]
        text_content: Option<String>,
        #[serde(flatten)]
        style: TextStyle,
    },
}

impl ElementContent {
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Photo { .. } => ZoneType::Photo,
            Self::Text { .. } => ZoneType::Text,
        }
    }

    /// A photo referencing an uploaded asset.
    #[must_use]
    pub fn photo(photo: &UploadedPhoto) -> Self {
        Self::Photo { photo_url: Some(photo.url.clone()), photo_storage_path: Some(photo.path.clone()) }
    }

    /// Plain text with default styling.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { text_content: Some(content.into()), style: TextStyle::default() }
    }
}

/// Photo or text content placed in a zone. An element always fills its zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub zone_id: ZoneId,
    #[serde(flatten)]
    pub content: ElementContent,
}

impl Element {
    #[must_use]
    pub fn new(zone_id: ZoneId, content: ElementContent) -> Self {
        Self { id: Uuid::new_v4(), zone_id, content }
    }

    /// Geometry relative to the owning zone. Always the whole zone.
    #[must_use]
    pub fn geometry(&self) -> Rect {
        Rect::FULL
    }

    /// Merge a content patch. Fields that do not apply to this element's type
    /// are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        match &mut self.content {
            ElementContent::Photo { photo_url, photo_storage_path } => {
                if patch.photo_url.is_some() {
                    photo_url.clone_from(&patch.photo_url);
                }
                if patch.photo_storage_path.is_some() {
                    photo_storage_path.clone_from(&patch.photo_storage_path);
                }
            }
            ElementContent::Text { text_content, style } => {
                if patch.text_content.is_some() {
                    text_content.clone_from(&patch.text_content);
                }
                style.merge(&patch.style);
            }
        }
    }
}

/// An uploaded photo in the project's asset pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedPhoto {
    pub id: Uuid,
    pub url: String,
    pub path: String,
    #[serde(default)]
    pub filename: String,
}

/// A reusable, named list of zone rectangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: LayoutId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

fn default_true() -> bool {
    true
}

impl Layout {
    /// Template zones in `zone_index` order.
    #[must_use]
    pub fn sorted_zones(&self) -> Vec<&Zone> {
        let mut zones: Vec<&Zone> = self.zones.iter().collect();
        zones.sort_by(|a, b| a.zone_index.cmp(&b.zone_index).then_with(|| a.id.cmp(&b.id)));
        zones
    }

    /// Fresh page zones stamped from this template, re-indexed by order.
    #[must_use]
    pub fn stamp(&self, page_id: PageId) -> Vec<Zone> {
        self.sorted_zones()
            .into_iter()
            .zip(0..)
            .map(|(zone, index)| zone.copy_to(ZoneParent::Page(page_id), index))
            .collect()
    }
}

/// A page with everything on it, as loaded from persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub page: Page,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

// =============================================================
// Sparse updates
// =============================================================

/// Sparse update for a zone. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialZone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<ZoneType>,
}

impl PartialZone {
    /// Position and size.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            position_x: Some(rect.x),
            position_y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            zone_type: None,
        }
    }

    /// Position only; what a drag commits.
    #[must_use]
    pub fn position(rect: Rect) -> Self {
        Self { position_x: Some(rect.x), position_y: Some(rect.y), ..Self::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position_x.is_none()
            && self.position_y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.zone_type.is_none()
    }

    /// Round all geometry fields to the persisted precision. When both the
    /// position and the size of an axis are present they are rounded as edges
    /// (see [`Rect::rounded`]), so the far edge does not drift.
    #[must_use]
    pub fn rounded(&self) -> Self {
        use crate::geometry::{round_pct, round_span};
        let axis = |pos: Option<f64>, size: Option<f64>| match (pos, size) {
            (Some(p), Some(s)) => {
                let (p, s) = round_span(p, s);
                (Some(p), Some(s))
            }
            (p, s) => (p.map(round_pct), s.map(round_pct)),
        };
        let (position_x, width) = axis(self.position_x, self.width);
        let (position_y, height) = axis(self.position_y, self.height);
        Self { position_x, position_y, width, height, zone_type: self.zone_type }
    }
}

/// Sparse content update for an element. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(flatten)]
    pub style: TextStyle,
}

// =============================================================
// Photo URL resolution
// =============================================================

/// URL to display for a photo element.
///
/// Signed URLs rotate out-of-band, so the live URL is looked up in the
/// current upload pool by storage path first. The element's own URL is the
/// fallback; an element with neither (or a text element) resolves to `""`.
#[must_use]
pub fn resolve_photo_url(element: &Element, photos: &[UploadedPhoto]) -> String {
    let ElementContent::Photo { photo_url, photo_storage_path } = &element.content else {
        return String::new();
    };
    if let Some(path) = photo_storage_path {
        if let Some(photo) = photos.iter().find(|p| &p.path == path) {
            return photo.url.clone();
        }
    }
    photo_url.clone().unwrap_or_default()
}

// =============================================================
// Mutations
// =============================================================

/// A change to the document, with the state needed to undo it.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    ZoneCreated(Zone),
    ZoneUpdated { id: ZoneId, fields: PartialZone, previous: Zone },
    /// `element` is the element that was bound to the zone, removed first.
    ZoneDeleted { zone: Zone, element: Option<Element> },
    ZonesReplaced { parent: ZoneParent, zones: Vec<Zone>, previous_zones: Vec<Zone>, previous_elements: Vec<Element> },
    /// `displaced` is the element that occupied the zone before, if any.
    ElementPlaced { element: Element, displaced: Option<Element> },
    ElementUpdated { id: ElementId, patch: ElementPatch, previous: Element },
    ElementDeleted(Element),
}

impl Mutation {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZoneCreated(_) => "zone:create",
            Self::ZoneUpdated { .. } => "zone:update",
            Self::ZoneDeleted { .. } => "zone:delete",
            Self::ZonesReplaced { .. } => "zone:replace",
            Self::ElementPlaced { .. } => "element:place",
            Self::ElementUpdated { .. } => "element:update",
            Self::ElementDeleted(_) => "element:delete",
        }
    }
}

// =============================================================
// Store
// =============================================================

/// In-memory store of the pages, zones and elements being edited.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    pages: Vec<Page>,
    zones: HashMap<ZoneId, Zone>,
    elements: HashMap<ElementId, Element>,
    zone_elements: HashMap<ZoneId, ElementId>,
    photos: Vec<UploadedPhoto>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the store holds no pages and no zones.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.zones.is_empty()
    }

    // --- Pages ---

    /// Pages in `page_number` order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    /// Position of a page in book order.
    #[must_use]
    pub fn page_index(&self, id: &PageId) -> Option<usize> {
        self.pages.iter().position(|p| &p.id == id)
    }

    /// Insert or replace a page, keeping book order.
    pub fn insert_page(&mut self, page: Page) {
        if let Some(existing) = self.pages.iter_mut().find(|p| p.id == page.id) {
            *existing = page;
        } else {
            self.pages.push(page);
        }
        self.pages.sort_by_key(|p| p.page_number);
    }

    /// Remove a page together with its zones and their elements.
    pub fn remove_page(&mut self, id: &PageId) -> Option<Page> {
        let index = self.page_index(id)?;
        self.replace_zones(ZoneParent::Page(*id), Vec::new());
        Some(self.pages.remove(index))
    }

    /// Hydrate one page from a persisted snapshot, replacing whatever the
    /// store held for it.
    pub fn load_page(&mut self, snapshot: PageSnapshot) {
        let page_id = snapshot.page.id;
        self.insert_page(snapshot.page);
        self.replace_zones(ZoneParent::Page(page_id), snapshot.zones);
        for element in snapshot.elements {
            if self.zones.contains_key(&element.zone_id) {
                self.put_element(element);
            }
        }
    }

    /// Hydrate a layout's template zones as an editing surface.
    pub fn load_layout(&mut self, layout: &Layout) {
        let zones = layout
            .zones
            .iter()
            .filter(|z| z.layout_id == Some(layout.id))
            .cloned()
            .collect();
        self.replace_zones(ZoneParent::Layout(layout.id), zones);
    }

    // --- Zones ---

    #[must_use]
    pub fn zone(&self, id: &ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    /// Zones on a surface, in `zone_index` order.
    #[must_use]
    pub fn zones_on(&self, parent: ZoneParent) -> Vec<&Zone> {
        let mut zones: Vec<&Zone> = self.zones.values().filter(|z| z.parent() == Some(parent)).collect();
        zones.sort_by(|a, b| a.zone_index.cmp(&b.zone_index).then_with(|| a.id.cmp(&b.id)));
        zones
    }

    /// The index the next zone created on `parent` receives.
    #[must_use]
    pub fn next_zone_index(&self, parent: ZoneParent) -> i32 {
        self.zones_on(parent)
            .iter()
            .map(|z| z.zone_index)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Insert or replace a zone.
    pub fn insert_zone(&mut self, zone: Zone) {
        self.zones.insert(zone.id, zone);
    }

    /// Apply a partial update to an existing zone. Returns false if the zone doesn't exist.
    pub fn apply_zone_partial(&mut self, id: &ZoneId, partial: &PartialZone) -> bool {
        let Some(zone) = self.zones.get_mut(id) else {
            return false;
        };
        zone.apply_partial(partial);
        true
    }

    /// Remove a zone. Its element, if any, is removed first and returned with it.
    pub fn remove_zone(&mut self, id: &ZoneId) -> Option<(Zone, Option<Element>)> {
        if !self.zones.contains_key(id) {
            return None;
        }
        let element = self
            .zone_elements
            .get(id)
            .copied()
            .and_then(|element_id| self.remove_element(&element_id));
        let zone = self.zones.remove(id)?;
        Some((zone, element))
    }

    /// Replace every zone on `parent` with `zones`. Elements on the old zones
    /// are dropped. Returns what was removed, in `zone_index` order.
    pub fn replace_zones(&mut self, parent: ZoneParent, zones: Vec<Zone>) -> (Vec<Zone>, Vec<Element>) {
        let old_ids: Vec<ZoneId> = self.zones_on(parent).iter().map(|z| z.id).collect();
        let mut removed_zones = Vec::with_capacity(old_ids.len());
        let mut removed_elements = Vec::new();
        for id in old_ids {
            if let Some((zone, element)) = self.remove_zone(&id) {
                removed_zones.push(zone);
                removed_elements.extend(element);
            }
        }
        for zone in zones {
            self.insert_zone(zone);
        }
        (removed_zones, removed_elements)
    }

    /// The page a zone sits on, if it is a page zone.
    #[must_use]
    pub fn page_of_zone(&self, zone_id: &ZoneId) -> Option<PageId> {
        self.zones.get(zone_id).and_then(|z| z.page_id)
    }

    // --- Elements ---

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// The element occupying a zone.
    #[must_use]
    pub fn element_in_zone(&self, zone_id: &ZoneId) -> Option<&Element> {
        self.zone_elements.get(zone_id).and_then(|id| self.elements.get(id))
    }

    /// Elements on a page, in zone order.
    #[must_use]
    pub fn elements_on_page(&self, page_id: PageId) -> Vec<&Element> {
        self.zones_on(ZoneParent::Page(page_id))
            .into_iter()
            .filter_map(|z| self.element_in_zone(&z.id))
            .collect()
    }

    /// Place an element in its zone, evicting whatever occupied the zone.
    /// Returns the evicted element.
    pub fn put_element(&mut self, element: Element) -> Option<Element> {
        // Re-placing an existing element moves it; drop its old binding.
        if let Some(previous) = self.elements.get(&element.id) {
            if previous.zone_id != element.zone_id {
                self.zone_elements.remove(&previous.zone_id);
            }
        }
        let displaced = match self.zone_elements.get(&element.zone_id) {
            Some(occupant) if *occupant != element.id => self.elements.remove(occupant),
            _ => None,
        };
        self.zone_elements.insert(element.zone_id, element.id);
        self.elements.insert(element.id, element);
        displaced
    }

    /// Apply a content patch. Returns false if the element doesn't exist.
    pub fn apply_element_patch(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        element.apply_patch(patch);
        true
    }

    pub fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        let element = self.elements.remove(id)?;
        if self.zone_elements.get(&element.zone_id) == Some(id) {
            self.zone_elements.remove(&element.zone_id);
        }
        Some(element)
    }

    /// The page an element sits on.
    #[must_use]
    pub fn page_of_element(&self, id: &ElementId) -> Option<PageId> {
        self.elements.get(id).and_then(|e| self.page_of_zone(&e.zone_id))
    }

    // --- Uploaded photos ---

    #[must_use]
    pub fn photos(&self) -> &[UploadedPhoto] {
        &self.photos
    }

    pub fn set_photos(&mut self, photos: Vec<UploadedPhoto>) {
        self.photos = photos;
    }

    pub fn add_photo(&mut self, photo: UploadedPhoto) {
        self.photos.retain(|p| p.id != photo.id);
        self.photos.push(photo);
    }

    pub fn remove_photo(&mut self, id: &Uuid) -> Option<UploadedPhoto> {
        let index = self.photos.iter().position(|p| &p.id == id)?;
        Some(self.photos.remove(index))
    }

    /// Display URL for an element, resolved against the current upload pool.
    #[must_use]
    pub fn photo_url(&self, element: &Element) -> String {
        resolve_photo_url(element, &self.photos)
    }

    // --- Mutations ---

    /// Apply a mutation.
    pub fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::ZoneCreated(zone) => self.insert_zone(zone.clone()),
            Mutation::ZoneUpdated { id, fields, .. } => {
                self.apply_zone_partial(id, fields);
            }
            Mutation::ZoneDeleted { zone, .. } => {
                self.remove_zone(&zone.id);
            }
            Mutation::ZonesReplaced { parent, zones, .. } => {
                self.replace_zones(*parent, zones.clone());
            }
            Mutation::ElementPlaced { element, .. } => {
                self.put_element(element.clone());
            }
            Mutation::ElementUpdated { id, patch, .. } => {
                self.apply_element_patch(id, patch);
            }
            Mutation::ElementDeleted(element) => {
                self.remove_element(&element.id);
            }
        }
    }

    /// Undo a previously applied mutation.
    pub fn revert(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::ZoneCreated(zone) => {
                self.remove_zone(&zone.id);
            }
            Mutation::ZoneUpdated { previous, .. } => self.insert_zone(previous.clone()),
            Mutation::ZoneDeleted { zone, element } => {
                self.insert_zone(zone.clone());
                if let Some(element) = element {
                    self.put_element(element.clone());
                }
            }
            Mutation::ZonesReplaced { parent, previous_zones, previous_elements, .. } => {
                self.replace_zones(*parent, previous_zones.clone());
                for element in previous_elements {
                    self.put_element(element.clone());
                }
            }
            Mutation::ElementPlaced { element, displaced } => {
                self.remove_element(&element.id);
                if let Some(displaced) = displaced {
                    self.put_element(displaced.clone());
                }
            }
            Mutation::ElementUpdated { previous, .. } => {
                self.put_element(previous.clone());
            }
            Mutation::ElementDeleted(element) => {
                self.put_element(element.clone());
            }
        }
    }
}
