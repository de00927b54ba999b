use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

use crate::consts::{DEFAULT_NEW_ZONE, DRAG_ACTIVATION_PX, DRAW_MIN_SIZE, HANDLE_RADIUS_PX, MIN_ZONE_SIZE};
use crate::doc::{
    DocStore, Element, ElementContent, ElementId, ElementPatch, Layout, Mutation, PageSnapshot, PartialZone,
    UploadedPhoto, Zone, ZoneId, ZoneParent, ZoneType,
};
use crate::geometry::{self, Rect};
use crate::hit::{self, HitPart};
use crate::input::{Button, DropPayload, InputState, Key, Modifiers, Selection, Side, Tool, UiState};
use crate::validate::{self, ZoneValidationError};
use crate::viewport::{CanvasBox, Point};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Tunables for gesture handling. Every minimum is a parameter here rather
/// than a literal in the geometry math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Smallest width/height a resize may produce, in page percent.
    pub min_zone_size: f64,
    /// Smallest width/height a draw gesture must reach to create a zone.
    pub draw_min_size: f64,
    /// Pointer travel in CSS pixels before a press becomes a drag.
    pub drag_activation_px: f64,
    /// Grab radius of resize handles in CSS pixels.
    pub handle_radius_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_zone_size: MIN_ZONE_SIZE,
            draw_min_size: DRAW_MIN_SIZE,
            drag_activation_px: DRAG_ACTIVATION_PX,
            handle_radius_px: HANDLE_RADIUS_PX,
        }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Selection changed.
    Selected(Selection),
    /// Show `rect` on the zone's visual node. View only; the store is unchanged.
    Preview { id: ZoneId, rect: Rect },
    /// Show (or clear) the rubber band of a zone being drawn.
    PreviewDraw(Option<Rect>),
    /// Toggle CSS transitions on a zone's visual node for the length of a gesture.
    SetTransitions { id: ZoneId, enabled: bool },
    /// The store changed; the host persists this exactly once.
    Commit(Mutation),
    /// The visible spread or active side changed.
    SpreadChanged { spread: usize, side: Side },
    SetCursor(String),
    /// Non-fatal message for the user.
    Notice(String),
    RenderNeeded,
}

/// Core engine state: all logic that does not depend on the DOM.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: DocStore,
    pub ui: UiState,
    pub input: InputState,
    pub config: EngineConfig,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, ..Self::default() }
    }

    // --- Data inputs ---

    /// Hydrate one page. The first page loaded becomes the editing surface.
    pub fn load_page(&mut self, snapshot: PageSnapshot) {
        let page_id = snapshot.page.id;
        self.doc.load_page(snapshot);
        if self.ui.surface.is_none() {
            self.ui.surface = Some(ZoneParent::Page(page_id));
            self.sync_spread_to_surface();
        }
    }

    /// Hydrate a layout template and edit it.
    pub fn load_layout(&mut self, layout: &Layout) {
        self.doc.load_layout(layout);
        self.set_surface(ZoneParent::Layout(layout.id));
    }

    /// Replace the uploaded photo pool used for URL resolution.
    pub fn set_photos(&mut self, photos: Vec<UploadedPhoto>) {
        self.doc.set_photos(photos);
    }

    /// Switch the surface being edited. Any gesture in progress is dropped.
    pub fn set_surface(&mut self, surface: ZoneParent) {
        self.ui.surface = Some(surface);
        self.ui.selection = Selection::None;
        self.input = InputState::Idle;
        self.sync_spread_to_surface();
    }

    /// Undo a mutation after its persistence failed.
    pub fn revert(&mut self, mutation: &Mutation) {
        self.doc.revert(mutation);
        self.drop_dangling_selection();
    }

    // --- Tool ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    // --- Spreads ---

    /// Number of two-page spreads in the loaded book.
    #[must_use]
    pub fn spread_count(&self) -> usize {
        self.doc.pages().len().div_ceil(2)
    }

    /// Show a spread and make its left page the editing surface.
    pub fn go_to_spread(&mut self, spread: usize) -> Vec<Action> {
        let count = self.spread_count();
        if count == 0 {
            return vec![];
        }
        let spread = spread.min(count - 1);
        self.activate_page_at(spread * 2)
    }

    pub fn next_spread(&mut self) -> Vec<Action> {
        self.go_to_spread(self.ui.spread + 1)
    }

    pub fn prev_spread(&mut self) -> Vec<Action> {
        self.go_to_spread(self.ui.spread.saturating_sub(1))
    }

    /// Make one side of the current spread the editing surface. A missing
    /// right page (odd page count) is ignored.
    pub fn set_side(&mut self, side: Side) -> Vec<Action> {
        let index = self.ui.spread * 2 + usize::from(side == Side::Right);
        if index >= self.doc.pages().len() {
            return vec![];
        }
        self.activate_page_at(index)
    }

    fn activate_page_at(&mut self, index: usize) -> Vec<Action> {
        let Some(page) = self.doc.pages().get(index) else {
            return vec![];
        };
        let surface = ZoneParent::Page(page.id);
        let changed = self.ui.surface != Some(surface);
        self.set_surface(surface);
        let mut actions = vec![Action::SpreadChanged { spread: self.ui.spread, side: self.ui.side }];
        if changed {
            actions.push(Action::Selected(Selection::None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn sync_spread_to_surface(&mut self) {
        if let Some(page_id) = self.ui.active_page() {
            if let Some(index) = self.doc.page_index(&page_id) {
                self.ui.spread = index / 2;
                self.ui.side = if index % 2 == 0 { Side::Left } else { Side::Right };
            }
        }
    }

    // --- Selection ---

    /// Select an element, navigating to the spread and side of its page.
    pub fn select_element(&mut self, id: &ElementId) -> Vec<Action> {
        let Some(element) = self.doc.element(id) else {
            return vec![];
        };
        let zone_id = element.zone_id;
        let Some(page_id) = self.doc.page_of_zone(&zone_id) else {
            return vec![];
        };
        let mut actions = Vec::new();
        if self.ui.surface != Some(ZoneParent::Page(page_id)) {
            self.set_surface(ZoneParent::Page(page_id));
            actions.push(Action::SpreadChanged { spread: self.ui.spread, side: self.ui.side });
        }
        self.ui.selection = Selection::Element { zone_id, element_id: *id };
        actions.push(Action::Selected(self.ui.selection));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Select a zone on the current surface, or clear the selection with `None`.
    pub fn select_zone(&mut self, id: Option<ZoneId>) -> Vec<Action> {
        let selection = match id {
            Some(id) if self.zone_on_surface(&id).is_some() => self.selection_for_zone(id),
            Some(_) => return vec![],
            None => Selection::None,
        };
        self.set_selection(selection)
    }

    fn selection_for_zone(&self, zone_id: ZoneId) -> Selection {
        match self.doc.element_in_zone(&zone_id) {
            Some(element) => Selection::Element { zone_id, element_id: element.id },
            None => Selection::Zone(zone_id),
        }
    }

    fn set_selection(&mut self, selection: Selection) -> Vec<Action> {
        if self.ui.selection == selection {
            return vec![];
        }
        self.ui.selection = selection;
        vec![Action::Selected(selection), Action::RenderNeeded]
    }

    fn drop_dangling_selection(&mut self) {
        let dangling = match self.ui.selection {
            Selection::None => false,
            Selection::Zone(zone_id) => self.doc.zone(&zone_id).is_none(),
            Selection::Element { element_id, .. } => self.doc.element(&element_id).is_none(),
        };
        if dangling {
            self.ui.selection = self
                .ui
                .selection
                .zone()
                .filter(|id| self.doc.zone(id).is_some())
                .map_or(Selection::None, Selection::Zone);
        }
    }

    fn zone_on_surface(&self, id: &ZoneId) -> Option<&Zone> {
        self.doc.zone(id).filter(|z| z.parent().is_some() && z.parent() == self.ui.surface)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, canvas: CanvasBox, client: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || self.input.is_active() || !canvas.is_measurable() {
            return vec![];
        }
        let Some(surface) = self.ui.surface else {
            return vec![];
        };

        if let Tool::Draw(zone_type) = self.ui.tool {
            let start = canvas.client_to_page(client).clamped_to_page();
            self.input = InputState::DrawingZone { parent: surface, zone_type, start, current: Rect::new(start.x, start.y, 0.0, 0.0) };
            return vec![Action::SetCursor("crosshair".into())];
        }

        let selected = self.ui.selection.zone();
        match hit::hit_test(client, &canvas, &self.doc, surface, selected, self.config.handle_radius_px) {
            Some(hit) => {
                let Some(start_rect) = self.doc.zone(&hit.zone_id).map(Zone::rect) else {
                    return vec![];
                };
                match hit.part {
                    HitPart::ResizeHandle(anchor) => {
                        self.input = InputState::ResizingZone { id: hit.zone_id, anchor, start_rect, current: start_rect };
                        vec![
                            Action::SetTransitions { id: hit.zone_id, enabled: false },
                            Action::SetCursor(anchor.cursor().into()),
                        ]
                    }
                    HitPart::Body => {
                        self.input = InputState::Pressed { id: hit.zone_id, start_client: client, start_rect };
                        // Selection is immediate; it does not wait for release.
                        self.set_selection(self.selection_for_zone(hit.zone_id))
                    }
                }
            }
            None => self.set_selection(Selection::None),
        }
    }

    pub fn on_pointer_move(&mut self, canvas: CanvasBox, client: Point, _modifiers: Modifiers) -> Vec<Action> {
        if !canvas.is_measurable() {
            return vec![];
        }
        match self.input {
            InputState::Idle => self.hover_cursor(&canvas, client),
            InputState::Pressed { id, start_client, start_rect } => {
                if client.distance(start_client) < self.config.drag_activation_px {
                    return vec![];
                }
                let rect = drag_from(&canvas, start_client, client, start_rect);
                self.input = InputState::DraggingZone { id, start_client, start_rect, current: rect };
                vec![
                    Action::SetTransitions { id, enabled: false },
                    Action::SetCursor("move".into()),
                    Action::Preview { id, rect },
                ]
            }
            InputState::DraggingZone { id, start_client, start_rect, ref mut current } => {
                let rect = drag_from(&canvas, start_client, client, start_rect);
                *current = rect;
                vec![Action::Preview { id, rect }]
            }
            InputState::ResizingZone { id, anchor, start_rect, ref mut current } => {
                let pointer = canvas.client_to_page(client);
                let rect = geometry::resize(anchor, pointer, start_rect, self.config.min_zone_size);
                *current = rect;
                vec![Action::Preview { id, rect }]
            }
            InputState::DrawingZone { start, ref mut current, .. } => {
                let rect = geometry::rect_from_points(start, canvas.client_to_page(client).clamped_to_page());
                *current = rect;
                vec![Action::PreviewDraw(Some(rect))]
            }
        }
    }

    /// Pointer release anywhere in the document ends the gesture.
    pub fn on_pointer_up(&mut self, canvas: CanvasBox, client: Point, _button: Button, modifiers: Modifiers) -> Vec<Action> {
        // The release position counts as a final move.
        let mut actions: Vec<Action> = self
            .on_pointer_move(canvas, client, modifiers)
            .into_iter()
            .filter(|a| !matches!(a, Action::SetCursor(_)))
            .collect();

        match std::mem::take(&mut self.input) {
            InputState::Idle => return vec![],
            InputState::Pressed { .. } => {}
            InputState::DraggingZone { id, current, .. } => {
                actions.push(Action::SetTransitions { id, enabled: true });
                actions.extend(self.commit_zone_fields(id, PartialZone::position(current).rounded()));
            }
            InputState::ResizingZone { id, current, .. } => {
                actions.push(Action::SetTransitions { id, enabled: true });
                actions.extend(self.commit_zone_fields(id, PartialZone::from_rect(current).rounded()));
            }
            InputState::DrawingZone { parent, zone_type, start, current } => {
                actions.push(Action::PreviewDraw(None));
                if let Some(rect) = geometry::drawn_zone(start, far_corner(start, current), self.config.draw_min_size) {
                    let zone = Zone::new(parent, self.doc.next_zone_index(parent), rect.rounded(), zone_type);
                    let id = zone.id;
                    actions.extend(self.commit(Mutation::ZoneCreated(zone)));
                    actions.extend(self.set_selection(Selection::Zone(id)));
                }
            }
        }
        actions.push(Action::SetCursor("default".into()));
        actions
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_escape() {
            return self.cancel_gesture();
        }
        if key.is_delete() && !self.input.is_active() {
            return match self.ui.selection {
                Selection::Element { element_id, .. } => self.delete_element(&element_id),
                Selection::Zone(zone_id) => self.delete_zone(&zone_id),
                Selection::None => vec![],
            };
        }
        vec![]
    }

    /// Abandon the gesture in progress: the view returns to the start
    /// rectangle and nothing is committed. With no gesture, clears the selection.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => self.set_selection(Selection::None),
            InputState::Pressed { .. } => vec![],
            InputState::DraggingZone { id, start_rect, .. } | InputState::ResizingZone { id, start_rect, .. } => vec![
                Action::Preview { id, rect: start_rect },
                Action::SetTransitions { id, enabled: true },
                Action::SetCursor("default".into()),
            ],
            InputState::DrawingZone { .. } => vec![Action::PreviewDraw(None), Action::SetCursor("default".into())],
        }
    }

    /// Drop sidebar content onto a zone. Whatever occupied the zone is replaced.
    pub fn on_drop(&mut self, zone_id: &ZoneId, payload: DropPayload) -> Vec<Action> {
        if self.input.is_active() || self.doc.zone(zone_id).is_none() {
            return vec![];
        }
        let content = match &payload {
            DropPayload::Photo(photo) => ElementContent::photo(photo),
            DropPayload::Text(text) => ElementContent::text(text.clone()),
        };
        let element = Element::new(*zone_id, content);
        let element_id = element.id;
        let displaced = self.doc.element_in_zone(zone_id).cloned();
        let mut actions = self.commit(Mutation::ElementPlaced { element, displaced });
        actions.extend(self.select_element(&element_id));
        actions
    }

    // --- Direct edits ---

    /// Commit text from the host's inline editor.
    pub fn set_text(&mut self, id: &ElementId, text: String) -> Vec<Action> {
        match self.doc.element(id).map(|e| &e.content) {
            Some(ElementContent::Text { .. }) => {}
            _ => return vec![],
        }
        self.update_element(id, ElementPatch { text_content: Some(text), ..ElementPatch::default() })
    }

    /// Apply a content patch to an element.
    pub fn update_element(&mut self, id: &ElementId, patch: ElementPatch) -> Vec<Action> {
        let Some(previous) = self.doc.element(id).cloned() else {
            return vec![];
        };
        self.commit(Mutation::ElementUpdated { id: *id, patch, previous })
    }

    /// Numeric edits from a zone form. Values are rounded, validated and
    /// checked against the page edges after merging.
    ///
    /// # Errors
    ///
    /// Returns the validation problems; the store is left untouched.
    pub fn set_zone_fields(&mut self, id: &ZoneId, fields: PartialZone) -> Result<Vec<Action>, ZoneValidationError> {
        let fields = fields.rounded();
        validate::validate_partial(&fields, self.config.min_zone_size)?;
        let Some(zone) = self.doc.zone(id) else {
            return Ok(vec![]);
        };
        let mut merged = zone.clone();
        merged.apply_partial(&fields);
        validate::validate_fits_page(merged.rect())?;
        let mut actions = self.commit_zone_fields(*id, fields);
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Add a default-sized zone to the current surface.
    pub fn add_zone(&mut self) -> Vec<Action> {
        let Some(surface) = self.ui.surface else {
            return vec![];
        };
        let (x, y, width, height) = DEFAULT_NEW_ZONE;
        let zone_type = match self.ui.tool {
            Tool::Draw(zone_type) => zone_type,
            Tool::Select => ZoneType::Photo,
        };
        let zone = Zone::new(surface, self.doc.next_zone_index(surface), Rect::new(x, y, width, height), zone_type);
        let id = zone.id;
        let mut actions = self.commit(Mutation::ZoneCreated(zone));
        actions.extend(self.set_selection(Selection::Zone(id)));
        actions
    }

    /// Delete a zone and the element it holds.
    pub fn delete_zone(&mut self, id: &ZoneId) -> Vec<Action> {
        let Some(zone) = self.doc.zone(id).cloned() else {
            return vec![];
        };
        let element = self.doc.element_in_zone(id).cloned();
        let mut actions = self.commit(Mutation::ZoneDeleted { zone, element });
        actions.extend(self.clear_selection_if_gone());
        actions
    }

    pub fn delete_element(&mut self, id: &ElementId) -> Vec<Action> {
        let Some(element) = self.doc.element(id).cloned() else {
            return vec![];
        };
        let zone_id = element.zone_id;
        let mut actions = self.commit(Mutation::ElementDeleted(element));
        if self.ui.selection.element() == Some(*id) {
            actions.extend(self.set_selection(Selection::Zone(zone_id)));
        }
        actions
    }

    /// Replace every zone on the active page with fresh copies of the
    /// layout's template zones. Elements on the page are dropped.
    pub fn apply_layout(&mut self, layout: &Layout) -> Vec<Action> {
        let Some(page_id) = self.ui.active_page() else {
            return vec![];
        };
        if self.input.is_active() {
            return vec![];
        }
        let parent = ZoneParent::Page(page_id);
        let zones = layout.stamp(page_id);
        let (previous_zones, previous_elements) = self.doc.replace_zones(parent, zones.clone());
        self.ui.selection = Selection::None;
        vec![
            Action::Commit(Mutation::ZonesReplaced { parent, zones, previous_zones, previous_elements }),
            Action::Selected(Selection::None),
            Action::RenderNeeded,
        ]
    }

    fn clear_selection_if_gone(&mut self) -> Vec<Action> {
        let before = self.ui.selection;
        self.drop_dangling_selection();
        if self.ui.selection == before {
            vec![]
        } else {
            vec![Action::Selected(self.ui.selection), Action::RenderNeeded]
        }
    }

    /// Apply a mutation locally and emit it for persistence.
    fn commit(&mut self, mutation: Mutation) -> Vec<Action> {
        self.doc.apply(&mutation);
        vec![Action::Commit(mutation), Action::RenderNeeded]
    }

    /// Commit geometry for a zone. A zone that vanished mid-gesture is a no-op.
    fn commit_zone_fields(&mut self, id: ZoneId, fields: PartialZone) -> Vec<Action> {
        let Some(previous) = self.doc.zone(&id).cloned() else {
            return vec![];
        };
        self.commit(Mutation::ZoneUpdated { id, fields, previous })
    }

    fn hover_cursor(&self, canvas: &CanvasBox, client: Point) -> Vec<Action> {
        let Some(surface) = self.ui.surface else {
            return vec![];
        };
        if self.ui.tool.is_draw() {
            return vec![Action::SetCursor("crosshair".into())];
        }
        let hit = hit::hit_test(client, canvas, &self.doc, surface, self.ui.selection.zone(), self.config.handle_radius_px);
        let cursor = match hit.map(|h| h.part) {
            Some(HitPart::ResizeHandle(anchor)) => anchor.cursor(),
            Some(HitPart::Body) => "move",
            None => "default",
        };
        vec![Action::SetCursor(cursor.into())]
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.ui.selection
    }

    #[must_use]
    pub fn zone(&self, id: &ZoneId) -> Option<&Zone> {
        self.doc.zone(id)
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.element(id)
    }

    /// Zones of the current surface in `zone_index` order.
    #[must_use]
    pub fn surface_zones(&self) -> Vec<&Zone> {
        self.ui.surface.map(|s| self.doc.zones_on(s)).unwrap_or_default()
    }

    /// Display URL for a photo element.
    #[must_use]
    pub fn photo_url(&self, element: &Element) -> String {
        self.doc.photo_url(element)
    }
}

/// Drag delta is measured from the press, in client pixels, and converted
/// with the canvas box of the current event.
fn drag_from(canvas: &CanvasBox, start_client: Point, client: Point, start_rect: Rect) -> Rect {
    let delta = canvas.client_delta_to_page(client.x - start_client.x, client.y - start_client.y);
    geometry::drag(delta.x, delta.y, start_rect)
}

/// The corner of `current` opposite `start`.
fn far_corner(start: Point, current: Rect) -> Point {
    let x = if current.x < start.x { current.x } else { current.right() };
    let y = if current.y < start.y { current.y } else { current.bottom() };
    Point::new(x, y)
}

/// The full engine. Wraps `EngineCore` and owns the page element in the DOM.
///
/// Previews are written straight onto zone nodes (`[data-zone-id]`) so a
/// gesture never goes through the host's render cycle. Actions the wrapper
/// cannot apply itself are handed back to the host.
pub struct Engine {
    root: HtmlElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the page element.
    #[must_use]
    pub fn new(root: HtmlElement) -> Self {
        Self { root, core: EngineCore::new() }
    }

    /// Live bounding box of the page element.
    #[must_use]
    pub fn measure(&self) -> CanvasBox {
        let rect = self.root.get_bounding_client_rect();
        CanvasBox::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    // --- Delegated data inputs ---

    pub fn load_page(&mut self, snapshot: PageSnapshot) {
        self.core.load_page(snapshot);
    }

    pub fn load_layout(&mut self, layout: &Layout) {
        self.core.load_layout(layout);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.core.set_tool(tool);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let canvas = self.measure();
        let actions = self.core.on_pointer_down(canvas, client, button, modifiers);
        self.present(actions)
    }

    pub fn on_pointer_move(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        let canvas = self.measure();
        let actions = self.core.on_pointer_move(canvas, client, modifiers);
        self.present(actions)
    }

    pub fn on_pointer_up(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let canvas = self.measure();
        let actions = self.core.on_pointer_up(canvas, client, button, modifiers);
        self.present(actions)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_down(key, modifiers);
        self.present(actions)
    }

    // --- DOM ---

    /// Apply view-only actions to the DOM; return everything else. An action
    /// that fails to apply is returned too, so the host can render it.
    fn present(&self, actions: Vec<Action>) -> Vec<Action> {
        actions
            .into_iter()
            .filter(|action| match action {
                Action::Preview { id, rect } => self.write_zone_rect(id, *rect).is_err(),
                Action::PreviewDraw(rect) => self.write_draw_preview(*rect).is_err(),
                Action::SetTransitions { id, enabled } => self.write_transitions(id, *enabled).is_err(),
                _ => true,
            })
            .collect()
    }

    fn node(&self, selector: &str) -> Result<HtmlElement, JsValue> {
        let node = self
            .root
            .query_selector(selector)?
            .ok_or_else(|| JsValue::from_str(&format!("no node for {selector}")))?;
        node.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }

    fn write_zone_rect(&self, id: &ZoneId, rect: Rect) -> Result<(), JsValue> {
        write_rect(&self.node(&zone_selector(id))?, rect)
    }

    fn write_draw_preview(&self, rect: Option<Rect>) -> Result<(), JsValue> {
        let node = self.node("[data-draw-preview]")?;
        let Some(rect) = rect else {
            return node.style().set_property("display", "none");
        };
        node.style().set_property("display", "block")?;
        write_rect(&node, rect)
    }

    fn write_transitions(&self, id: &ZoneId, enabled: bool) -> Result<(), JsValue> {
        let style = self.node(&zone_selector(id))?.style();
        if enabled {
            style.remove_property("transition").map(drop)
        } else {
            style.set_property("transition", "none")
        }
    }
}

fn write_rect(node: &HtmlElement, rect: Rect) -> Result<(), JsValue> {
    let style = node.style();
    style.set_property("left", &format!("{}%", rect.x))?;
    style.set_property("top", &format!("{}%", rect.y))?;
    style.set_property("width", &format!("{}%", rect.width))?;
    style.set_property("height", &format!("{}%", rect.height))
}

fn zone_selector(id: &ZoneId) -> String {
    format!("[data-zone-id=\"{id}\"]")
}
