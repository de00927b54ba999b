use uuid::Uuid;

use super::*;

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
    assert!(!Tool::Select.is_draw());
    assert!(Tool::Draw(ZoneType::Text).is_draw());
}

#[test]
fn key_classification() {
    assert!(Key("Escape".into()).is_escape());
    assert!(Key("Delete".into()).is_delete());
    assert!(Key("Backspace".into()).is_delete());
    assert!(!Key("a".into()).is_delete());
    assert!(!Key("escape".into()).is_escape());
}

#[test]
fn selection_zone_through_element() {
    let zone_id = Uuid::new_v4();
    let element_id = Uuid::new_v4();
    assert_eq!(Selection::None.zone(), None);
    assert_eq!(Selection::Zone(zone_id).zone(), Some(zone_id));
    assert_eq!(Selection::Zone(zone_id).element(), None);
    let sel = Selection::Element { zone_id, element_id };
    assert_eq!(sel.zone(), Some(zone_id));
    assert_eq!(sel.element(), Some(element_id));
}

#[test]
fn ui_active_page_only_for_page_surface() {
    let page_id = Uuid::new_v4();
    let mut ui = UiState::default();
    assert_eq!(ui.active_page(), None);
    ui.surface = Some(ZoneParent::Layout(Uuid::new_v4()));
    assert_eq!(ui.active_page(), None);
    ui.surface = Some(ZoneParent::Page(page_id));
    assert_eq!(ui.active_page(), Some(page_id));
}

#[test]
fn input_state_default_is_idle() {
    let state = InputState::default();
    assert!(!state.is_active());
    assert_eq!(state.zone_id(), None);
}

#[test]
fn input_state_zone_id_per_variant() {
    let id = Uuid::new_v4();
    let rect = Rect::new(10.0, 10.0, 30.0, 30.0);
    let pressed = InputState::Pressed { id, start_client: Point::new(0.0, 0.0), start_rect: rect };
    let resizing = InputState::ResizingZone { id, anchor: ResizeAnchor::Se, start_rect: rect, current: rect };
    let drawing = InputState::DrawingZone {
        parent: ZoneParent::Page(Uuid::new_v4()),
        zone_type: ZoneType::Photo,
        start: Point::new(0.0, 0.0),
        current: Rect::default(),
    };
    assert_eq!(pressed.zone_id(), Some(id));
    assert_eq!(resizing.zone_id(), Some(id));
    assert_eq!(drawing.zone_id(), None);
    assert!(drawing.is_active());
}
