//! Input model: tools, modifier keys, mouse buttons, selection and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `UiState` is the explicit editing context (selection, active
//! surface, visible spread) handed to every handler instead of living in
//! globals. `InputState` is the gesture being tracked between pointer-down and
//! pointer-up; each active variant carries the start rectangle so the final
//! geometry is always computed from the start, never accumulated.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::{ElementId, PageId, UploadedPhoto, ZoneId, ZoneParent, ZoneType};
use crate::geometry::{Rect, ResizeAnchor};
use crate::viewport::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select, move and resize zones (default).
    #[default]
    Select,
    /// Draw a new zone of the given type.
    Draw(ZoneType),
}

impl Tool {
    /// Whether this tool draws new zones.
    #[must_use]
    pub fn is_draw(self) -> bool {
        matches!(self, Self::Draw(_))
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete" || self.0 == "Backspace"
    }
}

/// Content dragged from the sidebar onto a zone.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    Photo(UploadedPhoto),
    Text(String),
}

/// What is selected. Selecting an element implies its zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Zone(ZoneId),
    Element { zone_id: ZoneId, element_id: ElementId },
}

impl Selection {
    /// The selected zone, directly or through its element.
    #[must_use]
    pub fn zone(self) -> Option<ZoneId> {
        match self {
            Self::None => None,
            Self::Zone(id) | Self::Element { zone_id: id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn element(self) -> Option<ElementId> {
        match self {
            Self::Element { element_id, .. } => Some(element_id),
            _ => None,
        }
    }
}

/// Which page of a spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

/// Explicit editing context visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    pub selection: Selection,
    /// The page or layout whose zones are being edited.
    pub surface: Option<ZoneParent>,
    /// Index of the visible spread (pages `2n` and `2n + 1`).
    pub spread: usize,
    /// Which page of the spread is active.
    pub side: Side,
}

impl UiState {
    /// The active page, when editing a page rather than a layout.
    #[must_use]
    pub fn active_page(&self) -> Option<PageId> {
        match self.surface {
            Some(ZoneParent::Page(id)) => Some(id),
            _ => None,
        }
    }
}

/// Internal state for the input state machine.
///
/// Only one variant is active at a time, so a zone can never be dragged and
/// resized at once.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pointer is down on a zone body but has not moved past the activation
    /// distance. Releasing here is a plain click.
    Pressed {
        id: ZoneId,
        /// Client-space position of the press.
        start_client: Point,
        start_rect: Rect,
    },
    /// The user is moving a zone.
    DraggingZone {
        id: ZoneId,
        start_client: Point,
        start_rect: Rect,
        /// Rectangle currently shown on the visual node.
        current: Rect,
    },
    /// The user is dragging one of a selected zone's eight handles.
    ResizingZone {
        id: ZoneId,
        anchor: ResizeAnchor,
        start_rect: Rect,
        current: Rect,
    },
    /// The user is drawing a new zone from an empty point.
    DrawingZone {
        parent: ZoneParent,
        zone_type: ZoneType,
        /// Page-space corner where the gesture started.
        start: Point,
        /// Current rubber-band rectangle, not yet validated.
        current: Rect,
    },
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The zone the gesture is acting on, if any.
    #[must_use]
    pub fn zone_id(&self) -> Option<ZoneId> {
        match self {
            Self::Pressed { id, .. } | Self::DraggingZone { id, .. } | Self::ResizingZone { id, .. } => Some(*id),
            Self::Idle | Self::DrawingZone { .. } => None,
        }
    }
}
