//! Page-space rectangle math for drag, resize and draw gestures.
//!
//! Every function here is pure: the same inputs always give the same output,
//! and no input is ever mutated. Coordinates are percentages of the page, so
//! the valid region is `0..=100` on both axes.
//!
//! The outputs of [`resize`] and [`drag`] are always valid rectangles for a
//! valid start rectangle:
//!
//! * `x >= 0`, `y >= 0`, `x + width <= 100`, `y + height <= 100`
//! * `width >= min_size`, `height >= min_size`
//! * the edge opposite a dragged resize handle never moves.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{PAGE_EXTENT, PERSIST_DECIMALS};
use crate::viewport::Point;

/// An axis-aligned rectangle in page percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// The whole page. Elements bound to a zone always occupy this rectangle
    /// relative to the zone.
    pub const FULL: Rect = Rect { x: 0.0, y: 0.0, width: PAGE_EXTENT, height: PAGE_EXTENT };

    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `pt` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// Whether the rectangle lies on the page and is at least `min_size` on both axes.
    #[must_use]
    pub fn is_valid(&self, min_size: f64) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width >= min_size
            && self.height >= min_size
            && self.right() <= PAGE_EXTENT + f64::EPSILON * PAGE_EXTENT
            && self.bottom() <= PAGE_EXTENT + f64::EPSILON * PAGE_EXTENT
    }

    /// Round to the persisted precision by edges: the origin and the far edge
    /// are rounded, and the extents are what lies between them. An edge that
    /// was already at persisted precision stays exactly where it was.
    #[must_use]
    pub fn rounded(&self) -> Rect {
        let (x, width) = round_span(self.x, self.width);
        let (y, height) = round_span(self.y, self.height);
        Rect { x, y, width, height }
    }
}

/// Round a percentage to the persisted precision (one decimal place).
#[must_use]
pub fn round_pct(value: f64) -> f64 {
    let scale = 10f64.powi(PERSIST_DECIMALS);
    (value * scale).round() / scale
}

/// Round the start and end of a span on one axis, returning `(start, extent)`.
/// The end never passes the page edge.
#[must_use]
pub fn round_span(start: f64, extent: f64) -> (f64, f64) {
    let lo = round_pct(start);
    let hi = round_pct(start + extent).min(PAGE_EXTENT);
    (lo, round_pct(hi - lo))
}

/// Clamp into `[lo, hi]`, letting `lo` win when the range is empty.
///
/// `f64::clamp` panics on `lo > hi`; this never does.
fn clamp_lo_wins(value: f64, lo: f64, hi: f64) -> f64 {
    value.min(hi).max(lo)
}

// =============================================================
// Resize handles
// =============================================================

/// One of the eight compass handles drawn around a selected zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [
        ResizeAnchor::N,
        ResizeAnchor::Ne,
        ResizeAnchor::E,
        ResizeAnchor::Se,
        ResizeAnchor::S,
        ResizeAnchor::Sw,
        ResizeAnchor::W,
        ResizeAnchor::Nw,
    ];

    #[must_use]
    pub fn moves_north(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    #[must_use]
    pub fn moves_south(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    #[must_use]
    pub fn moves_east(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    #[must_use]
    pub fn moves_west(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Page-space position of this handle on `rect`.
    #[must_use]
    pub fn position_on(self, rect: &Rect) -> Point {
        let x = if self.moves_west() {
            rect.x
        } else if self.moves_east() {
            rect.right()
        } else {
            rect.x + rect.width / 2.0
        };
        let y = if self.moves_north() {
            rect.y
        } else if self.moves_south() {
            rect.bottom()
        } else {
            rect.y + rect.height / 2.0
        };
        Point::new(x, y)
    }

    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::Ne => "ne",
            Self::E => "e",
            Self::Se => "se",
            Self::S => "s",
            Self::Sw => "sw",
            Self::W => "w",
            Self::Nw => "nw",
        }
    }
}

impl fmt::Display for ResizeAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a handle name that is not one of the eight compass directions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resize handle: {0:?}")]
pub struct UnknownAnchor(pub String);

impl FromStr for ResizeAnchor {
    type Err = UnknownAnchor;

    /// Accepts the vertical part first (`"ne"`) or the horizontal part first
    /// (`"en"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let north = lower.contains('n');
        let south = lower.contains('s');
        let east = lower.contains('e');
        let west = lower.contains('w');
        let known = lower.chars().all(|c| matches!(c, 'n' | 's' | 'e' | 'w'));
        let anchor = match (north, south, east, west) {
            _ if !known || lower.is_empty() || lower.len() > 2 => None,
            (true, false, false, false) => Some(Self::N),
            (false, true, false, false) => Some(Self::S),
            (false, false, true, false) => Some(Self::E),
            (false, false, false, true) => Some(Self::W),
            (true, false, true, false) => Some(Self::Ne),
            (true, false, false, true) => Some(Self::Nw),
            (false, true, true, false) => Some(Self::Se),
            (false, true, false, true) => Some(Self::Sw),
            _ => None,
        };
        anchor.ok_or(UnknownAnchor(s.to_owned()))
    }
}

// =============================================================
// Gesture math
// =============================================================

/// Resize `start` by dragging `anchor` to the page-space `pointer`.
///
/// East/south handles move the far edge and keep the origin; west/north
/// handles move the origin and keep the far edge fixed. The moving edge stops
/// `min_size` short of the fixed one, so the rectangle never inverts.
#[must_use]
pub fn resize(anchor: ResizeAnchor, pointer: Point, start: Rect, min_size: f64) -> Rect {
    let mut out = start;

    if anchor.moves_east() {
        out.width = clamp_lo_wins(pointer.x - start.x, min_size, PAGE_EXTENT - start.x);
    }
    if anchor.moves_west() {
        let right = start.right();
        out.x = clamp_lo_wins(pointer.x, 0.0, right - min_size);
        out.width = right - out.x;
    }

    if anchor.moves_south() {
        out.height = clamp_lo_wins(pointer.y - start.y, min_size, PAGE_EXTENT - start.y);
    }
    if anchor.moves_north() {
        let bottom = start.bottom();
        out.y = clamp_lo_wins(pointer.y, 0.0, bottom - min_size);
        out.height = bottom - out.y;
    }

    out
}

/// Translate `start` by a page-space delta, keeping it on the page. Size is unchanged.
#[must_use]
pub fn drag(dx: f64, dy: f64, start: Rect) -> Rect {
    Rect {
        x: clamp_lo_wins(start.x + dx, 0.0, PAGE_EXTENT - start.width),
        y: clamp_lo_wins(start.y + dy, 0.0, PAGE_EXTENT - start.height),
        ..start
    }
}

/// The rectangle spanned by two opposite corners, in any order.
#[must_use]
pub fn rect_from_points(a: Point, b: Point) -> Rect {
    Rect {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: (b.x - a.x).abs(),
        height: (b.y - a.y).abs(),
    }
}

/// The zone rectangle a draw gesture from `a` to `b` produces, or `None` when
/// either side is shorter than `min_size` (the gesture was a click).
#[must_use]
pub fn drawn_zone(a: Point, b: Point, min_size: f64) -> Option<Rect> {
    let rect = rect_from_points(a, b);
    (rect.width >= min_size && rect.height >= min_size).then_some(rect)
}
