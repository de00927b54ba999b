#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::PAGE_EXTENT;

/// A point in either client (CSS pixel) or page (percent) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, in the same space.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Clamp a page-space point onto the page.
    #[must_use]
    pub fn clamped_to_page(self) -> Point {
        Point { x: self.x.max(0.0).min(PAGE_EXTENT), y: self.y.max(0.0).min(PAGE_EXTENT) }
    }
}

/// Live bounding box of the page element in client coordinates.
///
/// Measured on every pointer event rather than cached: scrolling or a window
/// resize moves the box mid-gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasBox {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// A box with a usable area. Collapsed boxes (hidden element, zero layout)
    /// cannot map pointer positions.
    #[must_use]
    pub fn is_measurable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Convert a client-space point (CSS pixels) into page percentages.
    #[must_use]
    pub fn client_to_page(&self, client: Point) -> Point {
        if !self.is_measurable() {
            return Point::default();
        }
        Point {
            x: (client.x - self.left) / self.width * PAGE_EXTENT,
            y: (client.y - self.top) / self.height * PAGE_EXTENT,
        }
    }

    /// Convert a client-space displacement into a page-space displacement.
    #[must_use]
    pub fn client_delta_to_page(&self, dx: f64, dy: f64) -> Point {
        if !self.is_measurable() {
            return Point::default();
        }
        Point { x: dx / self.width * PAGE_EXTENT, y: dy / self.height * PAGE_EXTENT }
    }

    /// Convert a page-space point back to client coordinates.
    #[must_use]
    pub fn page_to_client(&self, page: Point) -> Point {
        Point {
            x: self.left + page.x / PAGE_EXTENT * self.width,
            y: self.top + page.y / PAGE_EXTENT * self.height,
        }
    }
}
