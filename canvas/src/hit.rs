#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{DocStore, ZoneId, ZoneParent};
use crate::geometry::ResizeAnchor;
use crate::viewport::{CanvasBox, Point};

/// Which part of a zone was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub zone_id: ZoneId,
    pub part: HitPart,
}

/// Find the zone part under the client-space pointer on `surface`.
///
/// Handles of the selected zone win over any body, since they overhang its
/// edges; the radius is in screen pixels so handles stay grabbable at any
/// canvas size. Bodies are checked top-most first (highest `zone_index`).
#[must_use]
pub fn hit_test(
    client: Point,
    canvas: &CanvasBox,
    doc: &DocStore,
    surface: ZoneParent,
    selected: Option<ZoneId>,
    handle_radius_px: f64,
) -> Option<Hit> {
    if !canvas.is_measurable() {
        return None;
    }

    if let Some(zone) = selected.and_then(|id| doc.zone(&id)).filter(|z| z.parent() == Some(surface)) {
        let rect = zone.rect();
        let handle = ResizeAnchor::ALL
            .into_iter()
            .find(|anchor| canvas.page_to_client(anchor.position_on(&rect)).distance(client) <= handle_radius_px);
        if let Some(anchor) = handle {
            return Some(Hit { zone_id: zone.id, part: HitPart::ResizeHandle(anchor) });
        }
    }

    let page = canvas.client_to_page(client);
    doc.zones_on(surface)
        .into_iter()
        .rev()
        .find(|z| z.rect().contains(page))
        .map(|z| Hit { zone_id: z.id, part: HitPart::Body })
}
