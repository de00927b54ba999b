//! Zone input validation.
//!
//! Checks run on data arriving from forms and the network before it reaches
//! the store. Geometry produced by [`crate::geometry`] is valid by
//! construction and does not need to pass through here. All failures are
//! collected rather than stopping at the first one, so a form can show every
//! problem at once.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use crate::consts::PAGE_EXTENT;
use crate::doc::{PartialZone, Zone};
use crate::geometry::Rect;

/// Slack for sums of one-decimal values, which are not exact in binary.
const FIT_EPSILON: f64 = 1e-9;

/// One or more problems with a zone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid zone: {}", .errors.join("; "))]
pub struct ZoneValidationError {
    pub errors: Vec<String>,
}

impl ZoneValidationError {
    fn check(errors: Vec<String>) -> Result<(), Self> {
        if errors.is_empty() { Ok(()) } else { Err(Self { errors }) }
    }
}

fn in_page_bounds(value: f64) -> bool {
    (0.0..=PAGE_EXTENT).contains(&value)
}

fn check_partial(partial: &PartialZone, min_size: f64, errors: &mut Vec<String>) {
    for (name, value) in [("position_x", partial.position_x), ("position_y", partial.position_y)] {
        if let Some(v) = value {
            if !in_page_bounds(v) {
                errors.push(format!("{name} must be between 0 and 100"));
            }
        }
    }
    for (name, value) in [("width", partial.width), ("height", partial.height)] {
        if let Some(v) = value {
            if !in_page_bounds(v) {
                errors.push(format!("{name} must be between 0 and 100"));
            }
            if v < min_size {
                errors.push(format!("{name} must be at least {min_size}%"));
            }
        }
    }
}

/// Validate the fields present in a sparse update.
///
/// # Errors
///
/// Returns every bound or minimum-size violation found.
pub fn validate_partial(partial: &PartialZone, min_size: f64) -> Result<(), ZoneValidationError> {
    let mut errors = Vec::new();
    check_partial(partial, min_size, &mut errors);
    ZoneValidationError::check(errors)
}

/// Check that a rectangle does not overflow the page's right or bottom edge.
///
/// # Errors
///
/// Returns one message per overflowing edge.
pub fn validate_fits_page(rect: Rect) -> Result<(), ZoneValidationError> {
    let mut errors = Vec::new();
    if rect.right() > PAGE_EXTENT + FIT_EPSILON {
        errors.push("Zone overflows right edge of canvas".to_owned());
    }
    if rect.bottom() > PAGE_EXTENT + FIT_EPSILON {
        errors.push("Zone overflows bottom edge of canvas".to_owned());
    }
    ZoneValidationError::check(errors)
}

/// Validate a complete zone: owner, index, bounds, minimum size and fit.
///
/// # Errors
///
/// Returns every violation found.
pub fn validate_zone(zone: &Zone, min_size: f64) -> Result<(), ZoneValidationError> {
    let mut errors = Vec::new();
    match (zone.page_id, zone.layout_id) {
        (None, None) => errors.push("Zone must belong to either a layout or a page".to_owned()),
        (Some(_), Some(_)) => errors.push("Zone cannot belong to both a layout and a page".to_owned()),
        _ => {}
    }
    if zone.zone_index < 0 {
        errors.push("zone_index must be non-negative".to_owned());
    }
    check_partial(&PartialZone::from_rect(zone.rect()), min_size, &mut errors);
    if let Err(fit) = validate_fits_page(zone.rect()) {
        errors.extend(fit.errors);
    }
    ZoneValidationError::check(errors)
}
