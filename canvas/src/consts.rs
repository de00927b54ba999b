//! Shared numeric constants for the canvas crate.
//!
//! All geometry is expressed in percentages of the page's content box, so the
//! page always spans `0.0..=PAGE_EXTENT` on both axes.

// ── Page space ──────────────────────────────────────────────────

/// Full extent of the page on either axis, in percent.
pub const PAGE_EXTENT: f64 = 100.0;

/// Smallest width/height a zone may have while being drawn, dragged or resized.
pub const MIN_ZONE_SIZE: f64 = 5.0;

/// Smallest extent (both axes) a draw gesture must cover to create a zone.
pub const DRAW_MIN_SIZE: f64 = 5.0;

/// Decimal places kept when geometry is committed and persisted.
pub const PERSIST_DECIMALS: i32 = 1;

// ── Pointer ─────────────────────────────────────────────────────

/// Pointer travel in screen pixels before a press on a zone becomes a drag.
pub const DRAG_ACTIVATION_PX: f64 = 8.0;

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Defaults ────────────────────────────────────────────────────

/// Rectangle used when a zone is added from a form instead of being drawn.
pub const DEFAULT_NEW_ZONE: (f64, f64, f64, f64) = (10.0, 10.0, 30.0, 30.0);

/// Layout slug meaning "no zones".
pub const BLANK_LAYOUT_SLUG: &str = "blank";
