#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn canvas() -> CanvasBox {
    CanvasBox::new(100.0, 50.0, 400.0, 200.0)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_distance() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_clamped_to_page() {
    let p = Point::new(-4.0, 140.0).clamped_to_page();
    assert_eq!(p, Point::new(0.0, 100.0));
}

// =============================================================
// CanvasBox
// =============================================================

#[test]
fn client_to_page_origin_is_zero() {
    let p = canvas().client_to_page(Point::new(100.0, 50.0));
    assert!(approx_eq(p.x, 0.0));
    assert!(approx_eq(p.y, 0.0));
}

#[test]
fn client_to_page_far_corner_is_hundred() {
    let p = canvas().client_to_page(Point::new(500.0, 250.0));
    assert!(approx_eq(p.x, 100.0));
    assert!(approx_eq(p.y, 100.0));
}

#[test]
fn client_to_page_uses_each_axis_size() {
    let p = canvas().client_to_page(Point::new(200.0, 100.0));
    assert!(approx_eq(p.x, 25.0));
    assert!(approx_eq(p.y, 25.0));
}

#[test]
fn client_to_page_outside_is_not_clamped() {
    let p = canvas().client_to_page(Point::new(0.0, 0.0));
    assert!(p.x < 0.0);
    assert!(p.y < 0.0);
}

#[test]
fn moved_box_changes_mapping() {
    let before = canvas().client_to_page(Point::new(300.0, 150.0));
    let scrolled = CanvasBox::new(100.0, 0.0, 400.0, 200.0);
    let after = scrolled.client_to_page(Point::new(300.0, 150.0));
    assert!(approx_eq(before.y, 50.0));
    assert!(approx_eq(after.y, 75.0));
}

#[test]
fn client_delta_to_page_scales_by_size() {
    let d = canvas().client_delta_to_page(40.0, -20.0);
    assert!(approx_eq(d.x, 10.0));
    assert!(approx_eq(d.y, -10.0));
}

#[test]
fn collapsed_box_maps_to_origin() {
    let collapsed = CanvasBox::new(10.0, 10.0, 0.0, 0.0);
    assert!(!collapsed.is_measurable());
    assert_eq!(collapsed.client_to_page(Point::new(50.0, 50.0)), Point::default());
    assert_eq!(collapsed.client_delta_to_page(5.0, 5.0), Point::default());
}

#[test]
fn page_to_client_inverts_client_to_page() {
    let c = canvas();
    let client = Point::new(321.0, 77.0);
    let back = c.page_to_client(c.client_to_page(client));
    assert!(approx_eq(back.x, client.x));
    assert!(approx_eq(back.y, client.y));
}
