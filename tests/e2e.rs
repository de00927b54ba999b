//! End-to-end: the router served on a real socket, driven through
//! `HttpRepository` so each repository operation crosses HTTP.

#![allow(clippy::float_cmp)]

use std::sync::Arc;

use canvas::doc::{Element, ElementContent, Page, Zone, ZoneParent, ZoneType};
use canvas::engine::Action;
use canvas::geometry::Rect;
use canvas::input::{Button, DropPayload, Modifiers};
use canvas::viewport::{CanvasBox, Point};
use photobook::repo::http::HttpRepository;
use photobook::repo::memory::MemoryRepository;
use photobook::repo::{RepoError, Repository};
use photobook::routes;
use photobook::services::editor::EditorSession;
use photobook::services::layout::seed_system_layouts;
use photobook::state::AppState;
use uuid::Uuid;

struct Harness {
    /// Direct handle on the server's store.
    store: Arc<MemoryRepository>,
    client: Arc<HttpRepository>,
}

async fn start() -> Harness {
    let store = Arc::new(MemoryRepository::new());
    seed_system_layouts(store.as_ref()).await.expect("seed layouts");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = routes::app(AppState::new(store.clone()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let client = Arc::new(HttpRepository::new(format!("http://{addr}/")).expect("client"));
    Harness { store, client }
}

async fn remote_page(client: &HttpRepository) -> Page {
    let page = Page { id: Uuid::new_v4(), project_id: Uuid::new_v4(), page_number: 1, title: None, layout_slug: None };
    client.save_page(&page).await.expect("save page");
    page
}

#[tokio::test]
async fn missing_entities_come_back_as_not_found() {
    let h = start().await;
    let id = Uuid::new_v4();

    let err = h.client.fetch_zone(id).await.expect_err("missing zone");
    assert!(matches!(err, RepoError::NotFound { entity: "zone", id: ref got } if *got == id.to_string()));

    let err = h.client.fetch_page(id).await.expect_err("missing page");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn zone_and_element_round_trip_over_http() {
    let h = start().await;
    let page = remote_page(&h.client).await;
    let zone = Zone::new(ZoneParent::Page(page.id), 0, Rect::new(0.0, 0.0, 50.0, 50.0), ZoneType::Photo);
    h.client.create_zone(&zone).await.expect("create zone");

    let first = Element::new(zone.id, ElementContent::text("first"));
    assert_eq!(h.client.put_element(&first).await.expect("put first"), None);
    let second = Element::new(zone.id, ElementContent::text("second"));
    let displaced = h.client.put_element(&second).await.expect("put second");
    assert_eq!(displaced.map(|e| e.id), Some(first.id));

    let snapshot = h.client.fetch_page(page.id).await.expect("fetch page");
    assert_eq!(snapshot.zones, vec![zone]);
    assert_eq!(snapshot.elements, vec![second]);
}

#[tokio::test]
async fn overflowing_zone_is_rejected_by_the_server() {
    let h = start().await;
    let page = remote_page(&h.client).await;
    let zone = Zone::new(ZoneParent::Page(page.id), 0, Rect::new(80.0, 0.0, 50.0, 50.0), ZoneType::Photo);

    let err = h.client.create_zone(&zone).await.expect_err("overflow");
    assert!(matches!(err, RepoError::Remote { status: 422, ref code, .. } if code == "E_VALIDATION"));
    assert!(h.store.fetch_page(page.id).await.expect("page").zones.is_empty());
}

#[tokio::test]
async fn system_layout_cannot_be_deleted_remotely() {
    let h = start().await;
    let grid = h.client.fetch_layout_by_slug("grid-4").await.expect("grid-4");
    assert_eq!(grid.zones.len(), 4);

    let err = h.client.delete_layout(grid.id).await.expect_err("system layout");
    assert!(matches!(err, RepoError::Conflict(_)));
    assert!(h.store.fetch_layout(grid.id).await.is_ok());
}

#[tokio::test]
async fn editor_session_persists_through_the_api() {
    let h = start().await;
    let page = remote_page(&h.client).await;
    let zone = Zone::new(ZoneParent::Page(page.id), 0, Rect::new(10.0, 10.0, 30.0, 30.0), ZoneType::Photo);
    h.client.create_zone(&zone).await.expect("create zone");

    let mut session = EditorSession::new(h.client.clone());
    session.load_page(page.id).await.expect("load page");

    // 1000 px square canvas: 1% per 10 px. Drag the zone 10% right.
    let canvas = CanvasBox::new(0.0, 0.0, 1000.0, 1000.0);
    session.on_pointer_down(canvas, Point::new(200.0, 200.0), Button::Primary, Modifiers::default());
    session.on_pointer_move(canvas, Point::new(300.0, 200.0), Modifiers::default());
    let actions = session
        .on_pointer_up(canvas, Point::new(300.0, 200.0), Button::Primary, Modifiers::default())
        .await;
    assert!(actions.iter().any(|a| matches!(a, Action::Commit(_))));

    let stored = h.store.fetch_zone(zone.id).await.expect("zone");
    assert_eq!((stored.position_x, stored.position_y), (20.0, 10.0));

    session.on_drop(&zone.id, DropPayload::Text("caption".into())).await;
    let elements = h.store.fetch_page(page.id).await.expect("page").elements;
    assert_eq!(elements.len(), 1);

    let grid = h.client.fetch_layout_by_slug("grid-4").await.expect("grid-4");
    let actions = session.apply_layout(&grid).await;
    assert!(!actions.iter().any(|a| matches!(a, Action::Notice(_))));
    let snapshot = h.store.fetch_page(page.id).await.expect("page");
    assert_eq!(snapshot.zones.len(), 4);
    assert!(snapshot.elements.is_empty());
    assert_eq!(snapshot.page.layout_slug.as_deref(), Some("grid-4"));
}
