use canvas::doc::{Layout, Page, Zone};
use canvas::validate::ZoneValidationError;
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::services::layout::seed_system_layouts;
use crate::state::test_helpers::{seed_page, test_app_state};

/// Serve the router on an ephemeral port; returns the base URL.
async fn spawn_app(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("serve");
    });
    format!("http://{addr}")
}

// =============================================================================
// STATUS MAPPING
// =============================================================================

#[test]
fn repo_errors_map_to_statuses() {
    assert_eq!(repo_error_to_status(&RepoError::not_found("zone", Uuid::nil())), StatusCode::NOT_FOUND);
    assert_eq!(repo_error_to_status(&RepoError::Conflict("x".into())), StatusCode::CONFLICT);
    assert_eq!(
        repo_error_to_status(&RepoError::Database(sqlx::Error::PoolTimedOut)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn validation_errors_are_unprocessable() {
    let err = ZoneError::Validation(ZoneValidationError { errors: vec!["width must be at least 5%".into()] });
    assert_eq!(zone_error_to_status(&err), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(layout_error_to_status(&LayoutError::EmptyName), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(page_error_to_status(&PageError::NotAPermutation), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn protected_resources_conflict() {
    assert_eq!(layout_error_to_status(&LayoutError::SystemLayout("grid-4".into())), StatusCode::CONFLICT);
    assert_eq!(layout_error_to_status(&LayoutError::SlugTaken("x".into())), StatusCode::CONFLICT);
    assert_eq!(page_error_to_status(&PageError::LastPage), StatusCode::CONFLICT);
}

#[test]
fn api_error_body_carries_code_and_message() {
    let err = ApiError::from(RepoError::not_found("page", "abc"));
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.body, ErrorBody { code: "E_PAGE_NOT_FOUND".into(), message: "page not found: abc".into() });
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn healthz_is_ok() {
    let base = spawn_app(test_app_state()).await;
    let response = reqwest::get(format!("{base}/healthz")).await.expect("request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn invalid_zone_patch_returns_validation_body() {
    let state = test_app_state();
    let page = seed_page(state.repo.as_ref(), Uuid::new_v4(), 1).await;
    let base = spawn_app(state).await;
    let http = reqwest::Client::new();

    let zone: Zone = http
        .post(format!("{base}/api/pages/{}/zones", page.id))
        .json(&json!({ "position_x": 10, "position_y": 10, "width": 30, "height": 30 }))
        .send()
        .await
        .expect("create")
        .json()
        .await
        .expect("zone body");
    assert_eq!(zone.zone_index, 0);

    let response = http
        .patch(format!("{base}/api/zones/{}", zone.id))
        .json(&json!({ "position_x": 80 }))
        .send()
        .await
        .expect("patch");
    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorBody = response.json().await.expect("error body");
    assert_eq!(body.code, "E_VALIDATION");
    assert!(body.message.contains("Zone overflows right edge of canvas"));
}

#[tokio::test]
async fn system_layout_delete_is_refused() {
    let state = test_app_state();
    seed_system_layouts(state.repo.as_ref()).await.expect("seed");
    let grid = state.repo.fetch_layout_by_slug("grid-4").await.expect("grid");
    let base = spawn_app(state).await;

    let response = reqwest::Client::new()
        .delete(format!("{base}/api/layouts/{}", grid.id))
        .send()
        .await
        .expect("delete");
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    let body: ErrorBody = response.json().await.expect("error body");
    assert_eq!(body.code, "E_SYSTEM_LAYOUT");
}

#[tokio::test]
async fn active_filter_and_plan_materialization() {
    let state = test_app_state();
    seed_system_layouts(state.repo.as_ref()).await.expect("seed");
    let base = spawn_app(state.clone()).await;
    let http = reqwest::Client::new();

    let layouts: Vec<Layout> = http
        .get(format!("{base}/api/layouts?active=true"))
        .send()
        .await
        .expect("list")
        .json()
        .await
        .expect("layouts");
    assert_eq!(layouts.len(), 6);
    let grid = layouts.iter().find(|l| l.slug == "grid-4").expect("grid-4");

    let project = Uuid::new_v4();
    let response = http
        .post(format!("{base}/api/projects/{project}/pages/plan"))
        .json(&json!({ "layouts": [grid.id, null] }))
        .send()
        .await
        .expect("plan");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let pages: Vec<Page> = response.json().await.expect("pages");
    assert_eq!(pages.iter().map(|p| p.page_number).collect::<Vec<_>>(), vec![1, 2]);

    let first = state.repo.fetch_page(pages[0].id).await.expect("first page");
    assert_eq!(first.zones.len(), 4);
}

#[tokio::test]
async fn mismatched_page_id_is_bad_request() {
    let base = spawn_app(test_app_state()).await;
    let page = Page { id: Uuid::new_v4(), project_id: Uuid::new_v4(), page_number: 1, title: None, layout_slug: None };

    let response = reqwest::Client::new()
        .put(format!("{base}/api/pages/{}", Uuid::new_v4()))
        .json(&page)
        .send()
        .await
        .expect("put");
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn system_layout_put_keeps_slug_and_flag() {
    let state = test_app_state();
    seed_system_layouts(state.repo.as_ref()).await.expect("seed");
    let grid = state.repo.fetch_layout_by_slug("grid-4").await.expect("grid");
    let base = spawn_app(state.clone()).await;
    let http = reqwest::Client::new();

    let mut demoted = grid.clone();
    demoted.is_system = false;
    demoted.slug = "renamed".into();
    let response = http
        .put(format!("{base}/api/layouts/{}", grid.id))
        .json(&demoted)
        .send()
        .await
        .expect("put");
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    let body: ErrorBody = response.json().await.expect("error body");
    assert_eq!(body.code, "E_SYSTEM_LAYOUT");

    let response = http.delete(format!("{base}/api/layouts/{}", grid.id)).send().await.expect("delete");
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);

    // Template edits on a system layout are still accepted.
    let mut edited = grid.clone();
    edited.name = "Four up".into();
    let response = http
        .put(format!("{base}/api/layouts/{}", grid.id))
        .json(&edited)
        .send()
        .await
        .expect("put");
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let stored = state.repo.fetch_layout(grid.id).await.expect("layout");
    assert!(stored.is_system);
    assert_eq!(stored.slug, "grid-4");
    assert_eq!(stored.name, "Four up");
}

#[tokio::test]
async fn deleting_last_page_is_refused() {
    let state = test_app_state();
    let project = Uuid::new_v4();
    let only = seed_page(state.repo.as_ref(), project, 1).await;
    let base = spawn_app(state.clone()).await;

    let response = reqwest::Client::new()
        .delete(format!("{base}/api/pages/{}", only.id))
        .send()
        .await
        .expect("delete");
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    let body: ErrorBody = response.json().await.expect("error body");
    assert_eq!(body.code, "E_LAST_PAGE");
    assert_eq!(state.repo.list_pages(project).await.expect("pages").len(), 1);
}

#[tokio::test]
async fn deleting_page_renumbers_project() {
    let state = test_app_state();
    let project = Uuid::new_v4();
    let p1 = seed_page(state.repo.as_ref(), project, 1).await;
    let p2 = seed_page(state.repo.as_ref(), project, 2).await;
    let p3 = seed_page(state.repo.as_ref(), project, 3).await;
    let base = spawn_app(state.clone()).await;

    let response = reqwest::Client::new()
        .delete(format!("{base}/api/pages/{}", p2.id))
        .send()
        .await
        .expect("delete");
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let pages = state.repo.list_pages(project).await.expect("pages");
    assert_eq!(pages.iter().map(|p| (p.id, p.page_number)).collect::<Vec<_>>(), vec![(p1.id, 1), (p3.id, 2)]);
}
