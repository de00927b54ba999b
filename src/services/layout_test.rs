#![allow(clippy::float_cmp)]

use super::*;
use crate::repo::memory::MemoryRepository;
use crate::state::test_helpers::seed_layout;

fn new_layout(slug: &str, zones: Vec<TemplateZone>) -> NewLayout {
    NewLayout { slug: slug.to_owned(), name: "Custom".to_owned(), zones, ..NewLayout::default() }
}

#[test]
fn slug_rules() {
    assert!(is_valid_slug("grid-4"));
    assert!(is_valid_slug("a"));
    assert!(!is_valid_slug(""));
    assert!(!is_valid_slug("Grid"));
    assert!(!is_valid_slug("two up"));
    assert!(!is_valid_slug("two_up"));
}

#[test]
fn system_layouts_are_valid_and_unique() {
    let layouts = system_layouts();
    let slugs: Vec<&str> = layouts.iter().map(|l| l.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec!["blank", "full-page", "two-vertical", "two-horizontal", "grid-4", "photo-caption"]
    );
    for layout in &layouts {
        assert!(layout.is_system);
        for zone in &layout.zones {
            assert_eq!(zone.layout_id, Some(layout.id));
            validate_zone(zone, MIN_ZONE_SIZE).expect("system zone should be valid");
        }
    }
    assert!(layouts[0].zones.is_empty());
    assert_eq!(layouts[5].zones[1].zone_type, ZoneType::Text);
}

#[tokio::test]
async fn seed_only_fills_an_empty_repository() {
    let repo = MemoryRepository::new();
    assert_eq!(seed_system_layouts(&repo).await.expect("seed"), 6);
    assert_eq!(seed_system_layouts(&repo).await.expect("reseed"), 0);
    assert_eq!(list_all_layouts(&repo).await.expect("list").len(), 6);
}

#[tokio::test]
async fn create_layout_reindexes_and_rounds_zones() {
    let repo = MemoryRepository::new();
    let layout = create_layout(
        &repo,
        new_layout(
            "custom",
            vec![
                TemplateZone::new(Rect::new(0.04, 0.0, 49.96, 100.0), ZoneType::Photo),
                TemplateZone::new(Rect::new(50.0, 0.0, 50.0, 100.0), ZoneType::Text),
            ],
        ),
    )
    .await
    .expect("create should succeed");

    assert!(!layout.is_system);
    assert!(layout.is_active);
    let stored = repo.fetch_layout_by_slug("custom").await.expect("stored");
    assert_eq!(stored.zones.len(), 2);
    assert_eq!(stored.zones[0].zone_index, 0);
    assert_eq!(stored.zones[0].position_x, 0.0);
    assert_eq!(stored.zones[0].width, 50.0);
    assert_eq!(stored.zones[1].zone_type, ZoneType::Text);
}

#[tokio::test]
async fn create_layout_rejects_bad_input_without_writing() {
    let repo = MemoryRepository::new();

    let err = create_layout(&repo, new_layout("Bad Slug", vec![])).await.expect_err("slug");
    assert_eq!(err.error_code(), "E_INVALID_SLUG");

    let err = create_layout(&repo, NewLayout { name: "  ".into(), ..new_layout("ok", vec![]) })
        .await
        .expect_err("name");
    assert!(matches!(err, LayoutError::EmptyName));

    let overflow = vec![TemplateZone::new(Rect::new(60.0, 0.0, 50.0, 50.0), ZoneType::Photo)];
    let err = create_layout(&repo, new_layout("overflow", overflow)).await.expect_err("zone");
    assert_eq!(err.error_code(), "E_VALIDATION");

    assert!(repo.fetch_layouts().await.expect("list").is_empty());
}

#[tokio::test]
async fn create_layout_rejects_taken_slug() {
    let repo = MemoryRepository::new();
    seed_layout(&repo, "taken", &[]).await;
    let err = create_layout(&repo, new_layout("taken", vec![])).await.expect_err("taken");
    assert!(matches!(err, LayoutError::SlugTaken(ref s) if s == "taken"));
}

#[tokio::test]
async fn list_active_hides_deactivated_layouts() {
    let repo = MemoryRepository::new();
    let layout = seed_layout(&repo, "retired", &[]).await;
    seed_layout(&repo, "live", &[]).await;

    update_layout(&repo, layout.id, LayoutPatch { is_active: Some(false), ..LayoutPatch::default() })
        .await
        .expect("deactivate");

    let active: Vec<String> = list_active_layouts(&repo).await.expect("list").into_iter().map(|l| l.slug).collect();
    assert_eq!(active, vec!["live"]);
    assert_eq!(list_all_layouts(&repo).await.expect("all").len(), 2);
}

#[tokio::test]
async fn update_layout_replaces_zones_when_supplied() {
    let repo = MemoryRepository::new();
    let layout = seed_layout(&repo, "edit-me", &[Rect::new(0.0, 0.0, 50.0, 50.0)]).await;

    let updated = update_layout(
        &repo,
        layout.id,
        LayoutPatch {
            name: Some("Edited".into()),
            zones: Some(vec![
                TemplateZone::new(Rect::new(0.0, 0.0, 100.0, 50.0), ZoneType::Photo),
                TemplateZone::new(Rect::new(0.0, 50.0, 100.0, 50.0), ZoneType::Text),
            ]),
            ..LayoutPatch::default()
        },
    )
    .await
    .expect("update");

    assert_eq!(updated.name, "Edited");
    let stored = repo.fetch_layout(layout.id).await.expect("stored");
    assert_eq!(stored.zones, updated.zones);
    assert_eq!(stored.zones.len(), 2);
}

#[tokio::test]
async fn update_without_zones_keeps_template() {
    let repo = MemoryRepository::new();
    let layout = seed_layout(&repo, "keep", &[Rect::new(0.0, 0.0, 50.0, 50.0)]).await;
    update_layout(&repo, layout.id, LayoutPatch { sort_order: Some(9), ..LayoutPatch::default() })
        .await
        .expect("update");
    let stored = repo.fetch_layout(layout.id).await.expect("stored");
    assert_eq!(stored.sort_order, 9);
    assert_eq!(stored.zones, layout.zones);
}

#[tokio::test]
async fn system_layouts_keep_their_slug_and_cannot_be_deleted() {
    let repo = MemoryRepository::new();
    seed_system_layouts(&repo).await.expect("seed");
    let grid = repo.fetch_layout_by_slug("grid-4").await.expect("grid");

    let err = update_layout(&repo, grid.id, LayoutPatch { slug: Some("grid-four".into()), ..LayoutPatch::default() })
        .await
        .expect_err("rename");
    assert_eq!(err.error_code(), "E_SYSTEM_LAYOUT");

    let renamed = update_layout(&repo, grid.id, LayoutPatch { name: Some("Quad".into()), ..LayoutPatch::default() })
        .await
        .expect("display name can change");
    assert!(renamed.is_system);

    let err = delete_layout(&repo, grid.id).await.expect_err("delete");
    assert!(matches!(err, LayoutError::SystemLayout(ref s) if s == "grid-4"));
    assert!(repo.fetch_layout(grid.id).await.is_ok());
}

#[tokio::test]
async fn delete_custom_layout() {
    let repo = MemoryRepository::new();
    let layout = seed_layout(&repo, "bye", &[Rect::FULL]).await;
    delete_layout(&repo, layout.id).await.expect("delete");
    let err = delete_layout(&repo, layout.id).await.expect_err("gone");
    assert_eq!(err.error_code(), "E_LAYOUT_NOT_FOUND");
}
