use canvas::geometry::Rect;

use super::*;
use crate::repo::memory::MemoryRepository;
use crate::services::layout::seed_system_layouts;
use crate::state::test_helpers::{seed_layout, seed_page};

fn numbers(pages: &[Page]) -> Vec<i32> {
    pages.iter().map(|p| p.page_number).collect()
}

#[tokio::test]
async fn add_page_appends_and_copies_layout_zones() {
    let repo = MemoryRepository::new();
    seed_system_layouts(&repo).await.expect("seed");
    let project = Uuid::new_v4();

    let first = add_page(&repo, project, Some("grid-4")).await.expect("first page");
    let second = add_page(&repo, project, None).await.expect("second page");

    assert_eq!(first.page_number, 1);
    assert_eq!(second.page_number, 2);
    assert_eq!(first.layout_slug.as_deref(), Some("grid-4"));

    let snapshot = repo.fetch_page(first.id).await.expect("first snapshot");
    assert_eq!(snapshot.zones.len(), 4);
    assert_eq!(snapshot.page.layout_slug.as_deref(), Some("grid-4"));
    assert!(repo.fetch_page(second.id).await.expect("second snapshot").zones.is_empty());
}

#[tokio::test]
async fn blank_and_unknown_slugs_give_empty_pages() {
    let repo = MemoryRepository::new();
    seed_system_layouts(&repo).await.expect("seed");
    let project = Uuid::new_v4();

    for slug in ["blank", "no-such-layout"] {
        let page = add_page(&repo, project, Some(slug)).await.expect("page");
        let snapshot = repo.fetch_page(page.id).await.expect("snapshot");
        assert!(snapshot.zones.is_empty(), "{slug} should give an empty page");
        assert_eq!(snapshot.page.layout_slug, None);
    }
}

#[tokio::test]
async fn delete_page_renumbers_the_rest() {
    let repo = MemoryRepository::new();
    let project = Uuid::new_v4();
    let p1 = seed_page(&repo, project, 1).await;
    let p2 = seed_page(&repo, project, 2).await;
    let p3 = seed_page(&repo, project, 3).await;

    let pages = delete_page(&repo, project, p2.id).await.expect("delete");

    assert_eq!(numbers(&pages), vec![1, 2]);
    let listed = repo.list_pages(project).await.expect("list");
    assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![p1.id, p3.id]);
    assert_eq!(numbers(&listed), vec![1, 2]);
}

#[tokio::test]
async fn last_page_cannot_be_deleted() {
    let repo = MemoryRepository::new();
    let project = Uuid::new_v4();
    let only = seed_page(&repo, project, 1).await;

    let err = delete_page(&repo, project, only.id).await.expect_err("last page");
    assert_eq!(err.error_code(), "E_LAST_PAGE");
    assert_eq!(repo.list_pages(project).await.expect("list").len(), 1);
}

#[tokio::test]
async fn delete_page_from_other_project_is_rejected() {
    let repo = MemoryRepository::new();
    let project = Uuid::new_v4();
    seed_page(&repo, project, 1).await;
    seed_page(&repo, project, 2).await;
    let foreign = seed_page(&repo, Uuid::new_v4(), 1).await;

    let err = delete_page(&repo, project, foreign.id).await.expect_err("foreign page");
    assert!(matches!(err, PageError::NotInProject(id) if id == foreign.id));
}

#[tokio::test]
async fn reorder_assigns_positions() {
    let repo = MemoryRepository::new();
    let project = Uuid::new_v4();
    let p1 = seed_page(&repo, project, 1).await;
    let p2 = seed_page(&repo, project, 2).await;
    let p3 = seed_page(&repo, project, 3).await;

    let pages = reorder_pages(&repo, project, &[p3.id, p1.id, p2.id]).await.expect("reorder");
    assert_eq!(pages.iter().map(|p| p.id).collect::<Vec<_>>(), vec![p3.id, p1.id, p2.id]);

    let listed = repo.list_pages(project).await.expect("list");
    assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![p3.id, p1.id, p2.id]);
    assert_eq!(numbers(&listed), vec![1, 2, 3]);
}

#[tokio::test]
async fn reorder_requires_a_permutation() {
    let repo = MemoryRepository::new();
    let project = Uuid::new_v4();
    let p1 = seed_page(&repo, project, 1).await;
    let p2 = seed_page(&repo, project, 2).await;

    for order in [vec![p1.id], vec![p1.id, p1.id], vec![p1.id, Uuid::new_v4()], vec![p1.id, p2.id, Uuid::new_v4()]] {
        let err = reorder_pages(&repo, project, &order).await.expect_err("not a permutation");
        assert!(matches!(err, PageError::NotAPermutation));
    }
    assert_eq!(numbers(&repo.list_pages(project).await.expect("list")), vec![1, 2]);
}

#[tokio::test]
async fn materialize_plan_creates_pages_with_their_layouts() {
    let repo = MemoryRepository::new();
    let project = Uuid::new_v4();
    seed_page(&repo, project, 1).await;
    let full = seed_layout(&repo, "full", &[Rect::FULL]).await;
    let halves = seed_layout(&repo, "halves", &[Rect::new(0.0, 0.0, 50.0, 100.0), Rect::new(50.0, 0.0, 50.0, 100.0)]).await;

    let mut plan = PageBuilder::new(3, Some(full.id));
    plan.set_single_page(1, Some(halves.id));
    plan.set_single_page(2, None);
    let layouts = repo.fetch_layouts().await.expect("layouts");

    let created = materialize_plan(&repo, project, &plan, &layouts).await.expect("materialize");

    assert_eq!(numbers(&created), vec![2, 3, 4]);
    let zone_counts = [1, 2, 0];
    for (page, expected) in created.iter().zip(zone_counts) {
        let snapshot = repo.fetch_page(page.id).await.expect("snapshot");
        assert_eq!(snapshot.zones.len(), expected);
    }
    assert_eq!(created[0].layout_slug.as_deref(), Some("full"));
    assert_eq!(created[2].layout_slug, None);
}

#[tokio::test]
async fn materialize_plan_with_unknown_layout_writes_nothing() {
    let repo = MemoryRepository::new();
    let project = Uuid::new_v4();
    let missing = Uuid::new_v4();
    let plan = PageBuilder::new(2, Some(missing));

    let err = materialize_plan(&repo, project, &plan, &[]).await.expect_err("unknown layout");
    assert!(matches!(err, PageError::UnknownLayout(id) if id == missing));
    assert!(repo.list_pages(project).await.expect("list").is_empty());
}
