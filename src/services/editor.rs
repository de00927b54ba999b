//! Editor session: one user's editing surface wired to a repository.
//!
//! DESIGN
//! ======
//! State lives in three places: the view (the host's DOM, driven by
//! `Action`s), the local store inside `EngineCore`, and the repository. The
//! session moves edits outward in that order:
//!
//! 1. pointer-down/move only touch the view (preview actions), never the
//!    store or the repository;
//! 2. a finished gesture or direct edit applies a `Mutation` to the local
//!    store and emits `Action::Commit`;
//! 3. the session persists each committed mutation exactly once.
//!
//! ERROR HANDLING
//! ==============
//! The policy is uniformly optimistic. When persisting a mutation fails, the
//! session reverts it locally from the undo data the mutation carries, logs
//! the failure and returns `Action::Notice` in place of the commit. The
//! selection is re-announced because a revert can remove the selected item.
//!
//! `&mut self` on every method means one session never has two persists in
//! flight; the repository serialises concurrent sessions.

use std::sync::Arc;

use canvas::doc::{
    ElementId, ElementPatch, Layout, LayoutId, Mutation, PageId, PartialZone, ProjectId, UploadedPhoto, ZoneId,
    ZoneParent,
};
use canvas::engine::{Action, EngineConfig, EngineCore};
use canvas::input::{Button, DropPayload, Key, Modifiers, Selection, Side, Tool};
use canvas::validate::ZoneValidationError;
use canvas::viewport::{CanvasBox, Point};
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::repo::{RepoError, Repository};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ErrorCode for EditorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Repo(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Repo(e) => e.retryable(),
        }
    }
}

/// Write one mutation to the repository.
async fn persist_mutation(repo: &dyn Repository, mutation: &Mutation) -> Result<(), RepoError> {
    match mutation {
        Mutation::ZoneCreated(zone) => repo.create_zone(zone).await,
        Mutation::ZoneUpdated { id, fields, .. } => repo.update_zone(*id, fields).await.map(|_| ()),
        Mutation::ZoneDeleted { zone, .. } => repo.delete_zone(zone.id).await,
        Mutation::ZonesReplaced { parent: ZoneParent::Page(page_id), zones, .. } => {
            repo.replace_page_zones(*page_id, zones).await
        }
        Mutation::ZonesReplaced { parent: ZoneParent::Layout(layout_id), zones, .. } => {
            let mut layout = repo.fetch_layout(*layout_id).await?;
            layout.zones.clone_from(zones);
            repo.save_layout(&layout).await
        }
        Mutation::ElementPlaced { element, .. } => repo.put_element(element).await.map(|_| ()),
        Mutation::ElementUpdated { id, patch, .. } => repo.update_element(*id, patch).await.map(|_| ()),
        Mutation::ElementDeleted(element) => repo.delete_element(element.id).await,
    }
}

fn notice_for(mutation: &Mutation) -> String {
    let what = match mutation {
        Mutation::ZoneCreated(_) => "the new zone",
        Mutation::ZoneUpdated { .. } => "the zone change",
        Mutation::ZoneDeleted { .. } => "the zone deletion",
        Mutation::ZonesReplaced { .. } => "the new layout",
        Mutation::ElementPlaced { .. } => "the placed content",
        Mutation::ElementUpdated { .. } => "the content change",
        Mutation::ElementDeleted(_) => "the content deletion",
    };
    format!("Could not save {what}; it has been undone.")
}

pub struct EditorSession {
    core: EngineCore,
    repo: Arc<dyn Repository>,
}

impl EditorSession {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self::with_config(repo, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(repo: Arc<dyn Repository>, config: EngineConfig) -> Self {
        Self { core: EngineCore::with_config(config), repo }
    }

    /// Read-only view of the local state, for rendering.
    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    // --- Loading ---

    /// Hydrate one page from the repository.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the page cannot be fetched.
    pub async fn load_page(&mut self, page_id: PageId) -> Result<(), EditorError> {
        let snapshot = self.repo.fetch_page(page_id).await?;
        info!(%page_id, zones = snapshot.zones.len(), elements = snapshot.elements.len(), "page loaded");
        self.core.load_page(snapshot);
        Ok(())
    }

    /// Hydrate every page of a project. Returns the number of pages loaded.
    ///
    /// # Errors
    ///
    /// Returns the first repository error; pages loaded before it stay loaded.
    pub async fn load_project(&mut self, project_id: ProjectId) -> Result<usize, EditorError> {
        let pages = self.repo.list_pages(project_id).await?;
        for page in &pages {
            let snapshot = self.repo.fetch_page(page.id).await?;
            self.core.load_page(snapshot);
        }
        info!(%project_id, pages = pages.len(), "project loaded");
        Ok(pages.len())
    }

    /// Hydrate a layout template and make it the editing surface.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the layout cannot be fetched.
    pub async fn load_layout(&mut self, layout_id: LayoutId) -> Result<(), EditorError> {
        let layout = self.repo.fetch_layout(layout_id).await?;
        self.core.load_layout(&layout);
        Ok(())
    }

    // --- Local-only state ---

    pub fn set_photos(&mut self, photos: Vec<UploadedPhoto>) {
        self.core.set_photos(photos);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.core.set_tool(tool);
    }

    pub fn select_zone(&mut self, id: Option<ZoneId>) -> Vec<Action> {
        self.core.select_zone(id)
    }

    pub fn select_element(&mut self, id: &ElementId) -> Vec<Action> {
        self.core.select_element(id)
    }

    pub fn go_to_spread(&mut self, spread: usize) -> Vec<Action> {
        self.core.go_to_spread(spread)
    }

    pub fn next_spread(&mut self) -> Vec<Action> {
        self.core.next_spread()
    }

    pub fn prev_spread(&mut self) -> Vec<Action> {
        self.core.prev_spread()
    }

    pub fn set_side(&mut self, side: Side) -> Vec<Action> {
        self.core.set_side(side)
    }

    // --- Input ---

    pub fn on_pointer_down(&mut self, canvas: CanvasBox, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(canvas, client, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, canvas: CanvasBox, client: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(canvas, client, modifiers)
    }

    pub async fn on_pointer_up(&mut self, canvas: CanvasBox, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_up(canvas, client, button, modifiers);
        self.persist(actions).await
    }

    pub async fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_down(key, modifiers);
        self.persist(actions).await
    }

    pub async fn on_drop(&mut self, zone_id: &ZoneId, payload: DropPayload) -> Vec<Action> {
        let actions = self.core.on_drop(zone_id, payload);
        self.persist(actions).await
    }

    // --- Direct edits ---

    pub async fn set_text(&mut self, id: &ElementId, text: String) -> Vec<Action> {
        let actions = self.core.set_text(id, text);
        self.persist(actions).await
    }

    pub async fn update_element(&mut self, id: &ElementId, patch: ElementPatch) -> Vec<Action> {
        let actions = self.core.update_element(id, patch);
        self.persist(actions).await
    }

    /// Numeric zone edits from a form.
    ///
    /// # Errors
    ///
    /// Returns the validation problems; nothing is applied or persisted.
    pub async fn set_zone_fields(&mut self, id: &ZoneId, fields: PartialZone) -> Result<Vec<Action>, ZoneValidationError> {
        let actions = self.core.set_zone_fields(id, fields)?;
        Ok(self.persist(actions).await)
    }

    pub async fn add_zone(&mut self) -> Vec<Action> {
        let actions = self.core.add_zone();
        self.persist(actions).await
    }

    pub async fn delete_zone(&mut self, id: &ZoneId) -> Vec<Action> {
        let actions = self.core.delete_zone(id);
        self.persist(actions).await
    }

    pub async fn delete_element(&mut self, id: &ElementId) -> Vec<Action> {
        let actions = self.core.delete_element(id);
        self.persist(actions).await
    }

    /// Replace the active page's zones with the layout's template zones and
    /// record the layout on the page. The whole zone list is reverted if the
    /// replacement cannot be saved.
    pub async fn apply_layout(&mut self, layout: &Layout) -> Vec<Action> {
        let actions = self.core.apply_layout(layout);
        let committed = actions.iter().any(|a| matches!(a, Action::Commit(_)));
        let mut actions = self.persist(actions).await;

        let persisted = actions.iter().any(|a| matches!(a, Action::Commit(_)));
        if !committed || !persisted {
            return actions;
        }
        let Some(page_id) = self.core.ui.active_page() else {
            return actions;
        };
        let Some(mut page) = self.core.doc.page(&page_id).cloned() else {
            return actions;
        };
        page.layout_slug = Some(layout.slug.clone());
        match self.repo.save_page(&page).await {
            Ok(()) => self.core.doc.insert_page(page),
            Err(err) => {
                warn!(%page_id, layout = %layout.slug, error = %err, "layout slug not recorded");
                actions.push(Action::Notice("The layout was applied but could not be recorded on the page.".into()));
            }
        }
        actions
    }

    // --- Persistence ---

    /// Persist every commit in `actions`, reverting the ones that fail.
    async fn persist(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let mut out = Vec::with_capacity(actions.len());
        let mut reverted = false;

        for action in actions {
            let Action::Commit(mutation) = action else {
                out.push(action);
                continue;
            };
            match persist_mutation(self.repo.as_ref(), &mutation).await {
                Ok(()) => out.push(Action::Commit(mutation)),
                Err(err) => {
                    warn!(
                        mutation = mutation.name(),
                        code = err.error_code(),
                        error = %err,
                        "persist failed; reverting local change"
                    );
                    self.core.revert(&mutation);
                    out.push(Action::Notice(notice_for(&mutation)));
                    reverted = true;
                }
            }
        }

        if reverted {
            out.retain(|a| !matches!(a, Action::Selected(_) | Action::RenderNeeded));
            out.push(Action::Selected(self.core.selection()));
            out.push(Action::RenderNeeded);
        }
        out
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.core.selection()
    }
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;
