//! Bulk layout assignment for multi-page templates.
//!
//! A `PageBuilder` is only an ordered list of page number to layout
//! associations. Nothing here touches zones: each page's zones are stamped
//! from its layout later, when the page is created.

#[cfg(test)]
#[path = "page_builder_test.rs"]
mod page_builder_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Layout, LayoutId};

/// One page of the plan. `layout_id` of `None` is a blank page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAssignment {
    pub page_number: i32,
    pub layout_id: Option<LayoutId>,
}

/// Ordered layout assignments, numbered `1..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBuilder {
    pages: Vec<PageAssignment>,
}

/// Layout new pages get: the first active layout, else the first layout,
/// else blank.
#[must_use]
pub fn default_layout(layouts: &[Layout]) -> Option<LayoutId> {
    layouts.iter().find(|l| l.is_active).or_else(|| layouts.first()).map(|l| l.id)
}

impl PageBuilder {
    /// `count` pages all assigned `layout_id`.
    #[must_use]
    pub fn new(count: usize, layout_id: Option<LayoutId>) -> Self {
        Self::from_layouts(vec![layout_id; count])
    }

    /// Build from an ordered list, one entry per page.
    #[must_use]
    pub fn from_layouts(layouts: Vec<Option<LayoutId>>) -> Self {
        let pages = (1..).zip(layouts).map(|(page_number, layout_id)| PageAssignment { page_number, layout_id }).collect();
        Self { pages }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[must_use]
    pub fn pages(&self) -> &[PageAssignment] {
        &self.pages
    }

    /// The layout assigned to a 1-based page number.
    #[must_use]
    pub fn layout_for(&self, page_number: i32) -> Option<LayoutId> {
        self.pages.iter().find(|p| p.page_number == page_number).and_then(|p| p.layout_id)
    }

    /// Assign one layout to every page.
    pub fn fill_all(&mut self, layout_id: Option<LayoutId>) {
        for page in &mut self.pages {
            page.layout_id = layout_id;
        }
    }

    /// Assign a layout to pages `from..=to` (1-based). Both ends are clamped
    /// into the book; an empty range after clamping is a no-op.
    pub fn fill_range(&mut self, from: i64, to: i64, layout_id: Option<LayoutId>) {
        let Ok(count) = i64::try_from(self.pages.len()) else {
            return;
        };
        if count == 0 {
            return;
        }
        let from = from.clamp(1, count);
        let to = to.clamp(1, count);
        if from > to {
            return;
        }
        for page in &mut self.pages {
            if (from..=to).contains(&i64::from(page.page_number)) {
                page.layout_id = layout_id;
            }
        }
    }

    /// Assign a layout to one page by 0-based index. Out of range is a no-op.
    pub fn set_single_page(&mut self, index: usize, layout_id: Option<LayoutId>) {
        if let Some(page) = self.pages.get_mut(index) {
            page.layout_id = layout_id;
        }
    }

    /// Append a page with `layout_id`.
    pub fn add_page(&mut self, layout_id: Option<LayoutId>) {
        let page_number = self.pages.last().map_or(1, |p| p.page_number + 1);
        self.pages.push(PageAssignment { page_number, layout_id });
    }

    /// Remove a page by 0-based index and renumber the rest `1..=len`.
    pub fn remove_page(&mut self, index: usize) -> Option<PageAssignment> {
        if index >= self.pages.len() {
            return None;
        }
        let removed = self.pages.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Grow (with `fill`) or truncate to `count` pages.
    pub fn set_page_count(&mut self, count: usize, fill: Option<LayoutId>) {
        if count <= self.pages.len() {
            self.pages.truncate(count);
        } else {
            while self.pages.len() < count {
                self.add_page(fill);
            }
        }
    }

    /// How many pages use each layout, in order of first use.
    #[must_use]
    pub fn summary(&self) -> Vec<(Option<LayoutId>, usize)> {
        let mut counts: Vec<(Option<LayoutId>, usize)> = Vec::new();
        for page in &self.pages {
            match counts.iter_mut().find(|(id, _)| *id == page.layout_id) {
                Some((_, n)) => *n += 1,
                None => counts.push((page.layout_id, 1)),
            }
        }
        counts
    }

    fn renumber(&mut self) {
        for (page, number) in self.pages.iter_mut().zip(1..) {
            page.page_number = number;
        }
    }
}
