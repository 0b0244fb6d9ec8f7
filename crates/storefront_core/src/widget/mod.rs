//! Category checkbox tree view-model.
//!
//! # Responsibility
//! - Turn load state, selection and collapse flags into renderable rows.
//! - Route row and checkbox clicks to collapse or selection changes.
//! - Report selection changes to the owning form through `SelectionOwner`.
//!
//! # Invariants
//! - The widget never owns the selection set; it only proposes the next one.
//! - Collapse flags never influence selection.
//! - A checkbox click toggles selection only; it never reaches the row handler.

use crate::model::category::CategoryId;
use crate::selection::collapse::CollapseState;
use crate::selection::engine::{CheckState, SelectionEngine, SelectionError, SelectionSet};
use crate::service::category_store::{CategoryStore, LoadState};
use crate::source::CategorySource;
use crate::tree::{CategoryTree, MalformedTreeError};
use std::collections::HashSet;

pub const HEADER_TITLE: &str = "Select Categories";
pub const LOADING_MESSAGE: &str = "Loading categories...";
pub const EMPTY_MESSAGE: &str = "No categories available. Ask an admin to create some first.";

/// Form-side owner of the selection set.
pub trait SelectionOwner {
    /// Current committed selection.
    fn selected_ids(&self) -> &SelectionSet;
    /// Receives the next full selection after a toggle.
    fn on_change(&mut self, next: SelectionSet);
}

impl SelectionOwner for SelectionSet {
    fn selected_ids(&self) -> &SelectionSet {
        self
    }

    fn on_change(&mut self, next: SelectionSet) {
        *self = next;
    }
}

/// One visible row of the category tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub title: String,
    /// Nesting level, `0` for roots.
    pub depth: usize,
    /// Rows with children render a folder icon and a chevron.
    pub has_children: bool,
    pub check: CheckState,
    /// Meaningful only when `has_children` is set.
    pub collapsed: bool,
}

/// What the widget should render right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetView {
    Loading {
        message: &'static str,
    },
    Error {
        message: String,
    },
    Empty {
        message: &'static str,
    },
    Tree {
        header: &'static str,
        rows: Vec<CategoryRow>,
        selected_count: usize,
        /// Footer text, absent when nothing is selected.
        summary: Option<String>,
    },
}

/// Result of a row click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowClick {
    /// Parent row: collapse flag flipped to the contained value.
    Collapsed(bool),
    /// Leaf row: selection toggled and reported to the owner.
    SelectionChanged,
}

/// Checkbox tree widget state (collapse flags only).
#[derive(Debug, Clone, Default)]
pub struct CategoryCheckboxes {
    collapse: CollapseState,
}

impl CategoryCheckboxes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collapse_state(&self) -> &CollapseState {
        &self.collapse
    }

    /// First display: requests categories when the store has none.
    pub fn mount<'store, S: CategorySource>(
        &self,
        store: &'store mut CategoryStore<S>,
    ) -> &'store LoadState {
        store.ensure_loaded()
    }

    /// Builds the view for the current load state and selection.
    pub fn view(
        &self,
        state: &LoadState,
        selected: &SelectionSet,
    ) -> Result<WidgetView, SelectionError> {
        match state {
            LoadState::Idle | LoadState::Loading => Ok(WidgetView::Loading {
                message: LOADING_MESSAGE,
            }),
            LoadState::Failed(failure) => Ok(WidgetView::Error {
                message: failure.to_string(),
            }),
            LoadState::Loaded(tree) if tree.is_empty() => Ok(WidgetView::Empty {
                message: EMPTY_MESSAGE,
            }),
            LoadState::Loaded(tree) => Ok(WidgetView::Tree {
                header: HEADER_TITLE,
                rows: self.rows(tree, selected)?,
                selected_count: selected.len(),
                summary: selection_summary(tree, selected),
            }),
        }
    }

    /// Lists visible rows in pre-order, skipping children of collapsed rows.
    pub fn rows(
        &self,
        tree: &CategoryTree,
        selected: &SelectionSet,
    ) -> Result<Vec<CategoryRow>, SelectionError> {
        let engine = SelectionEngine::new(tree);
        let mut rows = Vec::with_capacity(tree.len());
        let mut visited = HashSet::new();
        let mut stack: Vec<(CategoryId, usize)> =
            tree.roots().iter().rev().map(|root| (root.id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id) {
                return Err(MalformedTreeError::NodeRevisited(id).into());
            }
            let Some(category) = tree.get(id) else {
                continue;
            };
            let children = tree.get_children(id);
            let collapsed = self.collapse.is_collapsed(id);

            rows.push(CategoryRow {
                id,
                title: category.title.clone(),
                depth,
                has_children: !children.is_empty(),
                check: engine.check_state(selected, id)?,
                collapsed,
            });

            if !collapsed {
                stack.extend(children.iter().rev().map(|child| (child.id, depth + 1)));
            }
        }
        Ok(rows)
    }

    /// Row click: parents collapse/expand, leaves toggle selection.
    pub fn click_row(
        &mut self,
        tree: &CategoryTree,
        owner: &mut impl SelectionOwner,
        id: CategoryId,
    ) -> Result<RowClick, SelectionError> {
        if !tree.contains(id) {
            return Err(SelectionError::UnknownCategory(id));
        }
        if tree.has_children(id) {
            return Ok(RowClick::Collapsed(self.collapse.toggle(id)));
        }
        self.click_checkbox(tree, owner, id)?;
        Ok(RowClick::SelectionChanged)
    }

    /// Checkbox click: toggles selection and hands the result to the owner.
    pub fn click_checkbox(
        &self,
        tree: &CategoryTree,
        owner: &mut impl SelectionOwner,
        id: CategoryId,
    ) -> Result<(), SelectionError> {
        let next = SelectionEngine::new(tree).toggle(owner.selected_ids(), id)?;
        owner.on_change(next);
        Ok(())
    }

    /// Flips the collapse flag of `id` directly (chevron affordance).
    pub fn toggle_collapse(&mut self, id: CategoryId) -> bool {
        self.collapse.toggle(id)
    }
}

/// Footer text: `"2 categories selected: Shoes, Boots"`.
///
/// Titles follow category list order; ids missing from the tree are counted
/// but not named.
pub fn selection_summary(tree: &CategoryTree, selected: &SelectionSet) -> Option<String> {
    if selected.is_empty() {
        return None;
    }
    let titles = tree
        .categories()
        .iter()
        .filter(|category| selected.contains(&category.id))
        .map(|category| category.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let noun = if selected.len() == 1 {
        "category"
    } else {
        "categories"
    };
    Some(format!("{} {noun} selected: {titles}", selected.len()))
}
