//! Selection reducer over an indexed category tree.
//!
//! # Responsibility
//! - Turn `(current selection, toggled id)` into the next selection set.
//! - Answer indeterminate/tri-state queries used for checkbox rendering.
//!
//! # Invariants
//! - Input selections are borrowed and never modified.
//! - Ancestor and descendant walks fail closed on malformed hierarchy data.

use crate::model::category::CategoryId;
use crate::tree::{CategoryTree, MalformedTreeError};
use log::debug;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Set of selected category ids owned by the consuming form.
pub type SelectionSet = BTreeSet<CategoryId>;

/// Errors from selection operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Toggled id is not part of the category list.
    UnknownCategory(CategoryId),
    /// Hierarchy data cannot be traversed safely.
    Malformed(MalformedTreeError),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCategory(id) => write!(f, "category not found: {id}"),
            Self::Malformed(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SelectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::UnknownCategory(_) => None,
        }
    }
}

impl From<MalformedTreeError> for SelectionError {
    fn from(value: MalformedTreeError) -> Self {
        Self::Malformed(value)
    }
}

/// Visual checkbox state for one category row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Checked,
    /// Some but not all descendants are selected.
    Indeterminate,
}

/// Pure selection engine bound to one category tree.
#[derive(Debug, Clone, Copy)]
pub struct SelectionEngine<'tree> {
    tree: &'tree CategoryTree,
}

impl<'tree> SelectionEngine<'tree> {
    pub fn new(tree: &'tree CategoryTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'tree CategoryTree {
        self.tree
    }

    /// Computes the selection that results from toggling `id`.
    ///
    /// - Selected `id`: removes `id` and all descendants; ancestors stay.
    /// - Unselected `id`: adds `id`, all descendants and every ancestor.
    ///
    /// # Errors
    /// - `UnknownCategory` when `id` is not in the tree.
    /// - `Malformed` when the hierarchy loops or has dangling parents.
    pub fn toggle(
        &self,
        selected: &SelectionSet,
        id: CategoryId,
    ) -> Result<SelectionSet, SelectionError> {
        if !self.tree.contains(id) {
            return Err(SelectionError::UnknownCategory(id));
        }

        let descendants = self.tree.get_all_descendants(id)?;
        let next = if selected.contains(&id) {
            let mut next = selected.clone();
            next.remove(&id);
            for descendant in &descendants {
                next.remove(descendant);
            }
            next
        } else {
            let ancestors = self.tree.ancestors(id)?;
            let mut next = selected.clone();
            next.insert(id);
            next.extend(descendants.iter().copied());
            next.extend(ancestors);
            next
        };

        debug!(
            "event=category_toggle module=selection status=ok id={} selected_before={} selected_after={}",
            id,
            selected.len(),
            next.len()
        );
        Ok(next)
    }

    /// Returns whether strictly some, but not all, descendants of `id` are
    /// selected. `id` itself is not counted.
    ///
    /// # Errors
    /// - `UnknownCategory` when `id` is not in the tree, as for `toggle`.
    pub fn is_indeterminate(
        &self,
        selected: &SelectionSet,
        id: CategoryId,
    ) -> Result<bool, SelectionError> {
        if !self.tree.contains(id) {
            return Err(SelectionError::UnknownCategory(id));
        }
        let descendants = self.tree.get_all_descendants(id)?;
        let selected_count = descendants
            .iter()
            .filter(|descendant| selected.contains(descendant))
            .count();
        Ok(selected_count > 0 && selected_count < descendants.len())
    }

    /// Resolves the tri-state checkbox value for `id`.
    pub fn check_state(
        &self,
        selected: &SelectionSet,
        id: CategoryId,
    ) -> Result<CheckState, SelectionError> {
        if self.is_indeterminate(selected, id)? {
            return Ok(CheckState::Indeterminate);
        }
        if selected.contains(&id) {
            Ok(CheckState::Checked)
        } else {
            Ok(CheckState::Unchecked)
        }
    }
}
