//! Category forest index.
//!
//! # Responsibility
//! - Build a `parent_id -> children` adjacency index once per category list.
//! - Answer children/descendants/parent/ancestor queries without rescanning.
//! - Detect malformed hierarchy data instead of looping on it.
//!
//! # Invariants
//! - Child order always follows the order of the source category list.
//! - Traversals track visited ids and fail with `MalformedTreeError` on revisit.

use crate::model::category::{Category, CategoryId};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hierarchy invariant violations found in category data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedTreeError {
    /// Two categories share one id.
    DuplicateId(CategoryId),
    /// `parent_id` references a category that does not exist.
    DanglingParent {
        id: CategoryId,
        parent_id: CategoryId,
    },
    /// A traversal reached the same category twice (cycle or duplicated edge).
    NodeRevisited(CategoryId),
}

impl Display for MalformedTreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate category id: {id}"),
            Self::DanglingParent { id, parent_id } => {
                write!(f, "category {id} references missing parent {parent_id}")
            }
            Self::NodeRevisited(id) => {
                write!(f, "category hierarchy revisits node {id}; cycle detected")
            }
        }
    }
}

impl Error for MalformedTreeError {}

/// Indexed view over a flat category list.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    categories: Vec<Category>,
    positions: HashMap<CategoryId, usize>,
    children: HashMap<CategoryId, Vec<usize>>,
    roots: Vec<usize>,
}

impl CategoryTree {
    /// Indexes `categories` without validating them.
    ///
    /// Duplicate ids keep the first occurrence for id lookups; call
    /// [`CategoryTree::validate`] before trusting the hierarchy.
    pub fn new(categories: Vec<Category>) -> Self {
        let mut positions = HashMap::with_capacity(categories.len());
        let mut children: HashMap<CategoryId, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();

        for (index, category) in categories.iter().enumerate() {
            positions.entry(category.id).or_insert(index);
            match category.parent_id {
                Some(parent_id) => children.entry(parent_id).or_default().push(index),
                None => roots.push(index),
            }
        }

        Self {
            categories,
            positions,
            children,
            roots,
        }
    }

    /// Indexes and validates in one step.
    pub fn try_new(categories: Vec<Category>) -> Result<Self, MalformedTreeError> {
        let tree = Self::new(categories);
        tree.validate()?;
        Ok(tree)
    }

    /// Checks id uniqueness, parent references and acyclicity.
    pub fn validate(&self) -> Result<(), MalformedTreeError> {
        let mut seen = HashSet::with_capacity(self.categories.len());
        for category in &self.categories {
            if !seen.insert(category.id) {
                return Err(MalformedTreeError::DuplicateId(category.id));
            }
        }

        for category in &self.categories {
            if let Some(parent_id) = category.parent_id {
                if !self.contains(parent_id) {
                    return Err(MalformedTreeError::DanglingParent {
                        id: category.id,
                        parent_id,
                    });
                }
            }
        }

        for category in &self.categories {
            self.ancestors(category.id)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns all categories in source order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Loads one category by id.
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.positions.get(&id).map(|&index| &self.categories[index])
    }

    /// Returns root-level categories in source order.
    pub fn roots(&self) -> Vec<&Category> {
        self.roots
            .iter()
            .map(|&index| &self.categories[index])
            .collect()
    }

    /// Returns direct children of `id` in source order.
    pub fn get_children(&self, id: CategoryId) -> Vec<&Category> {
        self.child_indices(id)
            .iter()
            .map(|&index| &self.categories[index])
            .collect()
    }

    pub fn has_children(&self, id: CategoryId) -> bool {
        !self.child_indices(id).is_empty()
    }

    /// Returns the parent id of `id`; `None` for roots and unknown ids.
    pub fn get_parent(&self, id: CategoryId) -> Option<CategoryId> {
        self.get(id).and_then(|category| category.parent_id)
    }

    /// Collects every descendant id of `id`, depth-first pre-order.
    ///
    /// # Errors
    /// - `NodeRevisited` when the walk reaches `id` or any descendant twice.
    pub fn get_all_descendants(
        &self,
        id: CategoryId,
    ) -> Result<Vec<CategoryId>, MalformedTreeError> {
        let mut visited = HashSet::from([id]);
        let mut descendants = Vec::new();
        let mut stack: Vec<usize> = self.child_indices(id).iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            let current = self.categories[index].id;
            if !visited.insert(current) {
                return Err(MalformedTreeError::NodeRevisited(current));
            }
            descendants.push(current);
            stack.extend(self.child_indices(current).iter().rev());
        }
        Ok(descendants)
    }

    /// Collects ancestor ids of `id`, nearest parent first.
    ///
    /// # Errors
    /// - `DanglingParent` when a parent link points outside the list.
    /// - `NodeRevisited` when parent links loop.
    pub fn ancestors(&self, id: CategoryId) -> Result<Vec<CategoryId>, MalformedTreeError> {
        let mut visited = HashSet::from([id]);
        let mut ancestors = Vec::new();
        let mut child = id;
        let mut cursor = self.get_parent(id);

        while let Some(parent_id) = cursor {
            if !self.contains(parent_id) {
                return Err(MalformedTreeError::DanglingParent {
                    id: child,
                    parent_id,
                });
            }
            if !visited.insert(parent_id) {
                return Err(MalformedTreeError::NodeRevisited(parent_id));
            }
            ancestors.push(parent_id);
            child = parent_id;
            cursor = self.get_parent(parent_id);
        }
        Ok(ancestors)
    }

    fn child_indices(&self, id: CategoryId) -> &[usize] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }
}
