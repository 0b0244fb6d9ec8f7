//! Category domain model.
//!
//! # Responsibility
//! - Define the flat `{id, parentId, title}` record served by the catalog API.
//! - Keep wire naming (`parentId`) at the serde boundary only.
//!
//! # Invariants
//! - `id` is unique within one category list.
//! - `parent_id == None` marks a root category.

use serde::{Deserialize, Serialize};

/// Stable integer identifier assigned by the catalog backend.
pub type CategoryId = i64;

/// One node of the category forest, as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Backend-assigned id.
    pub id: CategoryId,
    /// Parent category id. `None` means root-level category.
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// User-facing label.
    pub title: String,
}

impl Category {
    /// Creates a category under an optional parent.
    pub fn new(id: CategoryId, parent_id: Option<CategoryId>, title: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            title: title.into(),
        }
    }

    /// Creates a root-level category.
    pub fn root(id: CategoryId, title: impl Into<String>) -> Self {
        Self::new(id, None, title)
    }

    /// Creates a category nested under `parent_id`.
    pub fn child(id: CategoryId, parent_id: CategoryId, title: impl Into<String>) -> Self {
        Self::new(id, Some(parent_id), title)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
