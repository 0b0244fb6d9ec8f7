//! JSON file category source, used for fixtures and offline runs.

use super::{decode_categories, CategorySource, SourceError};
use crate::model::category::Category;
use std::path::PathBuf;

/// Reads the category list from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileCategorySource {
    path: PathBuf,
}

impl FileCategorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CategorySource for FileCategorySource {
    fn fetch_all(&self) -> Result<Vec<Category>, SourceError> {
        let body = std::fs::read_to_string(&self.path)?;
        decode_categories(&body)
    }
}
