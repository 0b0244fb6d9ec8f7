//! Category data sources.
//!
//! # Responsibility
//! - Define the fetch contract used by the category store.
//! - Provide HTTP, file and SQLite-cached implementations.
//!
//! # Invariants
//! - Sources return categories in backend order and never reorder them.
//! - Sources do not validate hierarchy; the store does.

pub mod cached;
pub mod file;
pub mod http;

use crate::model::category::Category;
use crate::repo::category_repo::CategoryRepoError;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from category sources.
#[derive(Debug)]
pub enum SourceError {
    /// Transport-level HTTP failure.
    Http(reqwest::Error),
    /// Backend answered with a non-success status.
    Status { url: String, status: u16 },
    /// Payload is not a category list.
    Decode(serde_json::Error),
    /// Local file could not be read.
    Io(std::io::Error),
    /// Local cache failure.
    Cache(CategoryRepoError),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "category request failed: {err}"),
            Self::Status { url, status } => {
                write!(f, "category request to {url} returned status {status}")
            }
            Self::Decode(err) => write!(f, "category payload is invalid: {err}"),
            Self::Io(err) => write!(f, "category file could not be read: {err}"),
            Self::Cache(err) => write!(f, "category cache failed: {err}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Status { .. } => None,
            Self::Decode(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Cache(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

impl From<std::io::Error> for SourceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<CategoryRepoError> for SourceError {
    fn from(value: CategoryRepoError) -> Self {
        Self::Cache(value)
    }
}

/// Anything that can produce the full flat category list.
pub trait CategorySource {
    /// Fetches every category.
    fn fetch_all(&self) -> Result<Vec<Category>, SourceError>;
}

impl<S: CategorySource + ?Sized> CategorySource for &S {
    fn fetch_all(&self) -> Result<Vec<Category>, SourceError> {
        (**self).fetch_all()
    }
}

/// Backend payload shapes accepted for the category list.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryPayload {
    List(Vec<Category>),
    Envelope { data: Vec<Category> },
}

/// Decodes a category list from a bare JSON array or a `{ "data": [...] }`
/// envelope.
pub fn decode_categories(body: &str) -> Result<Vec<Category>, SourceError> {
    let payload: CategoryPayload = serde_json::from_str(body)?;
    Ok(match payload {
        CategoryPayload::List(categories) => categories,
        CategoryPayload::Envelope { data } => data,
    })
}
