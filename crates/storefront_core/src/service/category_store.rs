//! Category load state owned by the consuming form.
//!
//! # Responsibility
//! - Fetch the category list once on first display and keep it until
//!   explicitly invalidated.
//! - Distinguish "still loading", "loaded but empty" and "fetch failed".
//!
//! # Invariants
//! - A `Loaded` tree has always passed `CategoryTree::validate`.
//! - `ensure_loaded` fetches only from `Idle` or from a loaded empty list.

use crate::model::category::Category;
use crate::source::{CategorySource, SourceError};
use crate::tree::{CategoryTree, MalformedTreeError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a category load ended in the failed state.
#[derive(Debug)]
pub enum LoadFailure {
    /// The data source could not deliver a list.
    Fetch(SourceError),
    /// The list was delivered but its hierarchy is unusable.
    Malformed(MalformedTreeError),
}

impl Display for LoadFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "{err}"),
            Self::Malformed(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoadFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            Self::Malformed(err) => Some(err),
        }
    }
}

impl LoadFailure {
    /// Stable machine-readable code for logs and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "category_fetch_failed",
            Self::Malformed(_) => "category_tree_malformed",
        }
    }
}

/// Category list lifecycle.
#[derive(Debug, Default)]
pub enum LoadState {
    /// Nothing requested yet, or invalidated.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Validated category tree; may be empty.
    Loaded(CategoryTree),
    /// Last fetch failed.
    Failed(LoadFailure),
}

impl LoadState {
    /// Returns the loaded tree, if any.
    pub fn tree(&self) -> Option<&CategoryTree> {
        match self {
            Self::Loaded(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Idle | Self::Loading)
    }
}

/// Store holding the category list for one form.
pub struct CategoryStore<S: CategorySource> {
    source: S,
    state: LoadState,
}

impl<S: CategorySource> CategoryStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether the cached list is missing and a fetch should start.
    pub fn needs_fetch(&self) -> bool {
        match &self.state {
            LoadState::Idle => true,
            LoadState::Loaded(tree) => tree.is_empty(),
            LoadState::Loading | LoadState::Failed(_) => false,
        }
    }

    /// Fetches through the configured source when the list is missing.
    pub fn ensure_loaded(&mut self) -> &LoadState {
        if self.needs_fetch() {
            self.begin_load();
            let result = self.source.fetch_all();
            self.finish_load(result);
        }
        &self.state
    }

    /// Marks a fetch as in flight.
    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Stores the outcome of a fetch, validating the hierarchy.
    pub fn finish_load(&mut self, result: Result<Vec<Category>, SourceError>) -> &LoadState {
        self.state = match result {
            Ok(categories) => match CategoryTree::try_new(categories) {
                Ok(tree) => {
                    info!(
                        "event=category_load module=store status=ok count={}",
                        tree.len()
                    );
                    LoadState::Loaded(tree)
                }
                Err(err) => Self::failed(LoadFailure::Malformed(err)),
            },
            Err(err) => Self::failed(LoadFailure::Fetch(err)),
        };
        &self.state
    }

    /// Drops the loaded list; the next `ensure_loaded` fetches again.
    pub fn invalidate(&mut self) {
        self.state = LoadState::Idle;
        info!("event=category_invalidate module=store status=ok");
    }

    fn failed(failure: LoadFailure) -> LoadState {
        error!(
            "event=category_load module=store status=error error_code={} error={}",
            failure.code(),
            failure
        );
        LoadState::Failed(failure)
    }
}
