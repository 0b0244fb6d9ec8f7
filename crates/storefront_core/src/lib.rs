//! Core logic for the storefront category picker.
//! This crate owns the category hierarchy rules; UI shells only render them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod selection;
pub mod service;
pub mod source;
pub mod tree;
pub mod widget;

pub use config::{CatalogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId};
pub use repo::category_repo::{
    CategoryRepoError, CategoryRepoResult, CategoryRepository, SqliteCategoryRepository,
};
pub use selection::collapse::CollapseState;
pub use selection::engine::{CheckState, SelectionEngine, SelectionError, SelectionSet};
pub use service::category_store::{CategoryStore, LoadFailure, LoadState};
pub use source::cached::CachedCategorySource;
pub use source::file::FileCategorySource;
pub use source::http::HttpCategorySource;
pub use source::{decode_categories, CategorySource, SourceError};
pub use tree::{CategoryTree, MalformedTreeError};
pub use widget::{
    selection_summary, CategoryCheckboxes, CategoryRow, RowClick, SelectionOwner, WidgetView,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
