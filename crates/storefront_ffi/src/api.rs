//! FFI use-case API for the storefront UI shell.
//!
//! # Responsibility
//! - Expose category picker operations as sync, UI-callable functions.
//! - Translate core errors into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Selection is never stored here; callers pass it in and commit results.

use log::{info, warn};
use std::path::PathBuf;
use std::sync::OnceLock;
use storefront_core::db::open_db;
use storefront_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CachedCategorySource, CatalogConfig, Category, CategoryCheckboxes, CategoryRepository,
    CategoryRow, CategoryStore, CategoryTree, CheckState, HttpCategorySource, LoadState,
    SelectionEngine, SelectionSet, SqliteCategoryRepository,
};

const CACHE_DB_FILE_NAME: &str = "storefront_categories.sqlite3";
const ENV_CACHE_DB_PATH: &str = "STOREFRONT_CACHE_DB_PATH";
static CATALOG_SETTINGS: OnceLock<CatalogSettings> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
struct CatalogSettings {
    config: CatalogConfig,
    cache_db_path: PathBuf,
}

/// Minimal health-check API for smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns empty string on success and an error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Sets backend and cache locations for `category_load`.
///
/// # FFI contract
/// - First successful call wins; repeating it with identical values is fine.
/// - Returns empty string on success and an error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_catalog(
    base_url: String,
    categories_path: String,
    cache_db_path: String,
) -> String {
    let config = match CatalogConfig::new(base_url, categories_path) {
        Ok(config) => config,
        Err(err) => return err.to_string(),
    };
    let cache_db_path = cache_db_path.trim();
    if cache_db_path.is_empty() {
        return "cache_db_path cannot be empty".to_string();
    }

    let requested = CatalogSettings {
        config,
        cache_db_path: PathBuf::from(cache_db_path),
    };
    let active = CATALOG_SETTINGS.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "catalog already configured for {}; refusing to switch",
            active.config.categories_url()
        )
    }
}

/// Flat category record crossing the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiCategory {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub title: String,
}

/// One visible tree row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiCategoryRow {
    pub id: i64,
    pub title: String,
    pub depth: u32,
    pub has_children: bool,
    pub checked: bool,
    pub indeterminate: bool,
    pub collapsed: bool,
}

/// Response for selection toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelectionResponse {
    pub ok: bool,
    /// Next selection, ascending. Equals the input on failure.
    pub selected_ids: Vec<i64>,
    pub message: String,
}

/// Response for tree rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTreeResponse {
    pub ok: bool,
    pub rows: Vec<FfiCategoryRow>,
    pub summary: Option<String>,
    pub message: String,
}

/// Response for category loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLoadResponse {
    /// `loaded`, `empty` or `error`.
    pub status: String,
    pub categories: Vec<FfiCategory>,
    pub message: String,
}

/// Toggles one category and returns the next selection.
///
/// # FFI contract
/// - Sync, pure computation; never panics.
/// - The caller owns the selection and must commit `selected_ids` itself.
#[flutter_rust_bridge::frb(sync)]
pub fn category_toggle(
    categories: Vec<FfiCategory>,
    selected_ids: Vec<i64>,
    id: i64,
) -> CategorySelectionResponse {
    let selected: SelectionSet = selected_ids.iter().copied().collect();
    let result = to_tree(categories).and_then(|tree| {
        SelectionEngine::new(&tree)
            .toggle(&selected, id)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(next) => CategorySelectionResponse {
            ok: true,
            message: format!("{} selected.", next.len()),
            selected_ids: next.into_iter().collect(),
        },
        Err(message) => CategorySelectionResponse {
            ok: false,
            selected_ids,
            message: format!("category_toggle failed: {message}"),
        },
    }
}

/// Whether some but not all descendants of `id` are selected.
///
/// Returns `false` (and logs) for malformed input or an unknown id.
#[flutter_rust_bridge::frb(sync)]
pub fn category_is_indeterminate(
    categories: Vec<FfiCategory>,
    selected_ids: Vec<i64>,
    id: i64,
) -> bool {
    let selected: SelectionSet = selected_ids.into_iter().collect();
    to_tree(categories)
        .and_then(|tree| {
            SelectionEngine::new(&tree)
                .is_indeterminate(&selected, id)
                .map_err(|err| err.to_string())
        })
        .unwrap_or_else(|message| {
            warn!("event=ffi_indeterminate module=ffi status=error error={message}");
            false
        })
}

/// Builds visible rows for the checkbox tree.
#[flutter_rust_bridge::frb(sync)]
pub fn category_tree_rows(
    categories: Vec<FfiCategory>,
    selected_ids: Vec<i64>,
    collapsed_ids: Vec<i64>,
) -> CategoryTreeResponse {
    let selected: SelectionSet = selected_ids.into_iter().collect();
    let mut widget = CategoryCheckboxes::new();
    for id in collapsed_ids {
        if !widget.collapse_state().is_collapsed(id) {
            widget.toggle_collapse(id);
        }
    }

    let result = to_tree(categories).and_then(|tree| {
        let rows = widget.rows(&tree, &selected).map_err(|err| err.to_string())?;
        Ok((rows, storefront_core::selection_summary(&tree, &selected)))
    });
    match result {
        Ok((rows, summary)) => CategoryTreeResponse {
            ok: true,
            message: format!("{} row(s).", rows.len()),
            rows: rows.into_iter().map(to_ffi_row).collect(),
            summary,
        },
        Err(message) => CategoryTreeResponse {
            ok: false,
            rows: Vec::new(),
            summary: None,
            message: format!("category_tree_rows failed: {message}"),
        },
    }
}

/// Loads categories from the local cache, or the backend when the cache is
/// empty.
///
/// # FFI contract
/// - Sync call; may block on network and disk.
/// - Never panics; failures come back as `status = "error"`.
#[flutter_rust_bridge::frb(sync)]
pub fn category_load() -> CategoryLoadResponse {
    let settings = resolve_catalog_settings();
    let loaded = open_db(&settings.cache_db_path)
        .map_err(|err| format!("cache open failed: {err}"))
        .and_then(|conn| {
            let cache = SqliteCategoryRepository::try_new(&conn)
                .map_err(|err| format!("cache init failed: {err}"))?;
            let remote = HttpCategorySource::new(&settings.config).map_err(|err| err.to_string())?;
            let mut store = CategoryStore::new(CachedCategorySource::new(remote, cache));
            Ok(match store.ensure_loaded() {
                LoadState::Loaded(tree) => Ok(tree.categories().to_vec()),
                LoadState::Failed(failure) => Err(failure.to_string()),
                LoadState::Idle | LoadState::Loading => Err("load did not complete".to_string()),
            })
        })
        .and_then(|outcome| outcome);

    match loaded {
        Ok(categories) if categories.is_empty() => CategoryLoadResponse {
            status: "empty".to_string(),
            categories: Vec::new(),
            message: "No categories available.".to_string(),
        },
        Ok(categories) => CategoryLoadResponse {
            status: "loaded".to_string(),
            message: format!("Loaded {} categories.", categories.len()),
            categories: categories.into_iter().map(to_ffi_category).collect(),
        },
        Err(message) => CategoryLoadResponse {
            status: "error".to_string(),
            categories: Vec::new(),
            message: format!("category_load failed: {message}"),
        },
    }
}

/// Clears the local category cache.
///
/// Returns empty string on success and an error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn category_cache_invalidate() -> String {
    let settings = resolve_catalog_settings();
    let result = open_db(&settings.cache_db_path)
        .map_err(|err| err.to_string())
        .and_then(|conn| {
            let cache = SqliteCategoryRepository::try_new(&conn).map_err(|err| err.to_string())?;
            cache.clear().map_err(|err| err.to_string())
        });
    match result {
        Ok(()) => {
            info!("event=category_cache_invalidate module=ffi status=ok");
            String::new()
        }
        Err(message) => format!("category_cache_invalidate failed: {message}"),
    }
}

fn resolve_catalog_settings() -> &'static CatalogSettings {
    CATALOG_SETTINGS.get_or_init(|| {
        let config = CatalogConfig::from_env().unwrap_or_else(|err| {
            warn!("event=ffi_config module=ffi status=fallback error={err}");
            CatalogConfig::default()
        });
        let cache_db_path = std::env::var(ENV_CACHE_DB_PATH)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(CACHE_DB_FILE_NAME));
        CatalogSettings {
            config,
            cache_db_path,
        }
    })
}

fn to_tree(categories: Vec<FfiCategory>) -> Result<CategoryTree, String> {
    let categories = categories
        .into_iter()
        .map(|category| Category::new(category.id, category.parent_id, category.title))
        .collect();
    CategoryTree::try_new(categories).map_err(|err| err.to_string())
}

fn to_ffi_category(category: Category) -> FfiCategory {
    FfiCategory {
        id: category.id,
        parent_id: category.parent_id,
        title: category.title,
    }
}

fn to_ffi_row(row: CategoryRow) -> FfiCategoryRow {
    FfiCategoryRow {
        id: row.id,
        title: row.title,
        depth: u32::try_from(row.depth).unwrap_or(u32::MAX),
        has_children: row.has_children,
        checked: row.check == CheckState::Checked,
        indeterminate: row.check == CheckState::Indeterminate,
        collapsed: row.collapsed,
    }
}
