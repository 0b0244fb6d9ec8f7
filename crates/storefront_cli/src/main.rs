//! CLI probe for the storefront category picker.
//!
//! # Responsibility
//! - Load categories from a JSON file or the catalog backend.
//! - Render the checkbox tree and apply toggles from the command line.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use storefront_core::db::open_db;
use storefront_core::{
    default_log_level, init_logging, CachedCategorySource, CatalogConfig, CategoryCheckboxes,
    CategoryId, CategoryRepository, CategorySource, CategoryStore, CheckState,
    FileCategorySource, HttpCategorySource, SelectionEngine, SelectionSet,
    SqliteCategoryRepository, WidgetView,
};

/// Storefront category picker probe
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory for rolling log files (absolute path)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (defaults by build mode)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Read categories from a JSON file instead of the backend
    #[arg(short, long, conflicts_with = "base_url")]
    file: Option<PathBuf>,

    /// Backend base URL (overrides STOREFRONT_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// SQLite cache file for backend fetches
    #[arg(long)]
    cache: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the checkbox tree
    Tree {
        #[command(flatten)]
        source: SourceArgs,

        /// Currently selected ids
        #[arg(short, long, value_delimiter = ',')]
        selected: Vec<CategoryId>,

        /// Ids of collapsed rows
        #[arg(long, value_delimiter = ',')]
        collapsed: Vec<CategoryId>,
    },
    /// Toggle ids in order and print the resulting selection
    Toggle {
        #[command(flatten)]
        source: SourceArgs,

        /// Starting selection
        #[arg(short, long, value_delimiter = ',')]
        selected: Vec<CategoryId>,

        /// Ids to toggle, applied left to right
        #[arg(required = true)]
        ids: Vec<CategoryId>,
    },
    /// Fetch categories and print them as JSON
    Fetch {
        #[command(flatten)]
        source: SourceArgs,

        /// Bypass the cache and overwrite it
        #[arg(long, requires = "cache")]
        refresh: bool,
    },
    /// Clear the SQLite category cache
    Invalidate {
        /// SQLite cache file
        #[arg(long)]
        cache: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).context("failed to start logging")?;
    }

    match cli.command {
        Commands::Tree {
            source,
            selected,
            collapsed,
        } => run_tree(&source, selected.into_iter().collect(), &collapsed),
        Commands::Toggle {
            source,
            selected,
            ids,
        } => run_toggle(&source, selected.into_iter().collect(), &ids),
        Commands::Fetch { source, refresh } => run_fetch(&source, refresh),
        Commands::Invalidate { cache } => {
            let conn = open_db(&cache).context("failed to open category cache")?;
            SqliteCategoryRepository::try_new(&conn)?.clear()?;
            println!("category cache cleared: {}", cache.display());
            Ok(())
        }
    }
}

fn run_tree(source: &SourceArgs, selected: SelectionSet, collapsed: &[CategoryId]) -> Result<()> {
    let mut widget = CategoryCheckboxes::new();
    for &id in collapsed {
        if !widget.collapse_state().is_collapsed(id) {
            widget.toggle_collapse(id);
        }
    }

    with_source(source, |categories| {
        let mut store = CategoryStore::new(categories);
        let state = widget.mount(&mut store);
        match widget.view(state, &selected)? {
            WidgetView::Loading { message } | WidgetView::Empty { message } => {
                println!("{message}")
            }
            WidgetView::Error { message } => bail!("{message}"),
            WidgetView::Tree {
                header,
                rows,
                selected_count,
                summary,
            } => {
                println!("{header} ({selected_count} selected)");
                for row in rows {
                    let check = match row.check {
                        CheckState::Checked => "[x]",
                        CheckState::Unchecked => "[ ]",
                        CheckState::Indeterminate => "[-]",
                    };
                    let chevron = match (row.has_children, row.collapsed) {
                        (false, _) => "  ",
                        (true, false) => "v ",
                        (true, true) => "> ",
                    };
                    println!(
                        "{}{chevron}{check} {} (#{})",
                        "  ".repeat(row.depth),
                        row.title,
                        row.id
                    );
                }
                if let Some(summary) = summary {
                    println!("{summary}");
                }
            }
        }
        Ok(())
    })
}

fn run_toggle(source: &SourceArgs, selected: SelectionSet, ids: &[CategoryId]) -> Result<()> {
    with_source(source, |categories| {
        let mut store = CategoryStore::new(categories);
        let Some(tree) = store.ensure_loaded().tree() else {
            bail!("categories could not be loaded");
        };
        let engine = SelectionEngine::new(tree);
        let mut current = selected;
        for &id in ids {
            current = engine
                .toggle(&current, id)
                .with_context(|| format!("failed to toggle category {id}"))?;
        }
        println!("{}", serde_json::to_string(&current)?);
        Ok(())
    })
}

fn run_fetch(source: &SourceArgs, refresh: bool) -> Result<()> {
    if refresh {
        let Some(cache_path) = &source.cache else {
            bail!("--refresh requires --cache");
        };
        let conn = open_db(cache_path).context("failed to open category cache")?;
        let repo = SqliteCategoryRepository::try_new(&conn)?;
        let categories =
            CachedCategorySource::new(HttpCategorySource::new(&catalog_config(source)?)?, repo)
                .refresh()?;
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    with_source(source, |categories| {
        let categories = categories.fetch_all()?;
        println!("{}", serde_json::to_string_pretty(&categories)?);
        Ok(())
    })
}

/// Runs `f` with the source selected by `args`: file, cached backend, or
/// plain backend.
fn with_source<T>(
    args: &SourceArgs,
    f: impl FnOnce(&dyn CategorySource) -> Result<T>,
) -> Result<T> {
    if let Some(file) = &args.file {
        return f(&FileCategorySource::new(file));
    }

    let remote = HttpCategorySource::new(&catalog_config(args)?)?;
    match &args.cache {
        Some(cache_path) => {
            let conn = open_db(cache_path).context("failed to open category cache")?;
            let repo = SqliteCategoryRepository::try_new(&conn)?;
            f(&CachedCategorySource::new(remote, repo))
        }
        None => f(&remote),
    }
}

fn catalog_config(args: &SourceArgs) -> Result<CatalogConfig> {
    let env_config = CatalogConfig::from_env()?;
    Ok(match &args.base_url {
        Some(base_url) => CatalogConfig::new(base_url.as_str(), env_config.categories_path)?,
        None => env_config,
    })
}
