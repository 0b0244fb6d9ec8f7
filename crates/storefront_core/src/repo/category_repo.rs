//! Category cache repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the last fetched category list so later sessions skip the fetch.
//! - Keep SQL details inside the repository boundary.
//!
//! # Invariants
//! - `list_all` returns categories in the order the backend delivered them.
//! - `replace_all` swaps the whole list atomically; partial lists never persist.
//! - Parent links are stored as-is; hierarchy validation happens above storage.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::category::{Category, CategoryId};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const META_FETCHED_AT: &str = "categories_fetched_at";

/// Result type used by category cache operations.
pub type CategoryRepoResult<T> = Result<T, CategoryRepoError>;

/// Errors from category cache operations.
#[derive(Debug)]
pub enum CategoryRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Input or persisted data cannot be stored/read as a category list.
    InvalidData(String),
}

impl Display for CategoryRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "category cache requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "category cache requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid category data: {message}"),
        }
    }
}

impl Error for CategoryRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for CategoryRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CategoryRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the local category cache.
pub trait CategoryRepository {
    /// Replaces the cached list with `categories`, keeping their order.
    fn replace_all(&self, categories: &[Category]) -> CategoryRepoResult<()>;
    /// Lists cached categories in stored order.
    fn list_all(&self) -> CategoryRepoResult<Vec<Category>>;
    /// Counts cached categories.
    fn count(&self) -> CategoryRepoResult<usize>;
    /// Drops every cached category.
    fn clear(&self) -> CategoryRepoResult<()>;
    /// Epoch ms of the last successful `replace_all`, if any.
    fn fetched_at(&self) -> CategoryRepoResult<Option<i64>>;
}

/// SQLite-backed category cache.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> CategoryRepoResult<Self> {
        ensure_cache_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn replace_all(&self, categories: &[Category]) -> CategoryRepoResult<()> {
        ensure_unique_ids(categories)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM categories;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO categories (id, parent_id, title, position)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for (position, category) in categories.iter().enumerate() {
                insert.execute(params![
                    category.id,
                    category.parent_id,
                    category.title,
                    position as i64
                ])?;
            }
        }
        tx.execute(
            "INSERT INTO cache_meta (key, value, updated_at)
             VALUES (?1, CAST(strftime('%s', 'now') * 1000 AS TEXT), strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            [META_FETCHED_AT],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn list_all(&self) -> CategoryRepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, parent_id, title
             FROM categories
             ORDER BY position ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(Category {
                id: row.get("id")?,
                parent_id: row.get("parent_id")?,
                title: row.get("title")?,
            });
        }
        Ok(categories)
    }

    fn count(&self) -> CategoryRepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| CategoryRepoError::InvalidData(format!("invalid row count `{count}`")))
    }

    fn clear(&self) -> CategoryRepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM categories;", [])?;
        tx.execute("DELETE FROM cache_meta WHERE key = ?1;", [META_FETCHED_AT])?;
        tx.commit()?;
        Ok(())
    }

    fn fetched_at(&self) -> CategoryRepoResult<Option<i64>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM cache_meta WHERE key = ?1;",
                [META_FETCHED_AT],
                |row| row.get(0),
            )
            .optional()?;

        value
            .map(|text| {
                text.parse::<i64>().map_err(|_| {
                    CategoryRepoError::InvalidData(format!(
                        "invalid timestamp `{text}` in cache_meta.{META_FETCHED_AT}"
                    ))
                })
            })
            .transpose()
    }
}

fn ensure_unique_ids(categories: &[Category]) -> CategoryRepoResult<()> {
    let mut seen: HashSet<CategoryId> = HashSet::with_capacity(categories.len());
    for category in categories {
        if !seen.insert(category.id) {
            return Err(CategoryRepoError::InvalidData(format!(
                "duplicate category id {}",
                category.id
            )));
        }
    }
    Ok(())
}

fn ensure_cache_connection_ready(conn: &Connection) -> CategoryRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(CategoryRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["categories", "cache_meta"] {
        if !table_exists(conn, table)? {
            return Err(CategoryRepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> CategoryRepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
